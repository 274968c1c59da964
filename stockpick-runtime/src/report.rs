use std::fmt::{self, Write};
use stockpick_structs::core::OutputData;

/// Renders a run as the plain text summary printed to the console.
pub fn render(output: &OutputData) -> Result<String, fmt::Error> {
    let selection = &output.selection;
    let mut report = String::new();
    writeln!(report, "Algorithm                 : {}", output.algorithm)?;
    writeln!(
        report,
        "Execution time            : {:.3}s",
        output.elapsed_ms as f64 / 1000.0
    )?;
    writeln!(report, "Available budget          : {:.2} €", output.budget)?;
    writeln!(report, "Total cost selected       : {:.2} €", selection.total_cost)?;
    writeln!(
        report,
        "Expected total profit     : {:.2} €",
        selection.total_profit
    )?;
    writeln!(report)?;
    writeln!(report, "Actions processed         : {}", output.num_actions)?;
    writeln!(report, "Actions ignored           : {}", output.num_ignored)?;
    writeln!(report, "Records malformed         : {}", output.num_malformed)?;
    writeln!(report)?;
    if selection.is_empty() {
        writeln!(report, "No action fits the budget")?;
    } else {
        writeln!(report, "Selected actions ({}):", selection.len())?;
        for action in &selection.actions {
            writeln!(
                report,
                " - {} | cost = {:.2} € | profit = {:.2} €",
                action.name, action.cost, action.profit
            )?;
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpick_structs::core::{Action, Selection};

    fn output(selection: Selection) -> OutputData {
        OutputData {
            algorithm: "dynamic".to_string(),
            budget: 300.0,
            scale: 100,
            elapsed_ms: 1234,
            num_actions: 3,
            num_ignored: 1,
            num_malformed: 2,
            selection,
        }
    }

    #[test]
    fn test_render_selection() {
        let actions = vec![
            Action::new("A", 100.0, 10.0),
            Action::new("B", 200.0, 15.0),
        ];
        let report = render(&output(Selection::from_indices(&actions, &[0, 1]))).unwrap();
        assert!(report.contains("Execution time            : 1.234s"));
        assert!(report.contains("Available budget          : 300.00 €"));
        assert!(report.contains("Total cost selected       : 300.00 €"));
        assert!(report.contains("Expected total profit     : 40.00 €"));
        assert!(report.contains("Actions ignored           : 1"));
        assert!(report.contains("Records malformed         : 2"));
        assert!(report.contains(" - B | cost = 200.00 € | profit = 30.00 €"));
    }

    #[test]
    fn test_render_empty_selection() {
        let report = render(&output(Selection::empty())).unwrap();
        assert!(report.contains("No action fits the budget"));
        assert!(report.contains("Expected total profit     : 0.00 €"));
    }
}
