mod report;

use anyhow::{anyhow, Result};
use clap::{arg, Arg, ArgMatches, Command};
use serde_json::Value;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    time::Instant,
};
use stockpick_algorithms::solve_challenge;
use stockpick_market::{generator::generate_actions, write_actions_csv, Market, Track};
use stockpick_structs::{
    config::{Algorithm, Settings},
    core::OutputData,
};
use stockpick_utils::{dejsonify, jsonify, jsonify_pretty, u8s_from_str};
use tracing::info;

fn settings_args(command: Command) -> Command {
    command
        .arg(
            arg!(--settings [SETTINGS] "Settings json string or path to json file")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            arg!(--budget [BUDGET] "Maximum total cost of the selection")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--scale [SCALE] "Integer units per currency unit used by the dynamic solver")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            arg!(--delimiter [DELIMITER] "Field delimiter of the actions file")
                .value_parser(clap::value_parser!(String)),
        )
}

fn cli() -> Command {
    Command::new("stockpick-runtime")
        .about("Selects the most profitable set of actions within a budget")
        .arg_required_else_help(true)
        .subcommand(
            settings_args(
                Command::new("compute_selection")
                    .about("Computes the best selection")
                    .arg(
                        arg!(<ACTIONS> "Path to a CSV file of actions")
                            .value_parser(clap::value_parser!(PathBuf)),
                    ),
            )
            .arg(
                arg!(--algorithm [ALGORITHM] "Solver to run: 'dynamic' or 'brute_force'")
                    .value_parser(clap::value_parser!(String)),
            )
            .arg(
                arg!(--output [OUTPUT_FILE] "If set, the output data will be saved to this file path as json")
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(arg!(--json "Print the output data as json instead of a report")),
        )
        .subcommand(settings_args(
            Command::new("verify_selection")
                .about("Verifies a selection")
                .arg(
                    arg!(<ACTIONS> "Path to a CSV file of actions")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<SELECTION> "Selection json string, path to json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                ),
        ))
        .subcommand(
            Command::new("generate_actions")
                .about("Generates a random actions file")
                .arg(
                    arg!(<SEED> "A string used in seed generation")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<NUM_ACTIONS> "Number of records to generate")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("invalid_percent")
                        .long("invalid-percent")
                        .value_name("PERCENT")
                        .help("Share of records generated with a non-positive cost")
                        .default_value("2")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the actions will be written to this file path")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli().get_matches()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("compute_selection", sub_m)) => compute_selection(
            required::<PathBuf>(sub_m, "ACTIONS")?,
            load_settings(sub_m)?,
            sub_m.get_one::<PathBuf>("output").cloned(),
            sub_m.get_flag("json"),
        ),
        Some(("verify_selection", sub_m)) => verify_selection(
            required::<PathBuf>(sub_m, "ACTIONS")?,
            required::<String>(sub_m, "SELECTION")?,
            load_settings(sub_m)?,
        ),
        Some(("generate_actions", sub_m)) => generate(
            required::<String>(sub_m, "SEED")?,
            required::<usize>(sub_m, "NUM_ACTIONS")?,
            required::<u32>(sub_m, "invalid_percent")?,
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    }
}

fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T> {
    matches
        .get_one::<T>(id)
        .cloned()
        .ok_or_else(|| anyhow!("Missing argument {}", id))
}

pub fn compute_selection(
    actions_path: PathBuf,
    settings: Settings,
    output_file: Option<PathBuf>,
    print_json: bool,
) -> Result<()> {
    let start = Instant::now();
    let market = Market::from_csv_path(&actions_path, settings.delimiter)?;
    let selection = solve_challenge(&market, &settings)?;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    info!(
        algorithm = %settings.algorithm,
        actions = market.num_actions(),
        selected = selection.len(),
        profit = selection.total_profit,
        elapsed_ms,
        "computed selection"
    );

    let output_data = OutputData {
        algorithm: settings.algorithm.to_string(),
        budget: settings.budget,
        scale: settings.scale,
        elapsed_ms,
        num_actions: market.num_actions(),
        num_ignored: market.num_ignored,
        num_malformed: market.num_malformed,
        selection,
    };
    if let Some(path) = output_file {
        fs::write(&path, jsonify_pretty(&output_data)?)?;
        println!("output_data written to: {:?}", path);
    } else if print_json {
        println!("{}", jsonify(&output_data)?);
    } else {
        print!("{}", report::render(&output_data)?);
    }
    Ok(())
}

pub fn verify_selection(
    actions_path: PathBuf,
    selection: String,
    settings: Settings,
) -> Result<()> {
    let market = Market::from_csv_path(&actions_path, settings.delimiter)?;
    let indices = load_selection(&selection)?;
    let selection = market
        .verify_selection(&indices, settings.budget, settings.scale)
        .map_err(|e| anyhow!("Invalid selection: {}", e))?;
    println!("Selection is valid");
    println!(
        "Total cost: {:.2} € | Total profit: {:.2} €",
        selection.total_cost, selection.total_profit
    );
    Ok(())
}

pub fn generate(
    seed: String,
    num_actions: usize,
    invalid_percent: u32,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let track = Track {
        num_actions,
        invalid_percent,
    };
    let actions = generate_actions(&u8s_from_str(&seed), &track)?;
    match output_file {
        Some(path) => {
            write_actions_csv(fs::File::create(&path)?, &actions, ',')?;
            println!("actions written to: {:?}", path);
        }
        None => write_actions_csv(io::stdout().lock(), &actions, ',')?,
    }
    Ok(())
}

fn read_arg_or_file(value: &str) -> Result<String> {
    if value == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else if value.ends_with(".json") {
        fs::read_to_string(value).map_err(|e| anyhow!("Failed to read file {}: {}", value, e))
    } else {
        Ok(value.to_string())
    }
}

/// Builds settings from `--settings` and then applies the individual flags on top.
fn load_settings(matches: &ArgMatches) -> Result<Settings> {
    let mut settings = match matches.get_one::<String>("settings") {
        Some(value) => Settings::from_json(&read_arg_or_file(value)?)?,
        None => Settings::default(),
    };
    if let Some(&budget) = matches.get_one::<f64>("budget") {
        settings.budget = budget;
    }
    if let Some(&scale) = matches.get_one::<u32>("scale") {
        settings.scale = scale;
    }
    if let Some(delimiter) = matches.get_one::<String>("delimiter") {
        settings.delimiter = parse_delimiter(delimiter)?;
    }
    // only compute_selection defines --algorithm
    if let Ok(Some(algorithm)) = matches.try_get_one::<String>("algorithm") {
        settings.algorithm = algorithm.parse::<Algorithm>()?;
    }
    settings.validate()?;
    Ok(settings)
}

fn parse_delimiter(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(anyhow!(
            "Delimiter must be a single character, got '{}'",
            value
        )),
    }
}

/// Accepts either a json array of indices or the output data of `compute_selection`.
fn load_selection(selection: &str) -> Result<Vec<usize>> {
    let json = read_arg_or_file(selection)?;
    let value: Value = dejsonify(&json).map_err(|e| anyhow!("Failed to parse selection: {}", e))?;
    if value.is_object() {
        let output_data: OutputData = serde_json::from_value(value)
            .map_err(|e| anyhow!("Failed to parse output data: {}", e))?;
        Ok(output_data.selection.indices())
    } else {
        serde_json::from_value(value).map_err(|e| anyhow!("Failed to parse selection: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_load_settings_overrides() {
        let matches = cli().get_matches_from([
            "stockpick-runtime",
            "compute_selection",
            "actions.csv",
            "--settings",
            r#"{"budget": 300, "scale": 10}"#,
            "--budget",
            "250.5",
            "--algorithm",
            "brute_force",
            "--delimiter",
            ";",
        ]);
        let (_, sub_m) = matches.subcommand().unwrap();
        let settings = load_settings(sub_m).unwrap();
        assert_eq!(settings.budget, 250.5);
        assert_eq!(settings.scale, 10);
        assert_eq!(settings.algorithm, Algorithm::BruteForce);
        assert_eq!(settings.delimiter, ';');
    }

    #[test]
    fn test_load_settings_for_verify() {
        let matches = cli().get_matches_from([
            "stockpick-runtime",
            "verify_selection",
            "actions.csv",
            "[0, 1]",
        ]);
        let (_, sub_m) = matches.subcommand().unwrap();
        assert_eq!(load_settings(sub_m).unwrap(), Settings::default());
    }

    #[test]
    fn test_verify_accepts_scale() {
        let matches = cli().get_matches_from([
            "stockpick-runtime",
            "verify_selection",
            "actions.csv",
            "[0]",
            "--scale",
            "1",
            "--budget",
            "20",
        ]);
        let (_, sub_m) = matches.subcommand().unwrap();
        let settings = load_settings(sub_m).unwrap();
        assert_eq!(settings.scale, 1);
        assert_eq!(settings.budget, 20.0);
    }

    #[test]
    fn test_load_settings_rejects_bad_values() {
        let matches = cli().get_matches_from([
            "stockpick-runtime",
            "compute_selection",
            "actions.csv",
            "--scale",
            "0",
        ]);
        let (_, sub_m) = matches.subcommand().unwrap();
        assert!(load_settings(sub_m).is_err());

        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_load_selection() {
        assert_eq!(load_selection("[2, 0]").unwrap(), vec![2, 0]);
        let output = r#"{"algorithm":"dynamic","budget":50.0,"elapsed_ms":0,"num_actions":1,"num_ignored":0,"num_malformed":0,"scale":100,"selection":{"actions":[{"cost":50.0,"index":0,"name":"X","profit":10.0}],"total_cost":50.0,"total_profit":10.0}}"#;
        assert_eq!(load_selection(output).unwrap(), vec![0]);
        assert!(load_selection("not json").is_err());
    }
}
