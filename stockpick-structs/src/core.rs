use serde::{Deserialize, Serialize};
use stockpick_utils::round_cents;

/// A candidate investment: a fixed cost and a percentage return on it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub cost: f64,
    pub return_pct: f64,
}

impl Action {
    pub fn new(name: impl Into<String>, cost: f64, return_pct: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            return_pct,
        }
    }

    pub fn profit(&self) -> f64 {
        self.cost * self.return_pct / 100.0
    }

    /// Only actions with a strictly positive cost take part in optimisation.
    pub fn is_candidate(&self) -> bool {
        self.cost > 0.0
    }
}

/// An action picked by a solver, restated in currency units.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SelectedAction {
    /// Position of the action in the candidate list the solver was given.
    pub index: usize,
    pub name: String,
    pub cost: f64,
    pub profit: f64,
}

impl SelectedAction {
    pub fn from_action(index: usize, action: &Action) -> Self {
        Self {
            index,
            name: action.name.clone(),
            cost: action.cost,
            profit: action.profit(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub actions: Vec<SelectedAction>,
    pub total_cost: f64,
    pub total_profit: f64,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a selection from candidate indices, summing cost and profit.
    ///
    /// Indices must be valid for `actions`; order is preserved.
    pub fn from_indices(actions: &[Action], indices: &[usize]) -> Self {
        let actions: Vec<SelectedAction> = indices
            .iter()
            .map(|&i| SelectedAction::from_action(i, &actions[i]))
            .collect();
        let total_cost = actions.iter().map(|a| a.cost).sum();
        let total_profit = actions.iter().map(|a| a.profit).sum();
        Self {
            actions,
            total_cost,
            total_profit,
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        self.actions.iter().map(|a| a.index).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Profit rounded to cents, for comparisons across solvers.
    pub fn rounded_profit(&self) -> f64 {
        round_cents(self.total_profit)
    }
}

/// Everything a run reports, in a form that serialises to stable JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutputData {
    pub algorithm: String,
    pub budget: f64,
    pub scale: u32,
    pub elapsed_ms: u64,
    pub num_actions: usize,
    pub num_ignored: usize,
    pub num_malformed: usize,
    pub selection: Selection,
}
