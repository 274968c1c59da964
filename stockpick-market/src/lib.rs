pub mod generator;
mod loader;
pub use loader::*;

use anyhow::{anyhow, Result};
use std::collections::HashSet;
use stockpick_structs::core::{Action, Selection};
use stockpick_utils::to_units;

pub use generator::Track;

/// A cleaned set of candidate actions, plus the bookkeeping of what was dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Market {
    /// Candidates in input order; every cost is strictly positive.
    pub actions: Vec<Action>,
    /// Well formed records whose cost was zero or negative.
    pub num_ignored: usize,
    /// Records that could not be parsed at all.
    pub num_malformed: usize,
}

impl Market {
    pub fn from_actions(raw: Vec<Action>) -> Self {
        let total = raw.len();
        let actions: Vec<Action> = raw.into_iter().filter(Action::is_candidate).collect();
        Self {
            num_ignored: total - actions.len(),
            num_malformed: 0,
            actions,
        }
    }

    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self> {
        Ok(Self::from_actions(generator::generate_actions(seed, track)?))
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Checks that `indices` name a feasible selection and recomputes its totals.
    ///
    /// Costs are compared against the budget in integer units of `1 / scale`,
    /// the same arithmetic the dynamic solver uses.
    pub fn verify_selection(&self, indices: &[usize], budget: f64, scale: u32) -> Result<Selection> {
        let unique: HashSet<usize> = indices.iter().cloned().collect();
        if unique.len() != indices.len() {
            return Err(anyhow!("Duplicate actions selected."));
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= self.actions.len()) {
            return Err(anyhow!(
                "Action ({}) is out of bounds. Market has {} actions",
                index,
                self.actions.len()
            ));
        }

        let budget_units = to_units(budget, scale)?;
        let mut cost_units = 0i64;
        for &i in indices {
            cost_units = cost_units
                .checked_add(to_units(self.actions[i].cost, scale)?)
                .ok_or_else(|| anyhow!("Total cost overflows 64 bit units"))?;
        }
        let selection = Selection::from_indices(&self.actions, indices);
        if cost_units > budget_units {
            return Err(anyhow!(
                "Total cost ({:.2}) exceeded budget ({:.2})",
                selection.total_cost,
                budget
            ));
        }
        Ok(selection)
    }
}
