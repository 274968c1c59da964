use anyhow::{anyhow, Result};
use stockpick_market::Market;
use stockpick_structs::{
    config::Settings,
    core::{Action, Selection},
};
use tracing::debug;

/// Above this many candidates the enumeration would not finish in any useful time.
pub const MAX_ENUMERATED_ACTIONS: usize = 40;

/// Slack allowed when comparing a summed cost against the budget, so that a
/// subset of cent amounts adding up to exactly the budget is not rejected
/// over floating point noise.
const COST_TOLERANCE: f64 = 1e-9;

/// A later subset must beat the best profit by more than this to replace it,
/// so equal real profits summed in a different order still tie.
const PROFIT_TOLERANCE: f64 = 1e-9;

pub fn solve_challenge(market: &Market, settings: &Settings) -> Result<Selection> {
    solve(&market.actions, settings.budget)
}

/// Evaluates every subset of the candidate actions and keeps the most
/// profitable one whose total cost fits in `budget`.
///
/// Subsets are visited one at a time in binary counting order: mask `m`
/// contains the `i`-th candidate when bit `i` is set. Only a strictly greater
/// profit replaces the current best, so ties go to the first subset found and
/// a result without positive profit is reported as the empty selection.
/// Fails on a budget that is not a finite number.
pub fn solve(actions: &[Action], budget: f64) -> Result<Selection> {
    let candidates: Vec<usize> = (0..actions.len())
        .filter(|&i| actions[i].is_candidate())
        .collect();
    let n = candidates.len();
    if !budget.is_finite() {
        return Err(anyhow!("Budget must be a finite number, got {}", budget));
    }
    if n > MAX_ENUMERATED_ACTIONS {
        return Err(anyhow!(
            "Brute force supports at most {} actions, got {}",
            MAX_ENUMERATED_ACTIONS,
            n
        ));
    }
    if n == 0 || budget <= 0.0 {
        return Ok(Selection::empty());
    }

    let costs: Vec<f64> = candidates.iter().map(|&i| actions[i].cost).collect();
    let profits: Vec<f64> = candidates.iter().map(|&i| actions[i].profit()).collect();

    let mut best_mask = 0u64;
    let mut best_profit = 0.0;
    for mask in 1..(1u64 << n) {
        let mut cost = 0.0;
        let mut profit = 0.0;
        let mut bits = mask;
        while bits != 0 {
            let i = bits.trailing_zeros() as usize;
            cost += costs[i];
            profit += profits[i];
            bits &= bits - 1;
        }
        if cost > budget + COST_TOLERANCE {
            continue;
        }
        if profit > best_profit + PROFIT_TOLERANCE {
            best_profit = profit;
            best_mask = mask;
        }
    }
    debug!(candidates = n, best_mask, best_profit, "enumerated subsets");

    let indices: Vec<usize> = (0..n)
        .filter(|&bit| (best_mask >> bit) & 1 == 1)
        .map(|bit| candidates[bit])
        .collect();
    Ok(Selection::from_indices(actions, &indices))
}
