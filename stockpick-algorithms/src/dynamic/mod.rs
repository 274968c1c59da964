use anyhow::{anyhow, Result};
use ndarray::Array2;
use stockpick_market::Market;
use stockpick_structs::{
    config::Settings,
    core::{Action, Selection},
};
use stockpick_utils::{from_units, to_units};
use tracing::debug;

pub fn solve_challenge(market: &Market, settings: &Settings) -> Result<Selection> {
    solve(&market.actions, settings.budget, settings.scale)
}

/// An action with its cost and profit expressed in `1 / scale` units.
#[derive(Debug, Clone, Copy)]
struct ScaledAction {
    index: usize,
    cost: usize,
    profit: i64,
}

/// Solves the 0/1 knapsack exactly over integer money units.
///
/// Costs, profits and the budget are multiplied by `scale` and rounded half
/// to even. The reported total profit is the table optimum divided back by
/// `scale`; the reported total cost is the sum of the selected actions'
/// original costs. Fails instead of wrapping when the scaled problem does not
/// fit 64 bit arithmetic or the table cannot be allocated.
pub fn solve(actions: &[Action], budget: f64, scale: u32) -> Result<Selection> {
    let budget_units = to_units(budget, scale)?;
    let items = scale_actions(actions, scale)?;
    if items.is_empty() || budget_units <= 0 {
        return Ok(Selection::empty());
    }
    let capacity = usize::try_from(budget_units)
        .map_err(|_| anyhow!("Budget of {} units does not fit in memory", budget_units))?;

    let table = build_table(&items, capacity)?;
    let best = table[[items.len(), capacity]];
    let indices = reconstruct(&table, &items, capacity);
    debug!(
        items = items.len(),
        capacity,
        best,
        selected = indices.len(),
        "solved profit table"
    );

    let mut selection = Selection::from_indices(actions, &indices);
    selection.total_profit = from_units(best, scale);
    Ok(selection)
}

fn scale_actions(actions: &[Action], scale: u32) -> Result<Vec<ScaledAction>> {
    let mut items = Vec::with_capacity(actions.len());
    let mut profit_bound = 0i64;
    for (index, action) in actions.iter().enumerate() {
        if !action.is_candidate() {
            continue;
        }
        let cost = to_units(action.cost, scale)?;
        let profit = to_units(action.profit(), scale)?;
        // every cell is bounded by the sum of positive profits
        if profit > 0 {
            profit_bound = profit_bound.checked_add(profit).ok_or_else(|| {
                anyhow!(
                    "Sum of profits at scale {} overflows 64 bit units",
                    scale
                )
            })?;
        }
        items.push(ScaledAction {
            index,
            cost: usize::try_from(cost)
                .map_err(|_| anyhow!("Cost of {} units does not fit in memory", cost))?,
            profit,
        });
    }
    Ok(items)
}

/// `table[[i, w]]` is the best profit using the first `i` items within `w` units.
fn build_table(items: &[ScaledAction], capacity: usize) -> Result<Array2<i64>> {
    let rows = items.len() + 1;
    let columns = capacity
        .checked_add(1)
        .ok_or_else(|| anyhow!("Budget of {} units is too large", capacity))?;
    let cells = rows.checked_mul(columns).ok_or_else(|| {
        anyhow!(
            "Profit table of {} x {} cells overflows the address space",
            rows,
            columns
        )
    })?;
    debug!(rows, columns, "allocating profit table");

    let mut cells_vec: Vec<i64> = Vec::new();
    cells_vec.try_reserve_exact(cells).map_err(|e| {
        anyhow!(
            "Failed to allocate profit table of {} x {} cells: {}",
            rows,
            columns,
            e
        )
    })?;
    cells_vec.resize(cells, 0);
    let mut table = Array2::from_shape_vec((rows, columns), cells_vec)?;

    for (i, item) in items.iter().enumerate() {
        let row = i + 1;
        for w in 0..columns {
            let mut best = table[[row - 1, w]];
            if item.cost <= w {
                let with_item = table[[row - 1, w - item.cost]] + item.profit;
                // exclusion wins ties
                if with_item > best {
                    best = with_item;
                }
            }
            table[[row, w]] = best;
        }
    }
    Ok(table)
}

/// Walks the table backwards and returns the chosen action indices in input order.
fn reconstruct(table: &Array2<i64>, items: &[ScaledAction], capacity: usize) -> Vec<usize> {
    let mut w = capacity;
    let mut indices = Vec::new();
    for row in (1..=items.len()).rev() {
        if table[[row, w]] != table[[row - 1, w]] {
            let item = &items[row - 1];
            indices.push(item.index);
            w -= item.cost;
        }
    }
    indices.reverse();
    indices
}
