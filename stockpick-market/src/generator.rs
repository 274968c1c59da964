use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use stockpick_structs::core::Action;

/// Shape of a generated instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Track {
    pub num_actions: usize,
    /// Share of records, in percent, generated with a zero or negative cost.
    pub invalid_percent: u32,
}

/// Generates raw action records, including invalid ones, deterministically from `seed`.
///
/// Valid costs are whole cents in `1.00..=100.00` and returns are whole
/// hundredths of a percent in `0.00..=40.00`.
pub fn generate_actions(seed: &[u8; 32], track: &Track) -> Result<Vec<Action>> {
    if track.invalid_percent > 100 {
        return Err(anyhow!(
            "invalid_percent must be between 0 and 100, got {}",
            track.invalid_percent
        ));
    }
    let mut rng = SmallRng::from_seed(*seed);
    let invalid_probability = track.invalid_percent as f64 / 100.0;

    Ok((0..track.num_actions)
        .map(|i| {
            let cost_cents: i64 = if rng.gen_bool(invalid_probability) {
                if rng.gen_bool(0.5) {
                    0
                } else {
                    -rng.gen_range(1..=5000)
                }
            } else {
                rng.gen_range(100..=10000)
            };
            let return_hundredths: i64 = rng.gen_range(0..=4000);
            Action::new(
                format!("Action-{}", i + 1),
                cost_cents as f64 / 100.0,
                return_hundredths as f64 / 100.0,
            )
        })
        .collect())
}
