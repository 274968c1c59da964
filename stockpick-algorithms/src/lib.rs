use anyhow::Result;
use stockpick_market::Market;
use stockpick_structs::{
    config::{Algorithm, Settings},
    core::Selection,
};

pub mod brute_force;
pub mod dynamic;

pub fn solve_challenge(market: &Market, settings: &Settings) -> Result<Selection> {
    match settings.algorithm {
        Algorithm::BruteForce => brute_force::solve_challenge(market, settings),
        Algorithm::Dynamic => dynamic::solve_challenge(market, settings),
    }
}
