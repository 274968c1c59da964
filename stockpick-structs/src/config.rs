use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use stockpick_utils::dejsonify;

pub const DEFAULT_BUDGET: f64 = 500.0;
pub const DEFAULT_SCALE: u32 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    BruteForce,
    #[default]
    Dynamic,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::BruteForce => "brute_force",
            Algorithm::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "brute_force" | "brute-force" => Ok(Algorithm::BruteForce),
            "dynamic" | "dp" => Ok(Algorithm::Dynamic),
            _ => Err(anyhow!(
                "Unknown algorithm '{}'. Expected 'brute_force' or 'dynamic'",
                s
            )),
        }
    }
}

/// Run configuration. Every field is optional in JSON and falls back to its default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub budget: f64,
    pub scale: u32,
    pub algorithm: Algorithm,
    pub delimiter: char,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            scale: DEFAULT_SCALE,
            algorithm: Algorithm::default(),
            delimiter: ',',
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings =
            dejsonify(json).map_err(|e| anyhow!("Failed to parse settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(anyhow!("Scale must be a positive integer"));
        }
        if !self.budget.is_finite() {
            return Err(anyhow!("Budget must be a finite number, got {}", self.budget));
        }
        if !self.delimiter.is_ascii() {
            return Err(anyhow!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ));
        }
        Ok(())
    }
}
