// ⚙️ Thresholds - Notification limits as data
//
// The two limits an account checks after every balance update.
// Defaults are the built-in constants; a JSON file can override either one.

use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const LARGE_TRANSACTION_THRESHOLD: f64 = 9999.99;
pub const LOW_BALANCE_LEVEL: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Balance above this publishes a large-transaction notification
    #[serde(default = "default_large_transaction_threshold")]
    pub large_transaction_threshold: f64,

    /// Balance below this publishes a low-balance notification
    #[serde(default = "default_low_balance_level")]
    pub low_balance_level: f64,
}

fn default_large_transaction_threshold() -> f64 {
    LARGE_TRANSACTION_THRESHOLD
}

fn default_low_balance_level() -> f64 {
    LOW_BALANCE_LEVEL
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            large_transaction_threshold: LARGE_TRANSACTION_THRESHOLD,
            low_balance_level: LOW_BALANCE_LEVEL,
        }
    }
}

impl Thresholds {
    /// Load thresholds from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read thresholds file: {:?}", path.as_ref()))?;

        let thresholds: Thresholds =
            serde_json::from_str(&content).context("Failed to parse thresholds JSON")?;

        thresholds.validate()?;
        Ok(thresholds)
    }

    /// True when both limits are finite numbers
    pub fn is_finite(&self) -> bool {
        self.large_transaction_threshold.is_finite() && self.low_balance_level.is_finite()
    }

    /// Both limits must be finite numbers
    pub fn validate(&self) -> Result<()> {
        if !self.large_transaction_threshold.is_finite() {
            bail!(
                "large_transaction_threshold must be finite, got {}",
                self.large_transaction_threshold
            );
        }
        if !self.low_balance_level.is_finite() {
            bail!("low_balance_level must be finite, got {}", self.low_balance_level);
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
