//! Selector configuration parameters
//!
//! All tunable parameters for network selection.  RSSI thresholds are
//! platform configuration, not policy: a device integrator supplies them
//! (JSON file, provisioning, vendor overlay) and the engine only compares
//! against them.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scan::Band;

/// Default minimum gap between two selection rounds while associated.
pub const MINIMUM_NETWORK_SELECTION_INTERVAL_MS: u64 = 10_000;

/// RSSI thresholds (dBm) for one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssiThresholds {
    /// Observations strictly below this are dropped before evaluation.
    pub floor: i32,
    /// The current network must be at or above this to count as sufficient.
    pub qualified: i32,
    /// Scoring stops rewarding signal above this.
    pub saturated: i32,
}

/// Which evaluator proposal becomes the round's candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProposalResolution {
    /// The last evaluator in priority order that proposes wins.
    #[default]
    LastWins,
    /// The first evaluator in priority order that proposes wins.
    FirstWins,
}

/// Score weights for the saved-network evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub rssi_score_offset: i32,
    pub rssi_score_slope: i32,
    pub band_5ghz_award: i32,
    /// Decays by one point per minute since the user picked the network.
    pub last_selection_award: i32,
    pub same_network_award: i32,
    pub same_bssid_award: i32,
    pub security_award: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rssi_score_offset: 85,
            rssi_score_slope: 4,
            band_5ghz_award: 40,
            last_selection_award: 480,
            same_network_award: 16,
            same_bssid_award: 24,
            security_award: 80,
        }
    }
}

/// Core selector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    // --- RSSI ---
    pub thresholds_24ghz: RssiThresholds,
    pub thresholds_5ghz: RssiThresholds,

    // --- Hysteresis ---
    /// Minimum gap between selections while connected (milliseconds)
    pub min_selection_interval_ms: u64,
    /// Whether to reselect at all while associated
    pub associated_selection_enabled: bool,

    // --- Evaluation ---
    pub proposal_resolution: ProposalResolution,
    pub scoring: ScoringConfig,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            thresholds_24ghz: RssiThresholds {
                floor: -85,
                qualified: -73,
                saturated: -60,
            },
            thresholds_5ghz: RssiThresholds {
                floor: -82,
                qualified: -70,
                saturated: -57,
            },

            min_selection_interval_ms: MINIMUM_NETWORK_SELECTION_INTERVAL_MS,
            associated_selection_enabled: true,

            proposal_resolution: ProposalResolution::LastWins,
            scoring: ScoringConfig::default(),
        }
    }
}

impl SelectorConfig {
    /// Thresholds for `band`, or `None` where no thresholds apply.
    pub fn thresholds(&self, band: Band) -> Option<&RssiThresholds> {
        match band {
            Band::Ghz24 => Some(&self.thresholds_24ghz),
            Band::Ghz5 => Some(&self.thresholds_5ghz),
            Band::Other => None,
        }
    }

    /// Range-check the configuration.  Rejects, never clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (t, msg) in [
            (
                &self.thresholds_24ghz,
                "2.4GHz thresholds must satisfy floor <= qualified <= saturated",
            ),
            (
                &self.thresholds_5ghz,
                "5GHz thresholds must satisfy floor <= qualified <= saturated",
            ),
        ] {
            if t.floor > t.qualified || t.qualified > t.saturated {
                return Err(ConfigError::ValidationFailed(msg));
            }
        }
        if self.scoring.rssi_score_slope <= 0 {
            return Err(ConfigError::ValidationFailed(
                "rssi_score_slope must be positive",
            ));
        }
        Ok(())
    }
}
