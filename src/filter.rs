//! Candidate filter for raw scan snapshots.
//!
//! Removes observations that can never become candidates: blacklisted
//! BSSIDs, hidden SSIDs, and signals below the band's RSSI floor.  Input
//! order is preserved and duplicates (same SSID on several BSSIDs) are kept.

use std::collections::HashSet;

use log::debug;

use crate::config::SelectorConfig;
use crate::scan::{Bssid, ScanObservation};

/// Result of filtering one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Surviving observations, in input order.
    pub kept: Vec<ScanObservation>,
    pub hidden: usize,
    pub blacklisted: usize,
    pub low_rssi: usize,
}

impl FilterOutcome {
    pub fn dropped(&self) -> usize {
        self.hidden + self.blacklisted + self.low_rssi
    }
}

/// Filter a snapshot against the blacklist and per-band RSSI floors.
pub fn filter_scan(
    scan: &[ScanObservation],
    blacklist: &HashSet<Bssid>,
    config: &SelectorConfig,
) -> FilterOutcome {
    let mut outcome = FilterOutcome {
        kept: Vec::with_capacity(scan.len()),
        ..FilterOutcome::default()
    };

    for observation in scan {
        if observation.ssid().is_empty() {
            debug!("filter: hidden SSID {}", observation.bssid());
            outcome.hidden += 1;
            continue;
        }

        if blacklist.contains(&observation.bssid()) {
            debug!("filter: blacklisted {}", observation);
            outcome.blacklisted += 1;
            continue;
        }

        if below_floor(observation, config) {
            debug!("filter: low RSSI {}", observation);
            outcome.low_rssi += 1;
            continue;
        }

        outcome.kept.push(observation.clone());
    }

    outcome
}

/// Strictly below the floor of its band.  `Band::Other` has no floor.
fn below_floor(observation: &ScanObservation, config: &SelectorConfig) -> bool {
    config
        .thresholds(observation.band())
        .is_some_and(|t| observation.rssi_dbm() < t.floor)
}
