//! Connected-state gate.
//!
//! Runs **after filtering and before any evaluator**.  While the device is
//! associated it decides whether a new selection round is worth running at
//! all; every failed check aborts the round.
//!
//! ## Decision sequence (connected)
//!
//! 1. Associated selection disabled in config → skip.
//! 2. Current BSSID missing from the filtered snapshot → skip.  The scan
//!    may simply not have covered our channel; the link layer detects a
//!    real loss of the AP on its own.
//! 3. Less than `min_selection_interval_ms` since the last completed
//!    round → skip, regardless of signal quality or whether that round
//!    produced a candidate.
//! 4. Current network *sufficient* → skip.
//!
//! A disconnected device always proceeds.  A device in the middle of
//! associating or roaming never does.

use core::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SelectorConfig;
use crate::network::{NetworkId, StoredNetwork};
use crate::scan::{Band, Bssid, ScanObservation};

/// Link-layer state at the time of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    Connected,
    Disconnected,
    /// Associating, roaming or obtaining an address.
    Transitioning,
}

/// What the link layer reports about the current association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub network_id: Option<NetworkId>,
    pub bssid: Option<Bssid>,
    pub frequency_mhz: u32,
    pub rssi_dbm: i32,
}

impl Association {
    /// No current association.
    pub const fn none() -> Self {
        Self {
            network_id: None,
            bssid: None,
            frequency_mhz: 0,
            rssi_dbm: i32::MIN,
        }
    }

    pub fn band(&self) -> Band {
        Band::from_frequency(self.frequency_mhz)
    }
}

impl Default for Association {
    fn default() -> Self {
        Self::none()
    }
}

/// Why a round stopped before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Nothing survived the candidate filter.
    NoUsableObservations,
    LinkTransitioning,
    AssociatedSelectionDisabled,
    CurrentBssidNotInScan,
    MinimumIntervalNotElapsed { elapsed_ms: u64 },
    CurrentNetworkSufficient,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoUsableObservations => write!(f, "no usable observations"),
            Self::LinkTransitioning => write!(f, "link in transition"),
            Self::AssociatedSelectionDisabled => write!(f, "associated selection disabled"),
            Self::CurrentBssidNotInScan => write!(f, "current BSSID not in scan"),
            Self::MinimumIntervalNotElapsed { elapsed_ms } => {
                write!(f, "only {}ms since last selection", elapsed_ms)
            }
            Self::CurrentNetworkSufficient => write!(f, "current network sufficient"),
        }
    }
}

/// Everything the gate looks at.
pub struct GateInput<'a> {
    pub link: LinkState,
    pub association: &'a Association,
    /// Current profile as the repository knows it (`None` if unknown).
    pub current: Option<&'a StoredNetwork>,
    pub filtered: &'a [ScanObservation],
    pub last_selection_ms: Option<u64>,
    pub now_ms: u64,
}

/// Decide whether the round may proceed to evaluation.
pub fn check(input: &GateInput<'_>, config: &SelectorConfig) -> Result<(), SkipReason> {
    match input.link {
        LinkState::Disconnected => Ok(()),
        LinkState::Transitioning => Err(SkipReason::LinkTransitioning),
        LinkState::Connected => check_connected(input, config),
    }
}

fn check_connected(input: &GateInput<'_>, config: &SelectorConfig) -> Result<(), SkipReason> {
    if !config.associated_selection_enabled {
        return Err(SkipReason::AssociatedSelectionDisabled);
    }

    let present = input
        .association
        .bssid
        .is_some_and(|cur| input.filtered.iter().any(|o| o.bssid() == cur));
    if !present {
        return Err(SkipReason::CurrentBssidNotInScan);
    }

    if let Some(last) = input.last_selection_ms {
        let elapsed_ms = input.now_ms.saturating_sub(last);
        if elapsed_ms < config.min_selection_interval_ms {
            return Err(SkipReason::MinimumIntervalNotElapsed { elapsed_ms });
        }
    }

    if is_sufficient(input.association, input.current, input.filtered, config) {
        return Err(SkipReason::CurrentNetworkSufficient);
    }

    Ok(())
}

/// Whether the current network is good enough to stay on.
///
/// Open and ephemeral networks never are.  On 2.4 GHz any 5 GHz
/// observation in the snapshot makes the current network insufficient.
pub fn is_sufficient(
    association: &Association,
    current: Option<&StoredNetwork>,
    filtered: &[ScanObservation],
    config: &SelectorConfig,
) -> bool {
    let Some(network) = current else {
        debug!("gate: current network unknown to repository");
        return false;
    };
    if network.ephemeral || network.is_open() {
        debug!("gate: {} is open or ephemeral", network);
        return false;
    }

    let band = association.band();
    if band == Band::Ghz24 && filtered.iter().any(|o| o.band() == Band::Ghz5) {
        debug!("gate: 5GHz available while on 2.4GHz");
        return false;
    }

    match config.thresholds(band) {
        Some(t) if association.rssi_dbm < t.qualified => {
            debug!(
                "gate: RSSI {} below qualified {} on {}",
                association.rssi_dbm, t.qualified, band
            );
            false
        }
        _ => true,
    }
}
