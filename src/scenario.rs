//! JSON scenario replay.
//!
//! A scenario lists saved networks and a timeline of steps: scan rounds
//! (with link state and association) and explicit user choices.  Replaying
//! it against a [`MemoryRepository`] yields one [`StepReport`] per step.
//!
//! ```json
//! {
//!   "networks": [{ "ssid": "home", "security": "Psk" }],
//!   "steps": [
//!     { "action": "scan", "at_ms": 0, "link": "Disconnected",
//!       "observations": [{ "ssid": "home", "bssid": "6c:f3:7f:ae:8c:f3",
//!                          "frequency_mhz": 5180, "rssi_dbm": -60,
//!                          "capabilities": "[WPA2-PSK-CCMP][ESS]" }] },
//!     { "action": "user_choice", "at_ms": 20000, "ssid": "home" }
//!   ]
//! }
//! ```

use std::collections::HashSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::adapters::clock::ManualClock;
use crate::adapters::memory_repository::MemoryRepository;
use crate::app::ports::{EventSink, NetworkRepository};
use crate::app::selector::{NetworkSelector, SelectionRequest};
use crate::config::SelectorConfig;
use crate::error::{ConfigError, Result};
use crate::gate::{Association, LinkState};
use crate::network::{NetworkId, SecurityType};
use crate::scan::{Bssid, ScanObservation};

// ───────────────────────────────────────────────────────────────
// Input
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: SelectorConfig,
    pub networks: Vec<SavedNetworkSpec>,
    pub untrusted_allowed: bool,
    pub blacklist: Vec<Bssid>,
    /// Wall-clock time at elapsed zero; stamps user connect choices.
    pub wall_clock_start_ms: u64,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedNetworkSpec {
    pub ssid: String,
    pub security: SecurityType,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationSpec {
    pub ssid: String,
    pub bssid: Bssid,
    pub frequency_mhz: u32,
    pub rssi_dbm: i32,
    #[serde(default)]
    pub capabilities: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationSpec {
    /// SSID of the saved network the device is on.
    pub ssid: Option<String>,
    pub bssid: Bssid,
    pub frequency_mhz: u32,
    pub rssi_dbm: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Scan {
        at_ms: u64,
        link: LinkState,
        #[serde(default)]
        association: Option<AssociationSpec>,
        observations: Vec<ObservationSpec>,
    },
    UserChoice {
        at_ms: u64,
        ssid: String,
    },
}

// ───────────────────────────────────────────────────────────────
// Output
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub at_ms: u64,
    pub action: String,
    /// `"ssid":id` of the chosen network, if any.
    pub candidate: Option<String>,
    pub connectable: Vec<String>,
    pub open_unsaved: Vec<String>,
    /// Result of a user-choice step.
    pub accepted: Option<bool>,
}

// ───────────────────────────────────────────────────────────────
// Replay
// ───────────────────────────────────────────────────────────────

/// Replay every step in order.
pub fn replay(
    scenario: &Scenario,
    repo: &mut MemoryRepository,
    sink: &mut impl EventSink,
) -> Result<Vec<StepReport>> {
    let mut selector = NetworkSelector::with_default_evaluators(scenario.config.clone())?;
    let mut clock = ManualClock::new(scenario.wall_clock_start_ms);
    let blacklist: HashSet<Bssid> = scenario.blacklist.iter().copied().collect();

    for spec in &scenario.networks {
        let id = repo.add_network(&spec.ssid, spec.security)?;
        if spec.disabled {
            repo.set_enabled(id, false)?;
        }
    }

    let mut reports = Vec::with_capacity(scenario.steps.len());
    for step in &scenario.steps {
        let report = match step {
            Step::Scan {
                at_ms,
                link,
                association,
                observations,
            } => {
                clock.set_elapsed_ms(*at_ms);
                let scan = observations
                    .iter()
                    .map(|o| {
                        ScanObservation::new(
                            &o.ssid,
                            o.bssid,
                            o.frequency_mhz,
                            o.rssi_dbm,
                            &o.capabilities,
                            *at_ms,
                        )
                    })
                    .collect::<core::result::Result<Vec<_>, _>>()?;
                let association = match association {
                    Some(a) => Association {
                        network_id: a
                            .ssid
                            .as_deref()
                            .map(|s| saved_id(&*repo, s))
                            .transpose()?,
                        bssid: Some(a.bssid),
                        frequency_mhz: a.frequency_mhz,
                        rssi_dbm: a.rssi_dbm,
                    },
                    None => Association::none(),
                };
                let request = SelectionRequest {
                    scan: &scan,
                    blacklist: &blacklist,
                    association,
                    link: *link,
                    untrusted_allowed: scenario.untrusted_allowed,
                };
                let candidate = selector.select_network(&request, repo, &clock, sink);

                StepReport {
                    at_ms: *at_ms,
                    action: "scan".into(),
                    candidate: candidate.map(|n| n.to_string()),
                    connectable: selector
                        .connectable_scan_details()
                        .iter()
                        .map(|p| p.observation.to_string())
                        .collect(),
                    open_unsaved: selector
                        .filtered_scan_details_for_open_unsaved_networks()
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    accepted: None,
                }
            }
            Step::UserChoice { at_ms, ssid } => {
                clock.set_elapsed_ms(*at_ms);
                let id = saved_id(repo, ssid)?;
                let accepted = selector.set_user_connect_choice(id, repo, &clock, sink);
                if accepted {
                    repo.mark_last_selected(id, *at_ms)?;
                }
                StepReport {
                    at_ms: *at_ms,
                    action: "user_choice".into(),
                    candidate: None,
                    connectable: Vec::new(),
                    open_unsaved: Vec::new(),
                    accepted: Some(accepted),
                }
            }
        };
        reports.push(report);
    }

    info!("scenario: replayed {} step(s)", reports.len());
    Ok(reports)
}

fn saved_id(repo: &MemoryRepository, ssid: &str) -> Result<NetworkId> {
    repo.saved_networks()
        .into_iter()
        .find(|n| n.ssid.as_str() == ssid)
        .map(|n| n.id)
        .ok_or_else(|| ConfigError::ValidationFailed("step names an SSID with no saved network").into())
}
