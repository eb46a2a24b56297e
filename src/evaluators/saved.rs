//! Scores observations of user-saved networks.

use std::collections::HashMap;

use log::{debug, warn};

use crate::app::ports::NetworkRepository;
use crate::evaluator::{ConnectablePair, Evaluation, EvaluationContext, NetworkEvaluator};
use crate::network::{NetworkId, StoredNetwork};
use crate::scan::{Band, ScanObservation};

const MS_PER_MINUTE: u64 = 60_000;

/// Range a radio can meaningfully report; anything outside is clamped.
const RSSI_RANGE_DBM: (i32, i32) = (-127, 0);

/// Proposes the best-scoring enabled saved network.
#[derive(Debug, Default)]
pub struct SavedNetworkEvaluator;

impl SavedNetworkEvaluator {
    pub const NAME: &'static str = "SavedNetworkEvaluator";

    pub fn new() -> Self {
        Self
    }
}

/// Who the user last picked and when (elapsed-since-boot).
#[derive(Debug, Clone, Copy)]
struct LastSelection {
    id: NetworkId,
    timestamp_ms: u64,
}

/// Score one observation of `network`.
fn score(
    observation: &ScanObservation,
    network: &StoredNetwork,
    ctx: &EvaluationContext<'_>,
    last: Option<LastSelection>,
) -> i32 {
    let weights = &ctx.config.scoring;
    let band = observation.band();

    let rssi = observation.rssi_dbm().clamp(RSSI_RANGE_DBM.0, RSSI_RANGE_DBM.1);
    let rssi = match ctx.config.thresholds(band) {
        Some(t) => rssi.min(t.saturated),
        None => rssi,
    };
    let mut score = rssi
        .saturating_add(weights.rssi_score_offset)
        .saturating_mul(weights.rssi_score_slope);

    if band == Band::Ghz5 {
        score = score.saturating_add(weights.band_5ghz_award);
    }

    if let Some(last) = last.filter(|l| l.id == network.id) {
        let minutes = ctx.now_ms.saturating_sub(last.timestamp_ms) / MS_PER_MINUTE;
        let minutes = i32::try_from(minutes).unwrap_or(i32::MAX);
        score = score.saturating_add(weights.last_selection_award.saturating_sub(minutes).max(0));
    }

    if ctx.current_network == Some(network.id) {
        score = score.saturating_add(weights.same_network_award);
        if ctx.current_bssid == Some(observation.bssid()) {
            score = score.saturating_add(weights.same_bssid_award);
        }
    }

    if !network.is_open() {
        score = score.saturating_add(weights.security_award);
    }

    score
}

impl NetworkEvaluator for SavedNetworkEvaluator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, _scan: &[ScanObservation], repo: &mut dyn NetworkRepository) {
        for network in repo.saved_networks() {
            if network.status.candidate.is_none() && network.status.candidate_score.is_none() {
                continue;
            }
            if let Err(e) = repo.clear_candidate(network.id) {
                warn!("{}: clear candidate of {}: {}", Self::NAME, network, e);
            }
        }
    }

    fn evaluate(
        &mut self,
        scan: &[ScanObservation],
        ctx: &EvaluationContext<'_>,
        repo: &mut dyn NetworkRepository,
    ) -> Evaluation {
        let last = repo
            .last_selected_network_id()
            .zip(repo.last_selected_timestamp_ms())
            .map(|(id, timestamp_ms)| LastSelection { id, timestamp_ms });

        let mut evaluation = Evaluation::default();
        let mut best_score: Option<i32> = None;
        let mut recorded: HashMap<NetworkId, i32> = HashMap::new();

        for observation in scan {
            let network = match repo.resolve(observation) {
                Ok(Some(n)) => n,
                Ok(None) => continue,
                Err(e) => {
                    warn!("{}: resolve {}: {}", Self::NAME, observation, e);
                    continue;
                }
            };
            if network.ephemeral || !network.status.is_enabled() {
                continue;
            }

            let s = score(observation, &network, ctx, last);
            debug!("{}: {} -> {} score {}", Self::NAME, observation, network, s);

            if recorded.get(&network.id).is_none_or(|&prev| s > prev) {
                match repo.record_candidate(network.id, observation, s) {
                    Ok(()) => {
                        recorded.insert(network.id, s);
                    }
                    Err(e) => warn!("{}: record candidate {}: {}", Self::NAME, network, e),
                }
            }

            if best_score.is_none_or(|b| s > b) {
                best_score = Some(s);
                evaluation.proposal = Some(network.clone());
            }

            evaluation.connectable.push(ConnectablePair {
                observation: observation.clone(),
                network,
            });
        }

        evaluation
    }
}
