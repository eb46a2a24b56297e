//! Proposes open networks the user never saved.
//!
//! Only active when the request allows untrusted networks.  Each qualifying
//! observation is backed by an ephemeral profile so the rest of the pipeline
//! can treat it like any other stored network.

use log::{debug, warn};

use crate::app::ports::NetworkRepository;
use crate::evaluator::{ConnectablePair, Evaluation, EvaluationContext, NetworkEvaluator};
use crate::scan::ScanObservation;

#[derive(Debug, Default)]
pub struct UntrustedNetworkEvaluator;

impl UntrustedNetworkEvaluator {
    pub const NAME: &'static str = "UntrustedNetworkEvaluator";

    pub fn new() -> Self {
        Self
    }
}

impl NetworkEvaluator for UntrustedNetworkEvaluator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(
        &mut self,
        scan: &[ScanObservation],
        ctx: &EvaluationContext<'_>,
        repo: &mut dyn NetworkRepository,
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();
        if !ctx.untrusted_allowed {
            return evaluation;
        }

        let mut best_rssi = i32::MIN;
        for observation in scan.iter().filter(|o| o.is_open()) {
            let network = match repo.resolve(observation) {
                Ok(Some(n)) if !n.ephemeral => continue,
                Ok(Some(n)) => n,
                Ok(None) => match repo.create_ephemeral(observation) {
                    Ok(n) => n,
                    Err(e) => {
                        warn!("{}: ephemeral for {}: {}", Self::NAME, observation, e);
                        continue;
                    }
                },
                Err(e) => {
                    warn!("{}: resolve {}: {}", Self::NAME, observation, e);
                    continue;
                }
            };
            if !network.status.is_enabled() {
                continue;
            }

            debug!("{}: {} -> {}", Self::NAME, observation, network);
            if evaluation.proposal.is_none() || observation.rssi_dbm() > best_rssi {
                best_rssi = observation.rssi_dbm();
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
