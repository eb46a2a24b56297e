//! Evaluator registry.
//!
//! Evaluators are pluggable selection policies kept in a fixed-size,
//! priority-sorted table.  Each round every evaluator sees the filtered
//! snapshot in priority order (lowest value first); the connectable pairs
//! they report are concatenated into the round's connectable set, and one
//! of their proposals becomes the candidate according to
//! [`ProposalResolution`].
//!
//! ```text
//!  filtered ──▶ [prio 0] ──▶ [prio 1] ──▶ … ──▶ (candidate, connectable)
//! ```

use log::debug;

use crate::app::ports::NetworkRepository;
use crate::config::{ProposalResolution, SelectorConfig};
use crate::error::RegistryError;
use crate::gate::LinkState;
use crate::network::{NetworkId, StoredNetwork};
use crate::scan::{Bssid, ScanObservation};

/// Maximum number of evaluators registered at once.
pub const MAX_EVALUATORS: usize = 6;

// ───────────────────────────────────────────────────────────────
// Connectable set
// ───────────────────────────────────────────────────────────────

/// An observation together with the stored profile it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectablePair {
    pub observation: ScanObservation,
    pub network: StoredNetwork,
}

/// Ordered pairs produced by one round.
pub type ConnectableSet = Vec<ConnectablePair>;

// ───────────────────────────────────────────────────────────────
// Evaluator trait
// ───────────────────────────────────────────────────────────────

/// Per-round inputs shared by every evaluator.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub current_network: Option<NetworkId>,
    pub current_bssid: Option<Bssid>,
    pub link: LinkState,
    pub untrusted_allowed: bool,
    /// Elapsed-since-boot time of this round.
    pub now_ms: u64,
    pub config: &'a SelectorConfig,
}

/// What one evaluator produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub proposal: Option<StoredNetwork>,
    pub connectable: Vec<ConnectablePair>,
}

/// A selection policy.
pub trait NetworkEvaluator {
    /// Unique name, used for registration and logging.
    fn name(&self) -> &str;

    /// Called with the raw snapshot before filtering.
    fn update(&mut self, _scan: &[ScanObservation], _repo: &mut dyn NetworkRepository) {}

    /// Inspect the filtered snapshot and optionally propose a network.
    fn evaluate(
        &mut self,
        scan: &[ScanObservation],
        ctx: &EvaluationContext<'_>,
        repo: &mut dyn NetworkRepository,
    ) -> Evaluation;
}

// ───────────────────────────────────────────────────────────────
// Registry
// ───────────────────────────────────────────────────────────────

struct Slot {
    priority: u8,
    evaluator: Box<dyn NetworkEvaluator>,
}

/// Outcome of running every registered evaluator once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryOutcome {
    pub candidate: Option<StoredNetwork>,
    pub connectable: ConnectableSet,
}

/// Priority-ordered evaluator table.
#[derive(Default)]
pub struct EvaluatorRegistry {
    slots: heapless::Vec<Slot, MAX_EVALUATORS>,
}

impl EvaluatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an evaluator.  Equal priorities keep registration order.
    pub fn register(
        &mut self,
        evaluator: Box<dyn NetworkEvaluator>,
        priority: u8,
    ) -> Result<(), RegistryError> {
        if self.names().any(|n| n == evaluator.name()) {
            return Err(RegistryError::DuplicateName);
        }
        self.slots
            .push(Slot {
                priority,
                evaluator,
            })
            .map_err(|_| RegistryError::Full)?;
        // Stable sort: insertion order survives among equal priorities.
        self.slots.sort_by_key(|s| s.priority);
        Ok(())
    }

    /// Registered names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.evaluator.name())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Hand the raw snapshot to every evaluator.
    pub fn update(&mut self, scan: &[ScanObservation], repo: &mut dyn NetworkRepository) {
        for slot in self.slots.iter_mut() {
            slot.evaluator.update(scan, repo);
        }
    }

    /// Run every evaluator over the filtered snapshot.
    pub fn evaluate(
        &mut self,
        scan: &[ScanObservation],
        ctx: &EvaluationContext<'_>,
        repo: &mut dyn NetworkRepository,
    ) -> RegistryOutcome {
        let mut outcome = RegistryOutcome::default();

        for slot in self.slots.iter_mut() {
            let Evaluation {
                proposal,
                connectable,
            } = slot.evaluator.evaluate(scan, ctx, repo);

            debug!(
                "{}: proposal={:?} connectable={}",
                slot.evaluator.name(),
                proposal.as_ref().map(|n| n.id),
                connectable.len()
            );
            outcome.connectable.extend(connectable);

            if let Some(network) = proposal {
                match ctx.config.proposal_resolution {
                    ProposalResolution::LastWins => outcome.candidate = Some(network),
                    ProposalResolution::FirstWins => {
                        outcome.candidate.get_or_insert(network);
                    }
                }
            }
        }

        outcome
    }
}
