//! Network selector: the hexagonal core.
//!
//! [`NetworkSelector`] owns the configuration, the evaluator registry and
//! the per-radio [`SelectorState`].  Repository, clock and event sink are
//! injected at each call site, so the whole engine runs against mocks.
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!  snapshot ────▶ │ filter ─▶ gate ─▶ evaluators ─▶ overlay  │ ──▶ candidate
//!                 └──────────────────────────────────────────┘
//!                     │                         │
//!        NetworkRepository ◀──── reads/writes ──┘      EventSink ◀── events
//! ```
//!
//! A round that stops before evaluation leaves both auxiliary views empty
//! and does not touch `seen_in_last_round`.

use std::collections::{BTreeSet, HashSet};

use log::{debug, info, warn};

use crate::config::SelectorConfig;
use crate::error::{ConfigError, RegistryError};
use crate::evaluator::{
    ConnectablePair, ConnectableSet, EvaluationContext, EvaluatorRegistry, NetworkEvaluator,
};
use crate::evaluators::{
    SAVED_PRIORITY, SavedNetworkEvaluator, UNTRUSTED_PRIORITY, UntrustedNetworkEvaluator,
};
use crate::filter::filter_scan;
use crate::gate::{self, Association, GateInput, LinkState, SkipReason};
use crate::network::{NetworkId, StoredNetwork};
use crate::scan::{Bssid, ScanObservation};
use crate::user_choice;

use super::events::{RoundSummary, SelectionEvent};
use super::ports::{Clock, EventSink, NetworkRepository};

// ───────────────────────────────────────────────────────────────
// Request / state
// ───────────────────────────────────────────────────────────────

/// Inputs of one selection request.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    /// Raw scan snapshot.
    pub scan: &'a [ScanObservation],
    pub blacklist: &'a HashSet<Bssid>,
    pub association: Association,
    pub link: LinkState,
    /// Whether open networks without a saved profile may be proposed.
    pub untrusted_allowed: bool,
}

/// Per-radio selection state, replaced at the end of every round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorState {
    /// Elapsed-since-boot time of the last round that reached evaluation.
    last_selection_ms: Option<u64>,
    connectable: ConnectableSet,
    open_unsaved: Vec<ScanObservation>,
}

impl SelectorState {
    pub fn last_selection_ms(&self) -> Option<u64> {
        self.last_selection_ms
    }

    fn clear_views(&mut self) {
        self.connectable.clear();
        self.open_unsaved.clear();
    }
}

// ───────────────────────────────────────────────────────────────
// NetworkSelector
// ───────────────────────────────────────────────────────────────

pub struct NetworkSelector {
    config: SelectorConfig,
    registry: EvaluatorRegistry,
    state: SelectorState,
}

impl NetworkSelector {
    /// Build a selector with an empty evaluator table.
    pub fn new(config: SelectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            registry: EvaluatorRegistry::new(),
            state: SelectorState::default(),
        })
    }

    /// Build a selector with the untrusted and saved evaluators registered.
    pub fn with_default_evaluators(config: SelectorConfig) -> crate::error::Result<Self> {
        let mut selector = Self::new(config)?;
        selector.register_evaluator(Box::new(UntrustedNetworkEvaluator::new()), UNTRUSTED_PRIORITY)?;
        selector.register_evaluator(Box::new(SavedNetworkEvaluator::new()), SAVED_PRIORITY)?;
        Ok(selector)
    }

    /// Add an evaluator.  Lower priorities run first.
    pub fn register_evaluator(
        &mut self,
        evaluator: Box<dyn NetworkEvaluator>,
        priority: u8,
    ) -> Result<(), RegistryError> {
        let name = evaluator.name().to_string();
        self.registry.register(evaluator, priority)?;
        info!("selector: registered {} at priority {}", name, priority);
        Ok(())
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn evaluator_names(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    // ── Selection round ───────────────────────────────────────

    /// Run one selection round.  Returns the network to associate with,
    /// or `None` to stay put.
    pub fn select_network(
        &mut self,
        request: &SelectionRequest<'_>,
        repo: &mut impl NetworkRepository,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Option<StoredNetwork> {
        let now_ms = clock.elapsed_since_boot_ms();

        self.registry.update(request.scan, repo);

        let filtered = filter_scan(request.scan, request.blacklist, &self.config);
        if filtered.kept.is_empty() {
            return self.skip(SkipReason::NoUsableObservations, sink);
        }

        let current = request.association.network_id.and_then(|id| repo.network(id));
        let gate_input = GateInput {
            link: request.link,
            association: &request.association,
            current: current.as_ref(),
            filtered: &filtered.kept,
            last_selection_ms: self.state.last_selection_ms,
            now_ms,
        };
        if let Err(reason) = gate::check(&gate_input, &self.config) {
            return self.skip(reason, sink);
        }

        let ctx = EvaluationContext {
            current_network: request.association.network_id,
            current_bssid: request.association.bssid,
            link: request.link,
            untrusted_allowed: request.untrusted_allowed,
            now_ms,
            config: &self.config,
        };
        let outcome = self.registry.evaluate(&filtered.kept, &ctx, repo);

        refresh_seen_flags(&outcome.connectable, repo);
        let open_unsaved = collect_open_unsaved(&filtered.kept, &*repo);

        let candidate = outcome.candidate.map(|proposal| {
            match user_choice::apply_user_choice(&proposal, &outcome.connectable, &*repo) {
                Some(chosen) => {
                    info!("selector: user choice {} overrides {}", chosen, proposal);
                    sink.emit(&SelectionEvent::CandidateOverridden {
                        proposed: proposal.id,
                        chosen: chosen.id,
                    });
                    chosen
                }
                None => repo.network(proposal.id).unwrap_or(proposal),
            }
        });

        self.state.last_selection_ms = Some(now_ms);
        self.state.connectable = outcome.connectable;
        self.state.open_unsaved = open_unsaved;

        let summary = RoundSummary {
            candidate: candidate.as_ref().map(|n| n.id),
            scanned: request.scan.len(),
            filtered: filtered.kept.len(),
            connectable: self.state.connectable.len(),
            open_unsaved: self.state.open_unsaved.len(),
        };
        match &candidate {
            Some(n) => info!("selector: selected {}", n),
            None => info!("selector: no candidate"),
        }
        sink.emit(&SelectionEvent::RoundCompleted(summary));

        candidate
    }

    fn skip(&mut self, reason: SkipReason, sink: &mut impl EventSink) -> Option<StoredNetwork> {
        info!("selector: round skipped, {}", reason);
        self.state.clear_views();
        sink.emit(&SelectionEvent::RoundSkipped(reason));
        None
    }

    // ── Views ─────────────────────────────────────────────────

    /// Connectable pairs of the last round; empty before any round.
    pub fn connectable_scan_details(&self) -> &[ConnectablePair] {
        &self.state.connectable
    }

    /// Open observations of the last round without a saved profile.
    /// Ephemeral profiles count as unsaved.
    pub fn filtered_scan_details_for_open_unsaved_networks(&self) -> &[ScanObservation] {
        &self.state.open_unsaved
    }

    // ── User choice ───────────────────────────────────────────

    /// Record that the user explicitly picked `id`.  Returns `false` when
    /// the network is unknown.
    pub fn set_user_connect_choice(
        &mut self,
        id: NetworkId,
        repo: &mut impl NetworkRepository,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> bool {
        match user_choice::set_user_connect_choice(id, repo, clock.wall_clock_ms()) {
            Some(overridden) => {
                sink.emit(&SelectionEvent::UserChoiceSet {
                    network_id: id,
                    overridden,
                });
                true
            }
            None => false,
        }
    }
}

/// Mark exactly the networks in `connectable` as seen.  Every profile is
/// swept, ephemeral ones included.
fn refresh_seen_flags(connectable: &[ConnectablePair], repo: &mut impl NetworkRepository) {
    let seen: BTreeSet<NetworkId> = connectable.iter().map(|p| p.network.id).collect();

    for &id in &seen {
        if let Err(e) = repo.set_seen_in_last_round(id, true) {
            warn!("selector: mark {} seen: {}", id, e);
        }
    }
    for network in repo.all_networks() {
        if network.status.seen_in_last_round && !seen.contains(&network.id) {
            if let Err(e) = repo.set_seen_in_last_round(network.id, false) {
                warn!("selector: clear seen on {}: {}", network, e);
            }
        }
    }
}

/// Open observations with no saved profile.  Ephemeral profiles do not
/// count as saved; a failed lookup counts as no profile.
fn collect_open_unsaved(
    filtered: &[ScanObservation],
    repo: &impl NetworkRepository,
) -> Vec<ScanObservation> {
    filtered
        .iter()
        .filter(|o| o.is_open())
        .filter(|o| match repo.resolve(o) {
            Ok(Some(n)) => n.ephemeral,
            Ok(None) => true,
            Err(e) => {
                warn!("selector: resolve {}: {}", o, e);
                true
            }
        })
        .inspect(|o| debug!("selector: open unsaved {}", o))
        .cloned()
        .collect()
}
