//! Outbound selection events.
//!
//! The [`NetworkSelector`](super::selector::NetworkSelector) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use serde::Serialize;

use crate::gate::SkipReason;
use crate::network::NetworkId;

/// Structured events emitted by the selection core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SelectionEvent {
    /// The round stopped before evaluation; no candidate.
    RoundSkipped(SkipReason),

    /// Evaluation ran to completion.
    RoundCompleted(RoundSummary),

    /// A user connect choice replaced the evaluators' proposal.
    CandidateOverridden { proposed: NetworkId, chosen: NetworkId },

    /// The user explicitly picked a network.
    UserChoiceSet {
        network_id: NetworkId,
        /// How many co-visible networks now point at it.
        overridden: usize,
    },
}

/// Outcome of a completed round, suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub candidate: Option<NetworkId>,
    pub scanned: usize,
    pub filtered: usize,
    pub connectable: usize,
    pub open_unsaved: usize,
}
