//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each selection event as one
//! structured log line.  A daemon forwarding events elsewhere would
//! implement the same trait.

use log::info;

use crate::app::events::SelectionEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`SelectionEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SelectionEvent) {
        match event {
            SelectionEvent::RoundSkipped(reason) => {
                info!("SKIP  | {}", reason);
            }
            SelectionEvent::RoundCompleted(s) => {
                info!(
                    "ROUND | candidate={} | scanned={} filtered={} connectable={} open_unsaved={}",
                    s.candidate
                        .map_or_else(|| "none".to_string(), |id| id.to_string()),
                    s.scanned,
                    s.filtered,
                    s.connectable,
                    s.open_unsaved,
                );
            }
            SelectionEvent::CandidateOverridden { proposed, chosen } => {
                info!("USER  | override {} -> {}", proposed, chosen);
            }
            SelectionEvent::UserChoiceSet {
                network_id,
                overridden,
            } => {
                info!("USER  | chose {} over {} network(s)", network_id, overridden);
            }
        }
    }
}
