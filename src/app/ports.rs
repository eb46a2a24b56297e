//! Port traits: the hexagonal boundary between selection logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NetworkSelector (domain)
//! ```
//!
//! Driven adapters (profile store, clock, event sinks) implement these
//! traits.  The [`NetworkSelector`](super::selector::NetworkSelector)
//! consumes them via generics at each call site, so the domain core never
//! touches storage or the system clock directly.
//!
//! ## Contract notes
//!
//! - Every repository call is a fast local lookup or write.  Whatever
//!   out-of-process persistence it triggers is the adapter's business.
//! - Mutations must not be interleaved with an in-progress round; the
//!   `&mut` receivers make the caller serialise them.

use core::fmt;

use crate::network::{ConfigKey, NetworkId, StoredNetwork};
use crate::scan::ScanObservation;

// ───────────────────────────────────────────────────────────────
// Network repository (driven adapter: domain ↔ profile store)
// ───────────────────────────────────────────────────────────────

/// Resolves scan observations to stored profiles and records selection
/// metadata on them.
pub trait NetworkRepository {
    /// Map an observation to its stored profile (by SSID + security).
    /// `Ok(None)` means no profile; errors are treated the same way by
    /// the selector.
    fn resolve(&self, observation: &ScanObservation)
    -> Result<Option<StoredNetwork>, RepositoryError>;

    /// Create (or return the existing) ephemeral profile for an open
    /// observation.  Used only when untrusted networks are allowed.
    fn create_ephemeral(
        &mut self,
        observation: &ScanObservation,
    ) -> Result<StoredNetwork, RepositoryError>;

    /// Look up a profile by id.
    fn network(&self, id: NetworkId) -> Option<StoredNetwork>;

    /// Every user-saved (non-ephemeral) profile, ordered by id.
    fn saved_networks(&self) -> Vec<StoredNetwork>;

    /// Every profile, ephemeral ones included, ordered by id.
    fn all_networks(&self) -> Vec<StoredNetwork>;

    /// Attach the best observation of this round and its score.
    fn record_candidate(
        &mut self,
        id: NetworkId,
        observation: &ScanObservation,
        score: i32,
    ) -> Result<(), RepositoryError>;

    /// Drop candidate metadata from a previous round.
    fn clear_candidate(&mut self, id: NetworkId) -> Result<(), RepositoryError>;

    fn set_enabled(&mut self, id: NetworkId, enabled: bool) -> Result<(), RepositoryError>;

    fn clear_connect_choice(&mut self, id: NetworkId) -> Result<(), RepositoryError>;

    fn set_connect_choice(
        &mut self,
        id: NetworkId,
        chosen: &ConfigKey,
        timestamp_ms: u64,
    ) -> Result<(), RepositoryError>;

    fn set_seen_in_last_round(&mut self, id: NetworkId, seen: bool)
    -> Result<(), RepositoryError>;

    /// Network the user most recently picked by hand, if any.
    fn last_selected_network_id(&self) -> Option<NetworkId>;

    /// Elapsed-since-boot time of that pick.
    fn last_selected_timestamp_ms(&self) -> Option<u64>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Time source.  Elapsed time drives hysteresis; wall-clock time only
/// stamps user connect choices.
pub trait Clock {
    /// Monotonic milliseconds since boot.
    fn elapsed_since_boot_ms(&self) -> u64;

    /// Milliseconds since the Unix epoch.
    fn wall_clock_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The selector emits structured [`SelectionEvent`](super::events::SelectionEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::SelectionEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`NetworkRepository`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryError {
    /// No profile with this id.
    UnknownNetwork(NetworkId),
    /// Ephemeral profiles can only be made for open observations.
    NotOpen,
    /// Backing store failed.
    IoError,
    /// Stored blob failed to decode.
    Corrupted,
    /// The id counter cannot advance any further.
    IdsExhausted,
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNetwork(id) => write!(f, "unknown network id {}", id),
            Self::NotOpen => write!(f, "observation is not an open network"),
            Self::IoError => write!(f, "I/O error"),
            Self::Corrupted => write!(f, "profile store corrupted"),
            Self::IdsExhausted => write!(f, "no network ids left"),
        }
    }
}

impl std::error::Error for RepositoryError {}
