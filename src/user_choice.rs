//! User-choice overlay.
//!
//! When the user explicitly picks network N, every other saved network that
//! was connectable in the last completed round gets a *connect choice*
//! pointing at N.  In later rounds, if the evaluators propose one of those
//! networks while N is connectable, N is selected instead.
//!
//! ```text
//!   proposal P ──▶ P.connect_choice == key(U)?  ──▶ U ∈ connectable? ──▶ U
//!                          │ no                          │ no
//!                          ▼                             ▼
//!                          P                             P
//! ```
//!
//! Only one hop is followed: U's own connect choice is not consulted.

use log::{info, warn};

use crate::app::ports::NetworkRepository;
use crate::evaluator::ConnectablePair;
use crate::network::{NetworkId, StoredNetwork};

/// Record the user's explicit pick of `id`.
///
/// Returns how many other networks now prefer it, or `None` when `id` is
/// unknown (nothing is mutated).  `wall_clock_ms` stamps the new choices.
pub fn set_user_connect_choice<R>(id: NetworkId, repo: &mut R, wall_clock_ms: u64) -> Option<usize>
where
    R: NetworkRepository + ?Sized,
{
    let Some(chosen) = repo.network(id) else {
        warn!("user choice: unknown network id {}", id);
        return None;
    };

    if !chosen.status.is_enabled() {
        if let Err(e) = repo.set_enabled(id, true) {
            warn!("user choice: re-enable {}: {}", chosen, e);
        }
    }
    if chosen.status.connect_choice.is_some() {
        if let Err(e) = repo.clear_connect_choice(id) {
            warn!("user choice: clear own choice of {}: {}", chosen, e);
        }
    }

    let key = chosen.config_key();
    let mut overridden = 0;
    for other in repo.saved_networks() {
        if other.id == id || !other.status.seen_in_last_round {
            continue;
        }
        let already = other
            .status
            .connect_choice
            .as_ref()
            .is_some_and(|c| c.config_key == key);
        if already {
            continue;
        }
        match repo.set_connect_choice(other.id, &key, wall_clock_ms) {
            Ok(()) => overridden += 1,
            Err(e) => warn!("user choice: set choice on {}: {}", other, e),
        }
    }

    info!("user choice: {} preferred over {} network(s)", chosen, overridden);
    Some(overridden)
}

/// Replace `proposal` with the network its connect choice points at, if
/// that network is connectable and enabled this round.
pub fn apply_user_choice<R>(
    proposal: &StoredNetwork,
    connectable: &[ConnectablePair],
    repo: &R,
) -> Option<StoredNetwork>
where
    R: NetworkRepository + ?Sized,
{
    // Evaluators may hand back a stale snapshot.
    let current = repo.network(proposal.id);
    let choice = current
        .as_ref()
        .unwrap_or(proposal)
        .status
        .connect_choice
        .as_ref()?;

    let pair = connectable
        .iter()
        .find(|p| p.network.id != proposal.id && p.network.config_key() == choice.config_key)?;

    let chosen = repo
        .network(pair.network.id)
        .unwrap_or_else(|| pair.network.clone());
    if !chosen.status.is_enabled() {
        return None;
    }
    Some(chosen)
}
