//! In-memory profile store.
//!
//! Implements [`NetworkRepository`] over a `BTreeMap` keyed by network id.
//! The whole table, connect choices and seen flags included, can be
//! exported as a postcard blob and restored later so user overrides
//! survive a restart.
//!
//! Config keys are unique among saved profiles: adding a profile whose key
//! already exists returns the existing id, and saving the key of an
//! ephemeral profile promotes that profile in place.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{NetworkRepository, RepositoryError};
use crate::error::Error;
use crate::network::{
    ConfigKey, ConnectChoice, NetworkId, SecurityType, SelectionState, StoredNetwork,
};
use crate::scan::ScanObservation;

/// Snapshot format version, bumped on incompatible layout changes.
const SNAPSHOT_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct LastSelected {
    id: NetworkId,
    timestamp_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRepository {
    networks: BTreeMap<NetworkId, StoredNetwork>,
    next_id: NetworkId,
    last_selected: Option<LastSelected>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a profile and return its id.
    pub fn add_network(
        &mut self,
        ssid: &str,
        security: SecurityType,
    ) -> Result<NetworkId, Error> {
        let candidate = StoredNetwork::new(self.next_id, ssid, security)?;
        let key = candidate.config_key();

        if let Some(existing) = self
            .networks
            .values_mut()
            .find(|n| n.config_key() == key)
        {
            if existing.ephemeral {
                info!("repo: promoting ephemeral {} to saved", existing);
                existing.ephemeral = false;
            }
            return Ok(existing.id);
        }

        let id = self.allocate_id()?;
        debug!("repo: saved {}", candidate);
        self.networks.insert(id, candidate);
        Ok(id)
    }

    /// Forget a profile.  Connect choices on other profiles are untouched.
    pub fn remove_network(&mut self, id: NetworkId) -> Option<StoredNetwork> {
        if self.last_selected.is_some_and(|l| l.id == id) {
            self.last_selected = None;
        }
        self.networks.remove(&id)
    }

    /// Every profile, ephemeral ones included, ordered by id.
    pub fn networks(&self) -> Vec<StoredNetwork> {
        self.networks.values().cloned().collect()
    }

    pub fn set_state(&mut self, id: NetworkId, state: SelectionState) -> Result<(), RepositoryError> {
        self.get_mut(id)?.status.state = state;
        Ok(())
    }

    /// Record that the user connected to `id` by hand at `timestamp_ms`
    /// (elapsed since boot).
    pub fn mark_last_selected(&mut self, id: NetworkId, timestamp_ms: u64) -> Result<(), RepositoryError> {
        self.get_mut(id)?;
        self.last_selected = Some(LastSelected { id, timestamp_ms });
        Ok(())
    }

    // ── Persistence ───────────────────────────────────────────

    /// Serialise the whole table.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RepositoryError> {
        let mut bytes = vec![SNAPSHOT_VERSION];
        let body = postcard::to_allocvec(self).map_err(|_| RepositoryError::IoError)?;
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    /// Restore a table written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RepositoryError> {
        let Some((&version, body)) = bytes.split_first() else {
            return Err(RepositoryError::Corrupted);
        };
        if version != SNAPSHOT_VERSION {
            return Err(RepositoryError::Corrupted);
        }
        let mut repo: Self = postcard::from_bytes(body).map_err(|_| RepositoryError::Corrupted)?;
        if let Some(&last) = repo.networks.keys().next_back() {
            let floor = last.checked_add(1).ok_or(RepositoryError::Corrupted)?;
            if repo.next_id < floor {
                warn!("repo: snapshot id counter {} behind id {}, advancing", repo.next_id, last);
                repo.next_id = floor;
            }
        }
        info!("repo: restored {} profile(s)", repo.networks.len());
        Ok(repo)
    }

    /// Hand out `next_id` and advance the counter.
    fn allocate_id(&mut self) -> Result<NetworkId, RepositoryError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(RepositoryError::IdsExhausted)?;
        Ok(id)
    }

    fn get_mut(&mut self, id: NetworkId) -> Result<&mut StoredNetwork, RepositoryError> {
        self.networks
            .get_mut(&id)
            .ok_or(RepositoryError::UnknownNetwork(id))
    }
}

impl NetworkRepository for MemoryRepository {
    fn resolve(
        &self,
        observation: &ScanObservation,
    ) -> Result<Option<StoredNetwork>, RepositoryError> {
        let key = ConfigKey::for_observation(observation);
        Ok(self
            .networks
            .values()
            .find(|n| n.config_key() == key)
            .cloned())
    }

    fn create_ephemeral(
        &mut self,
        observation: &ScanObservation,
    ) -> Result<StoredNetwork, RepositoryError> {
        if !observation.is_open() {
            return Err(RepositoryError::NotOpen);
        }
        if let Some(existing) = self.resolve(observation)? {
            return Ok(existing);
        }

        let mut network = StoredNetwork::new(self.next_id, observation.ssid(), SecurityType::Open)
            .map_err(|_| RepositoryError::Corrupted)?;
        network.ephemeral = true;
        self.allocate_id()?;
        debug!("repo: ephemeral {}", network);
        self.networks.insert(network.id, network.clone());
        Ok(network)
    }

    fn network(&self, id: NetworkId) -> Option<StoredNetwork> {
        self.networks.get(&id).cloned()
    }

    fn saved_networks(&self) -> Vec<StoredNetwork> {
        self.networks
            .values()
            .filter(|n| !n.ephemeral)
            .cloned()
            .collect()
    }

    fn all_networks(&self) -> Vec<StoredNetwork> {
        self.networks()
    }

    fn record_candidate(
        &mut self,
        id: NetworkId,
        observation: &ScanObservation,
        score: i32,
    ) -> Result<(), RepositoryError> {
        let status = &mut self.get_mut(id)?.status;
        status.candidate = Some(observation.clone());
        status.candidate_score = Some(score);
        Ok(())
    }

    fn clear_candidate(&mut self, id: NetworkId) -> Result<(), RepositoryError> {
        let status = &mut self.get_mut(id)?.status;
        status.candidate = None;
        status.candidate_score = None;
        Ok(())
    }

    fn set_enabled(&mut self, id: NetworkId, enabled: bool) -> Result<(), RepositoryError> {
        self.get_mut(id)?.status.state = if enabled {
            SelectionState::Enabled
        } else {
            SelectionState::PermanentlyDisabled
        };
        Ok(())
    }

    fn clear_connect_choice(&mut self, id: NetworkId) -> Result<(), RepositoryError> {
        self.get_mut(id)?.status.connect_choice = None;
        Ok(())
    }

    fn set_connect_choice(
        &mut self,
        id: NetworkId,
        chosen: &ConfigKey,
        timestamp_ms: u64,
    ) -> Result<(), RepositoryError> {
        self.get_mut(id)?.status.connect_choice = Some(ConnectChoice {
            config_key: chosen.clone(),
            timestamp_ms,
        });
        Ok(())
    }

    fn set_seen_in_last_round(&mut self, id: NetworkId, seen: bool) -> Result<(), RepositoryError> {
        self.get_mut(id)?.status.seen_in_last_round = seen;
        Ok(())
    }

    fn last_selected_network_id(&self) -> Option<NetworkId> {
        self.last_selected.map(|l| l.id)
    }

    fn last_selected_timestamp_ms(&self) -> Option<u64> {
        self.last_selected.map(|l| l.timestamp_ms)
    }
}
