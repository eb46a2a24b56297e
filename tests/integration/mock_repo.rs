//! Mock adapters for integration tests.
//!
//! [`RecordingRepository`] wraps the in-memory store, records every
//! mutating call and can be told to fail specific lookups or writes.
//! [`CollectingSink`] keeps every emitted event.

use std::collections::HashSet;

use wifi_selector::adapters::memory_repository::MemoryRepository;
use wifi_selector::app::events::SelectionEvent;
use wifi_selector::app::ports::{EventSink, NetworkRepository, RepositoryError};
use wifi_selector::evaluator::{ConnectablePair, Evaluation, EvaluationContext, NetworkEvaluator};
use wifi_selector::gate::Association;
use wifi_selector::network::{ConfigKey, NetworkId, SecurityType, StoredNetwork};
use wifi_selector::scan::{Bssid, ScanObservation};

pub const PSK: &str = "[WPA2-PSK-CCMP][ESS]";
pub const OPEN: &str = "[ESS]";

// ── Fixtures ──────────────────────────────────────────────────

pub fn bssid(last_octet: u8) -> Bssid {
    Bssid::new([0x6c, 0xf3, 0x7f, 0xae, 0x8c, last_octet])
}

pub fn obs(ssid: &str, last_octet: u8, freq: u32, rssi: i32, caps: &str) -> ScanObservation {
    ScanObservation::new(ssid, bssid(last_octet), freq, rssi, caps, 0).unwrap()
}

pub fn connected_to(id: NetworkId, last_octet: u8, freq: u32, rssi: i32) -> Association {
    Association {
        network_id: Some(id),
        bssid: Some(bssid(last_octet)),
        frequency_mhz: freq,
        rssi_dbm: rssi,
    }
}

// ── Repository call record ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    CreateEphemeral(String),
    RecordCandidate { id: NetworkId, score: i32 },
    ClearCandidate(NetworkId),
    SetEnabled { id: NetworkId, enabled: bool },
    ClearConnectChoice(NetworkId),
    SetConnectChoice { id: NetworkId, key: ConfigKey },
    SetSeen { id: NetworkId, seen: bool },
}

// ── RecordingRepository ───────────────────────────────────────

#[derive(Default)]
pub struct RecordingRepository {
    pub inner: MemoryRepository,
    pub calls: Vec<RepoCall>,
    /// `resolve` fails for observations with these SSIDs.
    pub fail_resolve: HashSet<String>,
    /// Connect-choice writes to these ids fail.
    pub fail_choice_writes: HashSet<NetworkId>,
}

#[allow(dead_code)]
impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ssid: &str, security: SecurityType) -> NetworkId {
        self.inner.add_network(ssid, security).unwrap()
    }

    pub fn get(&self, id: NetworkId) -> StoredNetwork {
        self.inner.network(id).unwrap()
    }

    pub fn seen(&self, id: NetworkId) -> bool {
        self.get(id).status.seen_in_last_round
    }

    pub fn choice_of(&self, id: NetworkId) -> Option<ConfigKey> {
        self.get(id).status.connect_choice.map(|c| c.config_key)
    }

    pub fn take_calls(&mut self) -> Vec<RepoCall> {
        std::mem::take(&mut self.calls)
    }
}

impl NetworkRepository for RecordingRepository {
    fn resolve(
        &self,
        observation: &ScanObservation,
    ) -> Result<Option<StoredNetwork>, RepositoryError> {
        if self.fail_resolve.contains(observation.ssid()) {
            return Err(RepositoryError::IoError);
        }
        self.inner.resolve(observation)
    }

    fn create_ephemeral(
        &mut self,
        observation: &ScanObservation,
    ) -> Result<StoredNetwork, RepositoryError> {
        self.calls
            .push(RepoCall::CreateEphemeral(observation.ssid().to_string()));
        self.inner.create_ephemeral(observation)
    }

    fn network(&self, id: NetworkId) -> Option<StoredNetwork> {
        self.inner.network(id)
    }

    fn saved_networks(&self) -> Vec<StoredNetwork> {
        self.inner.saved_networks()
    }

    fn all_networks(&self) -> Vec<StoredNetwork> {
        self.inner.all_networks()
    }

    fn record_candidate(
        &mut self,
        id: NetworkId,
        observation: &ScanObservation,
        score: i32,
    ) -> Result<(), RepositoryError> {
        self.calls.push(RepoCall::RecordCandidate { id, score });
        self.inner.record_candidate(id, observation, score)
    }

    fn clear_candidate(&mut self, id: NetworkId) -> Result<(), RepositoryError> {
        self.calls.push(RepoCall::ClearCandidate(id));
        self.inner.clear_candidate(id)
    }

    fn set_enabled(&mut self, id: NetworkId, enabled: bool) -> Result<(), RepositoryError> {
        self.calls.push(RepoCall::SetEnabled { id, enabled });
        self.inner.set_enabled(id, enabled)
    }

    fn clear_connect_choice(&mut self, id: NetworkId) -> Result<(), RepositoryError> {
        self.calls.push(RepoCall::ClearConnectChoice(id));
        self.inner.clear_connect_choice(id)
    }

    fn set_connect_choice(
        &mut self,
        id: NetworkId,
        chosen: &ConfigKey,
        timestamp_ms: u64,
    ) -> Result<(), RepositoryError> {
        self.calls.push(RepoCall::SetConnectChoice {
            id,
            key: chosen.clone(),
        });
        if self.fail_choice_writes.contains(&id) {
            return Err(RepositoryError::IoError);
        }
        self.inner.set_connect_choice(id, chosen, timestamp_ms)
    }

    fn set_seen_in_last_round(&mut self, id: NetworkId, seen: bool) -> Result<(), RepositoryError> {
        self.calls.push(RepoCall::SetSeen { id, seen });
        self.inner.set_seen_in_last_round(id, seen)
    }

    fn last_selected_network_id(&self) -> Option<NetworkId> {
        self.inner.last_selected_network_id()
    }

    fn last_selected_timestamp_ms(&self) -> Option<u64> {
        self.inner.last_selected_timestamp_ms()
    }
}

// ── CollectingSink ────────────────────────────────────────────

#[derive(Default)]
pub struct CollectingSink {
    pub events: Vec<SelectionEvent>,
}

#[allow(dead_code)]
impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&SelectionEvent> {
        self.events.last()
    }
}

impl EventSink for CollectingSink {
    fn emit(&mut self, event: &SelectionEvent) {
        self.events.push(event.clone());
    }
}

// ── Test evaluator ────────────────────────────────────────────

/// Proposes the first (or last) observation that resolves to any profile.
pub struct PickResolvable {
    pub name: &'static str,
    pub pick_last: bool,
}

impl NetworkEvaluator for PickResolvable {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(
        &mut self,
        scan: &[ScanObservation],
        _ctx: &EvaluationContext<'_>,
        repo: &mut dyn NetworkRepository,
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();
        for observation in scan {
            if let Ok(Some(network)) = repo.resolve(observation) {
                evaluation.connectable.push(ConnectablePair {
                    observation: observation.clone(),
                    network,
                });
            }
        }
        let pick = if self.pick_last {
            evaluation.connectable.last()
        } else {
            evaluation.connectable.first()
        };
        evaluation.proposal = pick.map(|p| p.network.clone());
        evaluation
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Selector plus mocks, driven one round at a time.
pub struct World {
    pub selector: wifi_selector::NetworkSelector,
    pub repo: RecordingRepository,
    pub clock: wifi_selector::adapters::clock::ManualClock,
    pub sink: CollectingSink,
    pub blacklist: HashSet<Bssid>,
    pub untrusted_allowed: bool,
}

#[allow(dead_code)]
impl World {
    pub fn new() -> Self {
        Self::with_config(wifi_selector::config::SelectorConfig::default())
    }

    pub fn with_config(config: wifi_selector::config::SelectorConfig) -> Self {
        Self {
            selector: wifi_selector::NetworkSelector::with_default_evaluators(config).unwrap(),
            repo: RecordingRepository::new(),
            clock: wifi_selector::adapters::clock::ManualClock::new(1_700_000_000_000),
            sink: CollectingSink::new(),
            blacklist: HashSet::new(),
            untrusted_allowed: false,
        }
    }

    pub fn round(
        &mut self,
        at_ms: u64,
        scan: &[ScanObservation],
        association: Association,
        link: wifi_selector::gate::LinkState,
    ) -> Option<StoredNetwork> {
        self.clock.set_elapsed_ms(at_ms);
        let request = wifi_selector::SelectionRequest {
            scan,
            blacklist: &self.blacklist,
            association,
            link,
            untrusted_allowed: self.untrusted_allowed,
        };
        self.selector
            .select_network(&request, &mut self.repo, &self.clock, &mut self.sink)
    }

    pub fn disconnected_round(&mut self, at_ms: u64, scan: &[ScanObservation]) -> Option<StoredNetwork> {
        self.round(
            at_ms,
            scan,
            Association::none(),
            wifi_selector::gate::LinkState::Disconnected,
        )
    }

    pub fn choose(&mut self, id: NetworkId) -> bool {
        self.selector
            .set_user_connect_choice(id, &mut self.repo, &self.clock, &mut self.sink)
    }

    pub fn connectable_ids(&self) -> Vec<NetworkId> {
        self.selector
            .connectable_scan_details()
            .iter()
            .map(|p| p.network.id)
            .collect()
    }
}
