//! Stored network profiles and their selection status.
//!
//! A [`StoredNetwork`] is owned by the repository; the selector only ever
//! holds snapshots of it and asks the repository to change it.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::scan::{ScanObservation, SecurityCaps, Ssid, ssid_from_str};

/// Stable repository identifier of a stored profile.
pub type NetworkId = u32;

// ───────────────────────────────────────────────────────────────
// Security type / config key
// ───────────────────────────────────────────────────────────────

/// Key management a profile is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    Open,
    Wep,
    Psk,
    Sae,
    Eap,
}

impl SecurityType {
    /// Map advertised capability bits to the profile type that would match
    /// them.  PSK wins over SAE so transition-mode BSSes match PSK profiles.
    pub fn from_caps(caps: SecurityCaps) -> Self {
        if caps.contains(SecurityCaps::PSK) {
            Self::Psk
        } else if caps.contains(SecurityCaps::SAE) {
            Self::Sae
        } else if caps.contains(SecurityCaps::EAP) {
            Self::Eap
        } else if caps.contains(SecurityCaps::WEP) {
            Self::Wep
        } else {
            Self::Open
        }
    }

    fn key_mgmt(self) -> &'static str {
        match self {
            Self::Open => "NONE",
            Self::Wep => "WEP",
            Self::Psk => "WPA_PSK",
            Self::Sae => "SAE",
            Self::Eap => "WPA_EAP",
        }
    }
}

/// Profile identity derived from SSID + security, e.g. `"home"WPA_PSK`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigKey(String);

impl ConfigKey {
    pub fn derive(ssid: &str, security: SecurityType) -> Self {
        Self(format!("\"{ssid}\"{}", security.key_mgmt()))
    }

    /// Key a scan observation would match.
    pub fn for_observation(observation: &ScanObservation) -> Self {
        Self::derive(
            observation.ssid(),
            SecurityType::from_caps(observation.security()),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ───────────────────────────────────────────────────────────────
// Selection status
// ───────────────────────────────────────────────────────────────

/// Administrative state of a profile as far as selection is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    Enabled,
    /// Disabled after repeated failures; the repository may re-enable it.
    TemporarilyDisabled,
    /// Disabled until the user picks it explicitly.
    PermanentlyDisabled,
}

/// A user preference recorded on one network pointing at another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectChoice {
    /// Config key of the network the user preferred over this one.
    pub config_key: ConfigKey,
    /// Wall-clock time the preference was recorded.
    pub timestamp_ms: u64,
}

/// Per-profile selection metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionStatus {
    pub state: SelectionState,
    /// Best observation of this profile in the latest round that scored it.
    pub candidate: Option<ScanObservation>,
    pub candidate_score: Option<i32>,
    /// Set when the profile was connectable in the last completed round.
    pub seen_in_last_round: bool,
    pub connect_choice: Option<ConnectChoice>,
}

impl SelectionStatus {
    pub fn is_enabled(&self) -> bool {
        self.state == SelectionState::Enabled
    }
}

// ───────────────────────────────────────────────────────────────
// Stored network
// ───────────────────────────────────────────────────────────────

/// A persisted network profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNetwork {
    pub id: NetworkId,
    pub ssid: Ssid,
    pub security: SecurityType,
    /// Created on the fly for an untrusted open network, never saved by
    /// the user.
    pub ephemeral: bool,
    pub status: SelectionStatus,
}

impl StoredNetwork {
    pub fn new(id: NetworkId, ssid: &str, security: SecurityType) -> Result<Self, ScanError> {
        Ok(Self {
            id,
            ssid: ssid_from_str(ssid)?,
            security,
            ephemeral: false,
            status: SelectionStatus::default(),
        })
    }

    pub fn config_key(&self) -> ConfigKey {
        ConfigKey::derive(&self.ssid, self.security)
    }

    pub fn is_open(&self) -> bool {
        self.security == SecurityType::Open
    }

    /// Whether this profile would be used for the given observation.
    pub fn matches(&self, observation: &ScanObservation) -> bool {
        self.config_key() == ConfigKey::for_observation(observation)
    }
}

impl fmt::Display for StoredNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\":{}", self.ssid, self.id)
    }
}
