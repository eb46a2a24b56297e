//! Scan observations: one physical BSS seen in one scan cycle.
//!
//! Everything here is raw radio data: untrusted, noisy, and immutable once
//! captured.  Fields are private and exposed through accessors so nothing
//! downstream of the scanner can rewrite what was actually observed.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Maximum SSID length permitted by 802.11.
pub const MAX_SSID_LEN: usize = 32;

/// Fixed-capacity SSID (no heap, rejects over-long names).
pub type Ssid = heapless::String<MAX_SSID_LEN>;

/// Build an [`Ssid`] from a string slice, rejecting names over 32 bytes.
pub fn ssid_from_str(s: &str) -> Result<Ssid, ScanError> {
    let mut ssid = Ssid::new();
    ssid.push_str(s).map_err(|()| ScanError::SsidTooLong)?;
    Ok(ssid)
}

// ───────────────────────────────────────────────────────────────
// BSSID
// ───────────────────────────────────────────────────────────────

/// 48-bit BSSID of an access point radio.
///
/// Parsed from and rendered as lowercase `aa:bb:cc:dd:ee:ff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bssid([u8; 6]);

impl Bssid {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for Bssid {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in &mut octets {
            let part = parts.next().ok_or(ScanError::InvalidBssid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ScanError::InvalidBssid);
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| ScanError::InvalidBssid)?;
        }
        if parts.next().is_some() {
            return Err(ScanError::InvalidBssid);
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for Bssid {
    type Error = ScanError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Bssid> for String {
    fn from(b: Bssid) -> Self {
        b.to_string()
    }
}

impl fmt::Display for Bssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Band
// ───────────────────────────────────────────────────────────────

/// Frequency band, derived from the channel centre frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// 2400–2500 MHz (exclusive).
    Ghz24,
    /// 4900–5900 MHz (exclusive).
    Ghz5,
    /// Anything else (6 GHz, 60 GHz, bogus).  No thresholds apply.
    Other,
}

impl Band {
    pub fn from_frequency(mhz: u32) -> Self {
        if mhz > 2400 && mhz < 2500 {
            Self::Ghz24
        } else if mhz > 4900 && mhz < 5900 {
            Self::Ghz5
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ghz24 => write!(f, "2.4GHz"),
            Self::Ghz5 => write!(f, "5GHz"),
            Self::Other => write!(f, "other"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Security capabilities
// ───────────────────────────────────────────────────────────────

/// Security capability bits advertised by a BSS.
///
/// Parsed from the bracketed capability string reported by the
/// supplicant, e.g. `[WPA2-PSK-CCMP][ESS]`.  No bits set means open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SecurityCaps(u8);

impl SecurityCaps {
    pub const OPEN: Self = Self(0);
    pub const WEP: Self = Self(0b0001);
    pub const PSK: Self = Self(0b0010);
    pub const EAP: Self = Self(0b0100);
    pub const SAE: Self = Self(0b1000);

    /// Parse a capability string.  Unknown tokens are ignored.
    pub fn parse(capabilities: &str) -> Self {
        let mut caps = Self::OPEN;
        if capabilities.contains("WEP") {
            caps = caps.union(Self::WEP);
        }
        if capabilities.contains("PSK") {
            caps = caps.union(Self::PSK);
        }
        if capabilities.contains("EAP") {
            caps = caps.union(Self::EAP);
        }
        if capabilities.contains("SAE") {
            caps = caps.union(Self::SAE);
        }
        caps
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when no encryption of any kind is advertised.
    pub const fn is_open(self) -> bool {
        self.0 == 0
    }
}

// ───────────────────────────────────────────────────────────────
// Scan observation
// ───────────────────────────────────────────────────────────────

/// One physical network instance seen in a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanObservation {
    ssid: Ssid,
    bssid: Bssid,
    frequency_mhz: u32,
    rssi_dbm: i32,
    security: SecurityCaps,
    timestamp_ms: u64,
}

impl ScanObservation {
    /// Capture an observation from raw scan fields.
    pub fn new(
        ssid: &str,
        bssid: Bssid,
        frequency_mhz: u32,
        rssi_dbm: i32,
        capabilities: &str,
        timestamp_ms: u64,
    ) -> Result<Self, ScanError> {
        Self::with_security(
            ssid,
            bssid,
            frequency_mhz,
            rssi_dbm,
            SecurityCaps::parse(capabilities),
            timestamp_ms,
        )
    }

    /// Capture an observation whose capability bits are already decoded.
    pub fn with_security(
        ssid: &str,
        bssid: Bssid,
        frequency_mhz: u32,
        rssi_dbm: i32,
        security: SecurityCaps,
        timestamp_ms: u64,
    ) -> Result<Self, ScanError> {
        Ok(Self {
            ssid: ssid_from_str(ssid)?,
            bssid,
            frequency_mhz,
            rssi_dbm,
            security,
            timestamp_ms,
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn bssid(&self) -> Bssid {
        self.bssid
    }

    pub fn frequency_mhz(&self) -> u32 {
        self.frequency_mhz
    }

    pub fn band(&self) -> Band {
        Band::from_frequency(self.frequency_mhz)
    }

    pub fn rssi_dbm(&self) -> i32 {
        self.rssi_dbm
    }

    pub fn security(&self) -> SecurityCaps {
        self.security
    }

    pub fn is_open(&self) -> bool {
        self.security.is_open()
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

impl fmt::Display for ScanObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\":{}({}MHz, {}dBm)",
            self.ssid, self.bssid, self.frequency_mhz, self.rssi_dbm
        )
    }
}
