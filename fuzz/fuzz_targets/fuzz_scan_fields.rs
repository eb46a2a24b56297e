//! Fuzz target: raw scan field parsing
//!
//! Feeds arbitrary text to the BSSID parser, the capability-string parser
//! and the observation constructor.
//!
//! Invariants checked:
//! - No panics under any input
//! - A parsed BSSID renders back to the lowercase form of its input
//! - An accepted SSID is at most 32 bytes
//!
//! cargo fuzz run fuzz_scan_fields

#![no_main]

use libfuzzer_sys::fuzz_target;
use wifi_selector::scan::{Bssid, MAX_SSID_LEN, ScanObservation, SecurityCaps};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(bssid) = text.parse::<Bssid>() {
        assert_eq!(bssid.to_string(), text.to_ascii_lowercase());
    }

    let mid = (0..=text.len() / 2)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let (ssid, rest) = text.split_at(mid);
    if let Ok(obs) = ScanObservation::new(ssid, Bssid::new([0; 6]), 2437, -60, rest, 0) {
        assert!(obs.ssid().len() <= MAX_SSID_LEN);
        assert_eq!(obs.is_open(), SecurityCaps::parse(rest).is_open());
    }
});
