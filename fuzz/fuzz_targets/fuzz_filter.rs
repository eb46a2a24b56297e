//! Fuzz target: `filter_scan`
//!
//! Builds a snapshot and blacklist from fuzz bytes, 8 bytes per
//! observation: `[bssid_lo, freq_lo, freq_hi, rssi, caps, ssid_len, ssid0, ssid1]`.
//!
//! Invariants checked:
//! - No panics
//! - Every kept observation is at or above its band floor and not blacklisted
//! - Kept + dropped == input length
//!
//! cargo fuzz run fuzz_filter

#![no_main]

use std::collections::HashSet;

use libfuzzer_sys::fuzz_target;
use wifi_selector::config::SelectorConfig;
use wifi_selector::filter::filter_scan;
use wifi_selector::scan::{Bssid, ScanObservation};

const CAPS: [&str; 3] = ["[ESS]", "[WPA2-PSK-CCMP][ESS]", "[WPA2-EAP-CCMP]"];

fuzz_target!(|data: &[u8]| {
    let Some((&banned, body)) = data.split_first() else {
        return;
    };

    let scan: Vec<ScanObservation> = body
        .chunks_exact(8)
        .filter_map(|c| {
            let freq = u32::from(u16::from_le_bytes([c[1], c[2]]));
            let rssi = -i32::from(c[3] % 128);
            let ssid_len = usize::from(c[5] % 3);
            let ssid: String = c[6..6 + ssid_len].iter().map(|b| char::from(b'a' + b % 26)).collect();
            ScanObservation::new(
                &ssid,
                Bssid::new([0, 0, 0, 0, 0, c[0]]),
                freq,
                rssi,
                CAPS[usize::from(c[4]) % CAPS.len()],
                0,
            )
            .ok()
        })
        .collect();

    let blacklist = HashSet::from([Bssid::new([0, 0, 0, 0, 0, banned])]);
    let config = SelectorConfig::default();
    let out = filter_scan(&scan, &blacklist, &config);

    assert_eq!(out.kept.len() + out.dropped(), scan.len());
    for o in &out.kept {
        assert!(!blacklist.contains(&o.bssid()));
        if let Some(t) = config.thresholds(o.band()) {
            assert!(o.rssi_dbm() >= t.floor);
        }
    }
});
