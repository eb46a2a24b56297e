//! Fuzz target: `MemoryRepository::from_bytes`
//!
//! Persisted profile tables come from disk and may be truncated or
//! corrupted.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A table that decodes re-encodes to bytes that decode to the same table
//!
//! cargo fuzz run fuzz_snapshot

#![no_main]

use libfuzzer_sys::fuzz_target;
use wifi_selector::adapters::memory_repository::MemoryRepository;

fuzz_target!(|data: &[u8]| {
    let Ok(repo) = MemoryRepository::from_bytes(data) else {
        return;
    };
    let bytes = repo.to_bytes().unwrap();
    let again = MemoryRepository::from_bytes(&bytes).unwrap();
    assert_eq!(again, repo);
});
