//! Application core: pure selection logic, zero I/O.
//!
//! [`selector::NetworkSelector`] drives filter, gate, evaluators and the
//! user-choice overlay.  Everything outside the process (profile store,
//! clock, event consumers) is reached through the **port traits** in
//! [`ports`], keeping this layer testable with mocks.

pub mod events;
pub mod ports;
pub mod selector;
