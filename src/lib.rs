//! Wi-Fi network selection engine.
//!
//! Given a scan snapshot and the current association, decides whether to
//! (re)select a network and which one.  Storage, time and event output are
//! reached only through the port traits in [`app::ports`], so the engine is
//! exercised on the host with in-memory adapters.
//!
//! ```text
//!  snapshot ─▶ filter ─▶ gate ─▶ evaluator registry ─▶ user-choice overlay ─▶ candidate
//! ```

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod evaluators;
pub mod filter;
pub mod gate;
pub mod network;
pub mod scan;
pub mod scenario;
pub mod user_choice;

pub mod adapters;

pub use app::selector::{NetworkSelector, SelectionRequest, SelectorState};
pub use error::{Error, Result};
