//! Built-in evaluators.
//!
//! | Evaluator | Proposes |
//! |---|---|
//! | [`UntrustedNetworkEvaluator`] | strongest open network with no saved profile |
//! | [`SavedNetworkEvaluator`] | best-scoring enabled saved network |

pub mod saved;
pub mod untrusted;

pub use saved::SavedNetworkEvaluator;
pub use untrusted::UntrustedNetworkEvaluator;

/// Priority of [`UntrustedNetworkEvaluator`] in the default table.
pub const UNTRUSTED_PRIORITY: u8 = 1;
/// Priority of [`SavedNetworkEvaluator`] in the default table.  Runs after
/// the untrusted evaluator so a saved proposal replaces an untrusted one.
pub const SAVED_PRIORITY: u8 = 2;
