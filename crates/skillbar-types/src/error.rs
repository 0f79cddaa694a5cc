//! Error types surfaced by the launcher core

use thiserror::Error;

/// Failure reported by an execution gateway
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Backend cannot be reached at all (no clipboard, closed pipe)
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    /// Backend rejected the payload
    #[error("Strategy '{strategy}' rejected invocation: {reason}")]
    Rejected { strategy: String, reason: String },

    /// Every strategy of a fallback chain failed
    #[error("All execution strategies failed: {}", .attempts.join("; "))]
    Exhausted { attempts: Vec<String> },

    /// Fallback chain has nothing to try
    #[error("No execution strategies configured")]
    NoStrategies,
}

/// Errors returned by launcher operations
#[derive(Debug, Error)]
pub enum LauncherError {
    /// The gateway refused the resolved invocation; usage was not recorded
    #[error("Execution failed for '{payload}': {source}")]
    ExecutionFailed {
        payload: String,
        #[source]
        source: GatewayError,
    },
}
