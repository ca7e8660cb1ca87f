// Error types for the verification engine and its configuration.
//
// Verdicts are not errors: a circuit that lights no output, several outputs,
// or an output over a full column has been verified successfully and simply
// failed the test (see `verdict.rs`). The variants here are the ways a
// verification can fail to happen at all.

use std::path::PathBuf;

use circuit_checker_sim::types::{PlayerId, WorldId};
use thiserror::Error;

/// Why a verification request or task did not produce a verdict.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// No fixture is registered under the requested name.
    #[error("no fixture named `{0}` is registered")]
    FixtureNotFound(String),

    /// The requesting player is not online in the environment.
    #[error("{0} is not online in this world")]
    UserUnresolved(PlayerId),

    /// The world a task was bound to is no longer the current one.
    #[error("task was bound to {bound} but the current world is {current}")]
    EnvironmentMismatch { bound: WorldId, current: WorldId },

    /// The task registry was dropped before a deferred task could join it.
    #[error("the task scheduler has stopped")]
    SchedulerStopped,
}

/// Failure to load a `CheckerConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
