use std::time::Duration;

/// Errors surfaced at the crate boundary.
///
/// Policy outcomes are never errors: they travel as [`crate::eval::RuleMatch`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown evaluator: {0} (try --list)")]
    UnknownEvaluator(String),
    #[error("failed to render config: {0}")]
    ConfigDump(#[from] toml::ser::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure of a single version-control query.
///
/// Callers in [`crate::repo`] collapse these into their documented safe
/// default; they only reach the log.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("git {args} exited with {code:?}: {stderr}")]
    Failed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("git {args} timed out after {timeout:?}")]
    Timeout { args: String, timeout: Duration },
    #[error("failed waiting for git: {0}")]
    Wait(#[source] std::io::Error),
}
