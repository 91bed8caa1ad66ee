//! Pipeline error types.

use thiserror::Error;

/// Errors the pipeline can surface to callers.
///
/// Classification never errors — fallback failures degrade to `Unknown`.
/// Storage is the only hard failure mode.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("no changes to apply")]
    EmptyChangeList,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Convenience alias for pipeline results.
pub type AssistantResult<T> = Result<T, AssistantError>;
