//! Model invocation state machine.
//!
//! One call per model: `Attempting(n)` either succeeds, retries after a
//! capped exponential backoff (transient errors only), or fails: fatally on
//! the known non-recoverable sub-kinds, or as `Exhausted` once the attempt
//! budget is spent. Every attempt races the provider call against a hard
//! wall-clock timeout; a timeout is fatal and never retried.

use std::time::Duration;

use thiserror::Error;

use crate::config::ModelSpec;
use crate::model::{GenerativeClient, ModelRequest, ProviderError};
use crate::pipeline::progress::{Progress, ProgressStage};

/// Backoff ceiling between retries.
const BACKOFF_CAP: Duration = Duration::from_millis(10_000);

/// Fatal sub-kinds; each maps to one user-facing message upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    Timeout,
    Unauthorized,
    QuotaExhausted,
    InvalidRequest,
    /// Unknown failure modes are assumed non-recoverable.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Fatal(FatalKind),
    Transient,
}

/// The only place that reasons about raw provider error text.
///
/// Provider error shapes are not contractually stable, so this sniffs the
/// rendered message for known markers. Fatal markers are checked first; an
/// error matching nothing is fatal.
pub fn classify_provider_error(error: &ProviderError) -> ErrorClass {
    let message = error.to_string().to_lowercase();

    if message.contains("timeout") {
        ErrorClass::Fatal(FatalKind::Timeout)
    } else if message.contains("invalid") {
        ErrorClass::Fatal(FatalKind::InvalidRequest)
    } else if message.contains("quota") {
        ErrorClass::Fatal(FatalKind::QuotaExhausted)
    } else if message.contains("401") || message.contains("403") {
        ErrorClass::Fatal(FatalKind::Unauthorized)
    } else if message.contains("503")
        || message.contains("500")
        || message.contains("429")
        || message.contains("high demand")
        || message.contains("overloaded")
    {
        ErrorClass::Transient
    } else {
        ErrorClass::Fatal(FatalKind::Unknown)
    }
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("model call failed ({kind:?}): {reason}")]
    Fatal { kind: FatalKind, reason: String },

    /// Every attempt failed transiently; carries the last transient error.
    #[error("model unavailable after {attempts} attempts: {reason}")]
    Exhausted { attempts: u32, reason: String },
}

/// Delay before retry number `attempt` (attempt ≥ 2):
/// `min(1000 * 2^(attempt-2), 10000)` milliseconds.
pub fn backoff_delay(attempt: u32) -> Duration {
    let exp = (attempt - 2).min(16);
    Duration::from_millis(1000u64 << exp).min(BACKOFF_CAP)
}

/// Run one request against one model with bounded retries.
pub async fn invoke(
    client: &dyn GenerativeClient,
    model: &ModelSpec,
    request: &ModelRequest,
    max_attempts: u32,
    attempt_timeout: Duration,
    progress: &Progress,
) -> Result<String, InvokeError> {
    let mut last_transient = String::new();

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            progress.emit(ProgressStage::Retrying {
                attempt,
                max: max_attempts,
            });
            tokio::time::sleep(backoff_delay(attempt)).await;
        }

        let outcome = match tokio::time::timeout(attempt_timeout, client.generate(model, request))
            .await
        {
            Ok(outcome) => outcome,
            Err(_elapsed) => {
                // The underlying call may still be outstanding; for control
                // flow it is dead.
                return Err(InvokeError::Fatal {
                    kind: FatalKind::Timeout,
                    reason: format!(
                        "no response from {} within {}s",
                        model.label,
                        attempt_timeout.as_secs()
                    ),
                });
            }
        };

        match outcome {
            Ok(text) => return Ok(text),
            Err(e) => match classify_provider_error(&e) {
                ErrorClass::Fatal(kind) => {
                    tracing::warn!(model = %model.id, attempt, error = %e, "fatal model failure");
                    return Err(InvokeError::Fatal {
                        kind,
                        reason: e.to_string(),
                    });
                }
                ErrorClass::Transient => {
                    tracing::warn!(model = %model.id, attempt, error = %e, "transient model failure");
                    last_transient = e.to_string();
                }
            },
        }
    }

    Err(InvokeError::Exhausted {
        attempts: max_attempts,
        reason: last_transient,
    })
}
