//! Typed progress reporting plus a scope-bound elapsed-time ticker.
//!
//! The progress labels are advisory text for the presentation layer; the
//! enum keeps them in one place. `ElapsedTicker` guarantees the recurring
//! reporter is stopped on every exit path of a model attempt: dropping the
//! guard aborts the task, so no branch can leak a timer.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How often the ticker reports during a long model call.
pub const TICK_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressStage {
    Extracting,
    Analyzing { model: String },
    GeneratingMatrix,
    Retrying { attempt: u32, max: u32 },
    FallingBack { model: String },
    /// Periodic heartbeat while a model call is in flight.
    StillWorking { model: String, elapsed_secs: u64 },
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracting => write!(f, "Extracting PDFs"),
            Self::Analyzing { model } => write!(f, "Analyzing documents with {model}..."),
            Self::GeneratingMatrix => write!(f, "Generating Priority Matrix"),
            Self::Retrying { attempt, max } => {
                write!(f, "Retrying... (Attempt {attempt}/{max})")
            }
            Self::FallingBack { model } => {
                write!(f, "{model} is unavailable. Trying fallback model...")
            }
            Self::StillWorking { model, elapsed_secs } => {
                write!(f, "Analyzing documents with {model}... ({elapsed_secs}s elapsed)")
            }
        }
    }
}

/// Shared progress callback handed through the pipeline.
#[derive(Clone)]
pub struct Progress(Arc<dyn Fn(ProgressStage) + Send + Sync>);

impl Progress {
    pub fn new(callback: impl Fn(ProgressStage) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Sink that discards everything (tests, batch callers).
    pub fn noop() -> Self {
        Self::new(|_stage| {})
    }

    pub fn emit(&self, stage: ProgressStage) {
        (*self.0)(stage);
    }
}

/// Recurring elapsed-time reporter scoped to one model attempt.
///
/// The spawned task is aborted on drop; success, fatal error, and fallback
/// paths all release it the same way.
pub struct ElapsedTicker {
    handle: tokio::task::JoinHandle<()>,
}

impl ElapsedTicker {
    pub fn start(progress: Progress, model: String, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let mut interval = tokio::time::interval(every);
            // First tick completes immediately; skip it.
            interval.tick().await;
            loop {
                interval.tick().await;
                progress.emit(ProgressStage::StillWorking {
                    model: model.clone(),
                    elapsed_secs: started.elapsed().as_secs(),
                });
            }
        });
        Self { handle }
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
