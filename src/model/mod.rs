pub mod client;
pub mod types;

pub use client::{GeminiClient, GenerativeClient, MockModelClient};
pub use types::{Attachment, ModelRequest};

use thiserror::Error;

/// Raw error from the model endpoint, before classification.
///
/// The provider's error shapes are not contractually stable, so this keeps
/// the status code and body text intact; the classification function in
/// [`crate::pipeline::invoke`] is the only place that inspects them.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("model endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),
}
