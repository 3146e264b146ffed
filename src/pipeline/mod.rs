pub mod extraction;
pub mod gate;
pub mod interpret;
pub mod invoke;
pub mod keywords;
pub mod orchestrator;
pub mod progress;
pub mod prompt;

pub use extraction::{extract_text, ExtractionError, PdfDecoder, PdfTextDecoder};
pub use gate::{screen, GateOutcome};
pub use interpret::interpret;
pub use invoke::{classify_provider_error, invoke, ErrorClass, FatalKind, InvokeError};
pub use keywords::{count_distinct_keywords, density_check, quick_check, KeywordAssessment};

use thiserror::Error;

/// Everything that can stop a pipeline run, classified at the failure site.
///
/// `InvalidDocument` is the one variant the presentation layer is expected to
/// match on structurally (dedicated affordance); everything else is rendered
/// through [`PipelineError::user_message`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("both a syllabus and a past-papers file are required")]
    MissingInput,

    /// A gate rejected the content, or the model emitted its rejection
    /// sentinel. `detected` carries the model's document-type label when the
    /// rejection reason included one.
    #[error("document rejected as non-academic")]
    InvalidDocument { detected: Option<String> },

    #[error("model attempt timed out: {0}")]
    Timeout(String),

    #[error("credential rejected by the model endpoint: {0}")]
    Unauthorized(String),

    #[error("model quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("model rejected the request: {0}")]
    InvalidRequest(String),

    /// Fatal failure that matched none of the known sub-kinds. Unknown
    /// failure modes are assumed non-recoverable.
    #[error("model call failed: {0}")]
    ModelFailure(String),

    #[error("every model in the fallback list is unavailable")]
    ModelsUnavailable,

    #[error("model response could not be parsed: {0}")]
    MalformedResponse(String),
}

impl PipelineError {
    /// The single place internal errors become user-facing text.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingInput => {
                "Please upload both a syllabus and a past-papers PDF before analyzing.".to_string()
            }
            Self::InvalidDocument { detected: Some(label) } => format!(
                "This doesn't look like academic material. It appears to be a {label}. \
                 Please upload a course syllabus and past exam papers."
            ),
            Self::InvalidDocument { detected: None } => {
                "These files don't look like a syllabus or past exam papers. \
                 Please check your uploads."
                    .to_string()
            }
            Self::Timeout(_) => {
                "The analysis took too long and was cancelled. Please try again.".to_string()
            }
            Self::Unauthorized(_) => {
                "The configured API key was rejected. Check your credentials.".to_string()
            }
            Self::QuotaExhausted(_) => {
                "The API quota is exhausted. Please try again later.".to_string()
            }
            Self::InvalidRequest(_) => {
                "The model service rejected the request. Please try different files.".to_string()
            }
            Self::ModelFailure(_) => {
                "Something went wrong while analyzing your documents. Please try again.".to_string()
            }
            Self::ModelsUnavailable => {
                "All models are currently overloaded. Please try again in a few minutes."
                    .to_string()
            }
            Self::MalformedResponse(_) => {
                "The model returned an unreadable answer. Please try again.".to_string()
            }
        }
    }
}
