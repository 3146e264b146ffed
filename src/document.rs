use std::path::Path;
use std::sync::Arc;

use crate::pipeline::PipelineError;

/// A file handed to the pipeline. Owned by the caller, never mutated.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. "application/pdf".
    pub media_type: String,
    pub file_name: String,
}

impl UploadedDocument {
    pub fn new(bytes: Vec<u8>, media_type: &str, file_name: &str) -> Self {
        Self {
            bytes,
            media_type: media_type.to_string(),
            file_name: file_name.to_string(),
        }
    }

    /// Read a PDF from disk (CLI entry path).
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(bytes, "application/pdf", &file_name))
    }
}

/// One upload slot behind the soft gate.
///
/// `Pending` holds a file that failed the quick keyword check: the user either
/// confirms it (accepted as-is) or clears the slot. There is no state that
/// blocks the user permanently.
#[derive(Debug, Clone, Default)]
pub enum DocumentSlot {
    #[default]
    Empty,
    Pending(UploadedDocument),
    Accepted(UploadedDocument),
}

impl DocumentSlot {
    /// Override the soft warning and accept the held file.
    pub fn confirm(&mut self) {
        *self = match std::mem::take(self) {
            Self::Pending(doc) => Self::Accepted(doc),
            other => other,
        };
    }

    /// Discard whatever the slot holds.
    pub fn clear(&mut self) {
        *self = Self::Empty;
    }

    pub fn accepted(&self) -> Option<&UploadedDocument> {
        match self {
            Self::Accepted(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn into_accepted(self) -> Option<UploadedDocument> {
        match self {
            Self::Accepted(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Both inputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub syllabus: Arc<UploadedDocument>,
    pub past_papers: Arc<UploadedDocument>,
}

impl AnalysisRequest {
    /// Both files must be present before a run starts; checked here, before
    /// any network activity.
    pub fn new(
        syllabus: Option<UploadedDocument>,
        past_papers: Option<UploadedDocument>,
    ) -> Result<Self, PipelineError> {
        match (syllabus, past_papers) {
            (Some(s), Some(p)) => Ok(Self {
                syllabus: Arc::new(s),
                past_papers: Arc::new(p),
            }),
            _ => Err(PipelineError::MissingInput),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> UploadedDocument {
        UploadedDocument::new(vec![1, 2, 3], "application/pdf", name)
    }

    #[test]
    fn pending_confirm_becomes_accepted() {
        let mut slot = DocumentSlot::Pending(doc("syllabus.pdf"));
        slot.confirm();
        assert_eq!(slot.accepted().unwrap().file_name, "syllabus.pdf");
    }

    #[test]
    fn pending_clear_returns_to_empty() {
        let mut slot = DocumentSlot::Pending(doc("syllabus.pdf"));
        slot.clear();
        assert!(slot.is_empty());
    }

    #[test]
    fn confirm_on_empty_is_noop() {
        let mut slot = DocumentSlot::Empty;
        slot.confirm();
        assert!(slot.is_empty());
    }

    #[test]
    fn confirm_on_accepted_keeps_the_file() {
        let mut slot = DocumentSlot::Accepted(doc("papers.pdf"));
        slot.confirm();
        assert_eq!(slot.accepted().unwrap().file_name, "papers.pdf");
    }

    #[test]
    fn request_requires_both_files() {
        let result = AnalysisRequest::new(Some(doc("a.pdf")), None);
        assert!(matches!(result, Err(PipelineError::MissingInput)));

        let result = AnalysisRequest::new(None, Some(doc("b.pdf")));
        assert!(matches!(result, Err(PipelineError::MissingInput)));

        assert!(AnalysisRequest::new(Some(doc("a.pdf")), Some(doc("b.pdf"))).is_ok());
    }
}
