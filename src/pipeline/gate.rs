//! Soft per-file gate, run at selection time before a file enters a slot.
//!
//! Two-outcome design: a file is either accepted outright or held pending an
//! explicit user decision. The gate never blocks permanently and never
//! surfaces extraction failures; those accept the file as-is (fail-open).

use crate::config::{QUICK_MIN_DISTINCT, QUICK_PREFIX_CHARS, QUICK_SAMPLE_CHARS};
use crate::document::{DocumentSlot, UploadedDocument};
use crate::pipeline::extraction::{extract_text, PdfDecoder};
use crate::pipeline::keywords::quick_check;

/// Result of screening one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Not a PDF by extension; dropped without any message.
    Ignored,
    /// Quick check passed, or extraction could not run (fail-open).
    Accepted,
    /// Quick check failed; the file is held for the user to confirm or
    /// discard.
    Suspect,
}

/// Screen a candidate file against the quick keyword check.
pub fn screen(decoder: &dyn PdfDecoder, doc: &UploadedDocument) -> GateOutcome {
    if !has_pdf_extension(&doc.file_name) {
        tracing::debug!(file = %doc.file_name, "ignoring non-PDF selection");
        return GateOutcome::Ignored;
    }

    let sample = match extract_text(decoder, doc, QUICK_SAMPLE_CHARS) {
        Ok(sample) => sample,
        Err(e) => {
            // Fail-open: a file we cannot even sample is accepted unchecked.
            tracing::warn!(
                file = %doc.file_name,
                error = %e,
                "prefix extraction failed, accepting file without quick check"
            );
            return GateOutcome::Accepted;
        }
    };

    if quick_check(&sample, QUICK_PREFIX_CHARS, QUICK_MIN_DISTINCT) {
        GateOutcome::Accepted
    } else {
        GateOutcome::Suspect
    }
}

/// Screen `doc` and move it into `slot` according to the outcome.
///
/// `Ignored` leaves the slot untouched; `Suspect` parks the file as pending
/// so the caller can [`DocumentSlot::confirm`] or [`DocumentSlot::clear`].
pub fn offer(slot: &mut DocumentSlot, decoder: &dyn PdfDecoder, doc: UploadedDocument) -> GateOutcome {
    let outcome = screen(decoder, &doc);
    match outcome {
        GateOutcome::Ignored => {}
        GateOutcome::Accepted => *slot = DocumentSlot::Accepted(doc),
        GateOutcome::Suspect => *slot = DocumentSlot::Pending(doc),
    }
    outcome
}

fn has_pdf_extension(file_name: &str) -> bool {
    file_name
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        && file_name.contains('.')
}
