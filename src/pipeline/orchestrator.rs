//! Strategy orchestrator: the full run from two uploaded PDFs to an
//! [`AnalysisResult`].
//!
//! Sequence: extract samples from both files concurrently (tolerating
//! per-file failures), run the hard keyword-density gate before any network
//! activity, encode both attachments, then walk the model fallback list,
//! retrying transiently-failing models through the invocation state machine
//! and dropping to the next model when one is exhausted. Fatal failures
//! abort the whole run.

use std::sync::Arc;

use crate::analysis::AnalysisResult;
use crate::config::{AppConfig, COMBINED_BUDGET_CHARS, DEEP_SAMPLE_CHARS};
use crate::document::{AnalysisRequest, UploadedDocument};
use crate::model::{Attachment, GeminiClient, GenerativeClient, ModelRequest};
use crate::pipeline::extraction::{extract_text, PdfDecoder, PdfTextDecoder};
use crate::pipeline::interpret::interpret;
use crate::pipeline::invoke::{invoke, FatalKind, InvokeError};
use crate::pipeline::keywords::density_check;
use crate::pipeline::progress::{ElapsedTicker, Progress, ProgressStage, TICK_INTERVAL};
use crate::pipeline::prompt::{SYSTEM_INSTRUCTION, USER_PROMPT};
use crate::pipeline::PipelineError;

/// Drives one analysis run end to end.
pub struct Analyzer {
    config: AppConfig,
    client: Arc<dyn GenerativeClient>,
    decoder: Arc<dyn PdfDecoder>,
}

impl Analyzer {
    pub fn new(
        config: AppConfig,
        client: Arc<dyn GenerativeClient>,
        decoder: Arc<dyn PdfDecoder>,
    ) -> Self {
        Self {
            config,
            client,
            decoder,
        }
    }

    /// Production wiring: Gemini over HTTP, pdf-extract decoding.
    pub fn with_default_backends(config: AppConfig) -> Self {
        let client = Arc::new(GeminiClient::new(&config));
        Self::new(config, client, Arc::new(PdfTextDecoder))
    }

    /// Run the pipeline. Every error has been classified by the time it
    /// leaves here; callers render with [`PipelineError::user_message`].
    pub async fn run(
        &self,
        request: &AnalysisRequest,
        progress: Progress,
    ) -> Result<AnalysisResult, PipelineError> {
        // Step 1: sample both documents concurrently; a file that cannot be
        // decoded contributes empty text instead of aborting the run.
        progress.emit(ProgressStage::Extracting);
        let (syllabus_text, papers_text) = tokio::join!(
            self.extract_lenient(&request.syllabus),
            self.extract_lenient(&request.past_papers),
        );

        // Step 2+3: hard gate on the combined sample. Rejecting here costs
        // no quota and no latency.
        let combined = truncate_chars(
            &format!("{syllabus_text}\n{papers_text}"),
            COMBINED_BUDGET_CHARS,
        );
        let assessment = density_check(&combined);
        if !assessment.passed {
            tracing::info!(
                distinct = assessment.distinct_count,
                density = assessment.density_score,
                "combined sample failed the density gate"
            );
            return Err(PipelineError::InvalidDocument { detected: None });
        }

        // Step 4: inline-encode both attachments concurrently.
        let (syllabus_attachment, papers_attachment) = tokio::join!(
            encode_attachment(Arc::clone(&request.syllabus)),
            encode_attachment(Arc::clone(&request.past_papers)),
        );

        let model_request = ModelRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_text: USER_PROMPT.to_string(),
            attachments: vec![syllabus_attachment, papers_attachment],
        };

        // Step 5: walk the fallback list.
        let total = self.config.models.len();
        for (index, model) in self.config.models.iter().enumerate() {
            progress.emit(ProgressStage::Analyzing {
                model: model.label.clone(),
            });
            let ticker =
                ElapsedTicker::start(progress.clone(), model.label.clone(), TICK_INTERVAL);

            let outcome = invoke(
                self.client.as_ref(),
                model,
                &model_request,
                self.config.max_attempts,
                self.config.attempt_timeout,
                &progress,
            )
            .await;
            drop(ticker);

            match outcome {
                Ok(raw) => {
                    progress.emit(ProgressStage::GeneratingMatrix);
                    return interpret(&raw);
                }
                Err(InvokeError::Fatal { kind, reason }) => {
                    return Err(map_fatal(kind, reason));
                }
                Err(InvokeError::Exhausted { attempts, reason }) => {
                    tracing::warn!(
                        model = %model.id,
                        attempts,
                        reason = %reason,
                        "model exhausted, moving to fallback"
                    );
                    if index + 1 < total {
                        progress.emit(ProgressStage::FallingBack {
                            model: model.label.clone(),
                        });
                        tokio::time::sleep(self.config.fallback_delay).await;
                    }
                }
            }
        }

        // Step 6: nothing left to try.
        Err(PipelineError::ModelsUnavailable)
    }

    /// Extract up to [`DEEP_SAMPLE_CHARS`] characters, substituting empty
    /// text when the file cannot be decoded.
    async fn extract_lenient(&self, doc: &Arc<UploadedDocument>) -> String {
        let decoder = Arc::clone(&self.decoder);
        let doc = Arc::clone(doc);
        let file_name = doc.file_name.clone();

        let extracted = tokio::task::spawn_blocking(move || {
            extract_text(decoder.as_ref(), &doc, DEEP_SAMPLE_CHARS)
        })
        .await;

        match extracted {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(file = %file_name, error = %e, "extraction failed, substituting empty text");
                String::new()
            }
            Err(join_err) => {
                tracing::warn!(file = %file_name, error = %join_err, "extraction task failed");
                String::new()
            }
        }
    }
}

async fn encode_attachment(doc: Arc<UploadedDocument>) -> Attachment {
    tokio::task::spawn_blocking(move || Attachment::encode(&doc))
        .await
        .expect("attachment encoding task panicked")
}

fn map_fatal(kind: FatalKind, reason: String) -> PipelineError {
    match kind {
        FatalKind::Timeout => PipelineError::Timeout(reason),
        FatalKind::Unauthorized => PipelineError::Unauthorized(reason),
        FatalKind::QuotaExhausted => PipelineError::QuotaExhausted(reason),
        FatalKind::InvalidRequest => PipelineError::InvalidRequest(reason),
        FatalKind::Unknown => PipelineError::ModelFailure(reason),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModelClient;
    use crate::pipeline::extraction::ExtractionError;
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubDecoder {
        text: Option<String>,
    }

    impl StubDecoder {
        fn academic() -> Self {
            Self {
                text: Some(
                    "Course syllabus, semester one. Exam topics: unit tests, marks scheme, \
                     lecture notes, assignment schedule."
                        .into(),
                ),
            }
        }

        fn receipt() -> Self {
            Self {
                text: Some("Total due $42.00 thank you for shopping with us".into()),
            }
        }

        fn failing() -> Self {
            Self { text: None }
        }
    }

    impl PdfDecoder for StubDecoder {
        fn page_texts(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
            match &self.text {
                Some(text) => Ok(vec![text.clone()]),
                None => Err(ExtractionError::PdfParsing("no text layer".into())),
            }
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new(
            Some(UploadedDocument::new(
                vec![1u8; 16],
                "application/pdf",
                "syllabus.pdf",
            )),
            Some(UploadedDocument::new(
                vec![2u8; 16],
                "application/pdf",
                "papers.pdf",
            )),
        )
        .unwrap()
    }

    fn success_json() -> String {
        r#"```json
{
  "topics": [
    {
      "name": "Sorting",
      "confidence": 90,
      "effort": "Low",
      "reward": "High",
      "frequency": 5,
      "keyConcepts": ["quicksort"],
      "priority": "High"
    }
  ],
  "summary": {"totalTopics": 1, "highPriorityCount": 1, "lowEffortHighReward": 1}
}
```"#
            .to_string()
    }

    fn analyzer(client: MockModelClient, decoder: StubDecoder) -> (Analyzer, Arc<MockModelClient>) {
        let mut config = AppConfig::new("test-key".into());
        config.fallback_delay = Duration::from_millis(10);
        let client = Arc::new(client);
        let analyzer = Analyzer::new(config, Arc::clone(&client) as Arc<dyn GenerativeClient>, Arc::new(decoder));
        (analyzer, client)
    }

    fn collecting_progress() -> (Progress, Arc<Mutex<Vec<String>>>) {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |stage| sink.lock().unwrap().push(stage.to_string()));
        (progress, seen)
    }

    // ── Hard gate ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn gate_failure_never_touches_the_model() {
        let (analyzer, mock) = analyzer(
            MockModelClient::new().then_ok(&success_json()),
            StubDecoder::receipt(),
        );

        let result = analyzer.run(&request(), Progress::noop()).await;

        assert!(matches!(
            result,
            Err(PipelineError::InvalidDocument { detected: None })
        ));
        assert_eq!(mock.calls(), 0, "gate rejection must not cost a model call");
    }

    // ── Happy path ──────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn successful_run_returns_interpreted_result() {
        let (analyzer, mock) = analyzer(
            MockModelClient::new().then_ok(&success_json()),
            StubDecoder::academic(),
        );
        let (progress, seen) = collecting_progress();

        let result = analyzer.run(&request(), progress).await.unwrap();

        assert_eq!(mock.calls(), 1);
        assert_eq!(result.topics.len(), 1);
        assert_eq!(result.topics[0].name, "Sorting");
        assert_eq!(result.summary.total_topics, 1);

        let stages = seen.lock().unwrap();
        assert_eq!(stages[0], "Extracting PDFs");
        assert!(stages.iter().any(|s| s.contains("Gemini 2.5 Flash")));
        assert!(stages.iter().any(|s| s == "Generating Priority Matrix"));
    }

    // ── Fallback behavior ───────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn transient_first_model_falls_back_to_second() {
        // First model: 3 transient failures (exhausted). Second: success.
        let (analyzer, mock) = analyzer(
            MockModelClient::new()
                .then_status(503, "high demand")
                .then_status(503, "high demand")
                .then_status(503, "high demand")
                .then_ok(&success_json()),
            StubDecoder::academic(),
        );
        let (progress, seen) = collecting_progress();

        let result = analyzer.run(&request(), progress).await.unwrap();
        assert_eq!(result.topics[0].name, "Sorting");
        // First model was actually tried (3 attempts) before the switch
        assert_eq!(mock.calls(), 4);

        let stages = seen.lock().unwrap();
        assert!(stages
            .iter()
            .any(|s| s == "Gemini 2.5 Flash is unavailable. Trying fallback model..."));
        assert!(stages
            .iter()
            .any(|s| s == "Analyzing documents with Gemini 2.0 Flash..."));
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_error_aborts_without_fallback() {
        let (analyzer, mock) = analyzer(
            MockModelClient::new().then_status(401, "bad credentials"),
            StubDecoder::academic(),
        );
        let (progress, seen) = collecting_progress();

        let result = analyzer.run(&request(), progress).await;
        assert!(matches!(result, Err(PipelineError::Unauthorized(_))));
        assert_eq!(mock.calls(), 1);

        // Never reached the second model
        let stages = seen.lock().unwrap();
        assert!(!stages.iter().any(|s| s.contains("Gemini 2.0 Flash")));
    }

    #[tokio::test(start_paused = true)]
    async fn all_models_exhausted_surfaces_unavailability() {
        // 2 models × 3 attempts, all transient
        let mut client = MockModelClient::new();
        for _ in 0..6 {
            client = client.then_status(503, "overloaded");
        }
        let (analyzer, mock) = analyzer(client, StubDecoder::academic());

        let result = analyzer.run(&request(), Progress::noop()).await;
        assert!(matches!(result, Err(PipelineError::ModelsUnavailable)));
        assert_eq!(mock.calls(), 6);
    }

    // ── Rejection sentinel end-to-end ───────────────────

    #[tokio::test(start_paused = true)]
    async fn model_rejection_sentinel_becomes_invalid_document() {
        let (analyzer, _mock) = analyzer(
            MockModelClient::new().then_ok(
                r#"{"error":"INVALID_DOCUMENT","reason":"not academic (detected: Train Ticket)"}"#,
            ),
            StubDecoder::academic(),
        );

        let result = analyzer.run(&request(), Progress::noop()).await;
        match result {
            Err(PipelineError::InvalidDocument { detected }) => {
                assert_eq!(detected.as_deref(), Some("Train Ticket"));
            }
            other => panic!("expected InvalidDocument, got {other:?}"),
        }
    }

    // ── Extraction leniency ─────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn unreadable_files_reach_the_gate_as_empty_text() {
        // Both extractions fail → combined sample is empty → gate rejects
        // before any model call.
        let (analyzer, mock) = analyzer(
            MockModelClient::new().then_ok(&success_json()),
            StubDecoder::failing(),
        );

        let result = analyzer.run(&request(), Progress::noop()).await;
        assert!(matches!(
            result,
            Err(PipelineError::InvalidDocument { detected: None })
        ));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_model_output_is_reported_as_such() {
        let (analyzer, _mock) = analyzer(
            MockModelClient::new().then_ok("absolutely not json"),
            StubDecoder::academic(),
        );

        let result = analyzer.run(&request(), Progress::noop()).await;
        assert!(matches!(result, Err(PipelineError::MalformedResponse(_))));
    }

    #[test]
    fn truncate_chars_bounds_combined_sample() {
        let text = "a".repeat(10_000);
        assert_eq!(truncate_chars(&text, 8000).chars().count(), 8000);
        assert_eq!(truncate_chars("short", 8000), "short");
    }
}
