//! cramplan: syllabus vs. past-papers cross-referencing pipeline.
//!
//! Takes a course syllabus PDF and a past-exam-papers PDF, runs cheap keyword
//! heuristics to reject obviously non-academic uploads before spending a model
//! call, then drives a generative model (with retry, backoff, timeout, and
//! cross-model fallback) to produce a prioritized topic list.

pub mod analysis;
pub mod config;
pub mod document;
pub mod export;
pub mod model;
pub mod pipeline;

pub use analysis::{AnalysisResult, Level, Summary, Topic};
pub use config::{AppConfig, ConfigError, GenerationParams, ModelSpec};
pub use document::{AnalysisRequest, DocumentSlot, UploadedDocument};
pub use pipeline::orchestrator::Analyzer;
pub use pipeline::progress::{Progress, ProgressStage};
pub use pipeline::PipelineError;
