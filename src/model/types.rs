//! Wire types for the generative-language endpoint.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::GenerationParams;
use crate::document::UploadedDocument;

/// One inline-encoded document attachment.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub data_base64: String,
}

impl Attachment {
    pub fn encode(doc: &UploadedDocument) -> Self {
        Self {
            mime_type: doc.media_type.clone(),
            data_base64: BASE64.encode(&doc.bytes),
        }
    }
}

/// Provider-agnostic request the pipeline assembles once and replays against
/// every model in the fallback list.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system_instruction: String,
    pub user_text: String,
    pub attachments: Vec<Attachment>,
}

// ── generateContent request body ────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl From<&GenerationParams> for GenerationConfig {
    fn from(params: &GenerationParams) -> Self {
        Self {
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

impl GenerateContentRequest {
    /// Assemble the provider body: system instruction, then one user turn
    /// carrying both inline attachments and the fixed prompt text.
    pub fn build(request: &ModelRequest, params: &GenerationParams) -> Self {
        let mut parts: Vec<Part> = request
            .attachments
            .iter()
            .map(|a| Part::InlineData {
                inline_data: InlineData {
                    mime_type: a.mime_type.clone(),
                    data: a.data_base64.clone(),
                },
            })
            .collect();
        parts.push(Part::Text {
            text: request.user_text.clone(),
        });

        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text {
                    text: request.system_instruction.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig::from(params),
        }
    }
}

// ── generateContent response body ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn flattened_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}
