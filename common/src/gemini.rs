//! Gemini API ワイヤ型とリクエスト/レスポンス処理
//!
//! HTTP送信は各フロントエンド（CLI: reqwest、Web: fetch）が担当し、
//! ここではリクエストの組み立てとレスポンスの解釈だけを行う。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AnalysisError, Result};
use crate::parser::parse_response_text;
use crate::prompts::{build_user_prompt, response_schema, system_instruction};
use crate::types::{AnalysisRequest, AnalysisResult};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const TEMPERATURE: f32 = 0.1;

/// generateContent エンドポイントURL
pub fn endpoint_url(base: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base.trim_end_matches('/'),
        model
    )
}

/// 生成モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// スキーマ制約付き生成（JSONのみ）
    Structured,
    /// Google検索ツール付き生成（テキストからJSONを抽出）
    #[default]
    #[serde(alias = "search")]
    SearchGrounded,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "structured" | "schema" => Ok(GenerationMode::Structured),
            "search" | "search-grounded" | "grounded" => Ok(GenerationMode::SearchGrounded),
            _ => Err(format!("Unknown mode: {}. Use structured or search", s)),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Structured => write!(f, "structured"),
            GenerationMode::SearchGrounded => write!(f, "search"),
        }
    }
}

// =============================================
// リクエスト
// =============================================

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Default, Serialize)]
pub struct GoogleSearch {}

/// 解析リクエストを組み立てる
///
/// Structured はスキーマとJSON MIMEを指定し、SearchGrounded は検索ツールを有効にする。
/// 検索ツールとJSON MIME指定はAPI側で併用できないため排他。
pub fn build_request(request: &AnalysisRequest, mode: GenerationMode) -> GeminiRequest {
    let (generation_config, tools) = match mode {
        GenerationMode::Structured => (
            GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(response_schema()),
            },
            Vec::new(),
        ),
        GenerationMode::SearchGrounded => (
            GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: None,
                response_schema: None,
            },
            vec![Tool {
                google_search: GoogleSearch::default(),
            }],
        ),
    };

    GeminiRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: build_user_prompt(request.url()),
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: system_instruction(mode),
            }],
        },
        generation_config,
        tools,
    }
}

// =============================================
// レスポンス
// =============================================

/// Gemini APIレスポンス
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiResponse {
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub content: Option<ResponseContent>,
    pub finish_reason: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponseContent {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingMetadata {
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキストパートを連結
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// 検索グラウンディングの引用URL（順序保持・重複除去なし）
    pub fn grounding_urls(&self) -> Vec<String> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| {
                m.grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref()?.uri.clone())
                    .filter(|uri| !uri.trim().is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// レスポンスを AnalysisResult に変換
pub fn interpret_response(response: &GeminiResponse, mode: GenerationMode) -> Result<AnalysisResult> {
    let Some(text) = response.text() else {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
            .or_else(|| response.candidates.first().and_then(|c| c.finish_reason.clone()))
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(AnalysisError::MalformedResponse(format!(
            "empty response text ({})",
            reason
        )));
    };

    let mut result = parse_response_text(&text, mode)?;

    if mode == GenerationMode::SearchGrounded {
        result.grounding_urls = response.grounding_urls();
    }

    Ok(result)
}
