//! PhishGuard Common Library
//!
//! CLIとWeb(WASM)で共有される型とロジック:
//! - 解析結果の型（分類・リスクレベル・特徴分析）
//! - Gemini APIのリクエスト生成とレスポンス検証
//! - 解析状態マシン（Idle → Loading → Success / Failure）

pub mod types;
pub mod error;
pub mod prompts;
pub mod parser;
pub mod gemini;
pub mod controller;

pub use types::{
    AnalysisRequest, AnalysisResult, Classification, ExampleUrl, FeatureFinding, RiskLevel,
    EXAMPLE_URLS,
};
pub use error::{
    AnalysisError, Result, BAD_RESPONSE_MESSAGE, INVALID_URL_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE,
    UNEXPECTED_ERROR_MESSAGE,
};
pub use prompts::{build_user_prompt, response_schema, system_instruction};
pub use parser::{extract_json_object, parse_analysis, parse_response_text};
pub use gemini::{
    build_request, endpoint_url, interpret_response, GeminiRequest, GeminiResponse,
    GenerationMode, DEFAULT_MODEL, GEMINI_API_BASE,
};
pub use controller::{AnalysisController, AnalysisState, Resolution, Ticket};
