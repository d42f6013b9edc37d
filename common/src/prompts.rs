//! プロンプト生成モジュール
//!
//! CLIとWeb(WASM)で共有されるプロンプト:
//! - system_instruction: 生成モード別のシステム指示
//! - build_user_prompt: 解析対象URLを含むユーザープロンプト
//! - response_schema: 構造化出力用のレスポンススキーマ
//!
//! 存在しないドメインを Suspicious / Phishing とする方針はモデルへの指示であり、
//! コード側では検証しない。

use serde_json::{json, Value};

use crate::gemini::GenerationMode;
use crate::types::{Classification, RiskLevel};

const ROLE: &str = "You are a highly advanced AI-powered Phishing Detection System.
Your goal is to analyze a provided URL to determine if it is a phishing attempt, suspicious, or legitimate.";

const FEATURE_GUIDANCE: &str = "Assess individual features such as domain spelling and typosquatting, \
use of HTTPS and the SSL certificate, domain age and reputation, URL structure (subdomains, IP hosts, \
encoded characters, excessive length) and brand impersonation. Report each one as a separate entry \
in featureAnalysis.";

const SEARCH_RULES: &str = "CRITICAL INSTRUCTION:
1. You MUST use the Google Search tool to verify if the domain actually exists and is currently active.
2. If the domain does NOT exist, is unreachable, or looks like a parked domain with no real content, you MUST classify it as \"suspicious\" or \"phishing\" depending on context, and set the risk level to \"High\" or \"Medium\". Do NOT classify non-existent sites as \"legitimate\".
3. Check for recent phishing reports regarding the domain using search.";

/// 出力形式の説明（検索モードではスキーマ強制が使えないためテキストで指示）
fn output_format() -> String {
    let classifications = Classification::ALL
        .iter()
        .map(|c| format!("\"{}\"", c.as_str()))
        .collect::<Vec<_>>()
        .join(" | ");
    let risks = RiskLevel::ALL
        .iter()
        .map(|r| format!("\"{}\"", r.as_str()))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        r#"OUTPUT FORMAT:
You must respond with a raw JSON object. Do not include markdown formatting (like ```json).
The JSON must strictly adhere to this structure:
{{
  "classification": {classifications},
  "confidenceScore": number, // 0.0 to 1.0
  "riskLevel": {risks},
  "summary": "A concise summary of findings, specifically mentioning if the site exists or not based on search results.",
  "featureAnalysis": [
    {{
      "feature": "string", // e.g., "Domain Existence", "SSL", "Reputation"
      "status": "string",
      "risk": {risks},
      "details": "string"
    }}
  ]
}}"#
    )
}

/// 生成モード別のシステム指示
pub fn system_instruction(mode: GenerationMode) -> String {
    match mode {
        GenerationMode::Structured => format!(
            "{ROLE}\n\n{FEATURE_GUIDANCE}\n\nconfidenceScore must be between 0.0 and 1.0. \
             featureAnalysis must contain at least one entry."
        ),
        GenerationMode::SearchGrounded => {
            format!("{ROLE}\n\n{SEARCH_RULES}\n\n{FEATURE_GUIDANCE}\n\n{}", output_format())
        }
    }
}

/// ユーザープロンプト生成
pub fn build_user_prompt(url: &str) -> String {
    format!("Analyze this URL: {}", url)
}

/// 構造化出力用スキーマ（Gemini OpenAPIサブセット）
///
/// groundingUrls はAIに生成させないので含めない。
pub fn response_schema() -> Value {
    let classifications: Vec<&str> = Classification::ALL.iter().map(|c| c.as_str()).collect();
    let risks: Vec<&str> = RiskLevel::ALL.iter().map(|r| r.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "classification": { "type": "STRING", "enum": classifications },
            "confidenceScore": {
                "type": "NUMBER",
                "description": "Confidence between 0.0 and 1.0"
            },
            "riskLevel": { "type": "STRING", "enum": risks },
            "summary": { "type": "STRING" },
            "featureAnalysis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "feature": { "type": "STRING" },
                        "status": { "type": "STRING" },
                        "risk": { "type": "STRING", "enum": risks },
                        "details": { "type": "STRING" }
                    },
                    "required": ["feature", "status", "risk", "details"]
                }
            }
        },
        "required": ["classification", "confidenceScore", "riskLevel", "summary", "featureAnalysis"]
    })
}
