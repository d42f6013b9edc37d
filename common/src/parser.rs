//! AIレスポンスパーサー
//!
//! Gemini の応答テキストからJSONオブジェクトを取り出し、
//! AnalysisResult として検証する。
//!
//! 検証は境界で一度だけ行い、以降のコードは型付きの値だけを扱う。

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AnalysisError, Result};
use crate::gemini::GenerationMode;
use crate::types::{AnalysisResult, Classification, FeatureFinding, RiskLevel};

/// 応答テキストからJSONオブジェクト部分を抽出
///
/// 最初の `{` から最後の `}` までを返す。会話調の前置きや
/// ```json フェンスはこれで除去される。
///
/// # Examples
/// ```
/// use phishguard_common::extract_json_object;
///
/// let text = "Here you go: {\"a\": 1} Hope this helps.";
/// assert_eq!(extract_json_object(text).unwrap(), "{\"a\": 1}");
/// ```
pub fn extract_json_object(text: &str) -> Result<&str> {
    let start = text.find('{');
    let end = text.rfind('}');

    match (start, end) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(AnalysisError::MalformedResponse(
            "no JSON object found in response".into(),
        )),
    }
}

/// 生成モードに応じて応答テキストをパース
///
/// - Structured: テキスト全体をそのままJSONとして扱う
/// - SearchGrounded: `extract_json_object` で抽出してからパース
pub fn parse_response_text(text: &str, mode: GenerationMode) -> Result<AnalysisResult> {
    let json_str = match mode {
        GenerationMode::Structured => text.trim(),
        GenerationMode::SearchGrounded => extract_json_object(text)?,
    };
    parse_analysis(json_str)
}

/// 検証前の生データ（全フィールド任意）
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    classification: Option<String>,
    confidence_score: Option<f64>,
    risk_level: Option<String>,
    summary: Option<String>,
    feature_analysis: Option<Vec<RawFinding>>,
}

#[derive(Deserialize)]
struct RawFinding {
    feature: Option<String>,
    status: Option<String>,
    risk: Option<String>,
    details: Option<String>,
}

/// JSON文字列をパースして検証
///
/// * JSONとして読めない / オブジェクトでない → `MalformedResponse`
/// * 必須項目の欠落・列挙値不一致・範囲外 → `InvalidResultShape`
pub fn parse_analysis(json_str: &str) -> Result<AnalysisResult> {
    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        log::debug!("unparseable response body: {}", json_str);
        AnalysisError::MalformedResponse(format!("JSON parse error: {}", e))
    })?;

    if !value.is_object() {
        return Err(AnalysisError::MalformedResponse(
            "response JSON is not an object".into(),
        ));
    }

    let raw: RawAnalysis = serde_json::from_value(value)
        .map_err(|e| AnalysisError::InvalidResultShape(format!("unexpected field type: {}", e)))?;

    validate(raw)
}

fn validate(raw: RawAnalysis) -> Result<AnalysisResult> {
    let classification = raw
        .classification
        .ok_or_else(|| shape_error("classification is missing"))?
        .parse::<Classification>()
        .map_err(AnalysisError::InvalidResultShape)?;

    let confidence_score = raw
        .confidence_score
        .ok_or_else(|| shape_error("confidenceScore is missing"))?;
    if !(0.0..=1.0).contains(&confidence_score) {
        return Err(AnalysisError::InvalidResultShape(format!(
            "confidenceScore out of range: {}",
            confidence_score
        )));
    }

    let risk_level = parse_risk(raw.risk_level, "riskLevel")?;

    let raw_findings = raw
        .feature_analysis
        .ok_or_else(|| shape_error("featureAnalysis is missing"))?;
    if raw_findings.is_empty() {
        return Err(shape_error("featureAnalysis is empty"));
    }

    let feature_analysis = raw_findings
        .into_iter()
        .enumerate()
        .map(|(i, f)| -> Result<FeatureFinding> {
            Ok(FeatureFinding {
                feature: f
                    .feature
                    .ok_or_else(|| shape_error(&format!("featureAnalysis[{}].feature is missing", i)))?,
                status: f.status.unwrap_or_default(),
                risk: parse_risk(f.risk, &format!("featureAnalysis[{}].risk", i))?,
                details: f.details.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AnalysisResult {
        classification,
        confidence_score,
        risk_level,
        summary: raw.summary.unwrap_or_default(),
        feature_analysis,
        grounding_urls: Vec::new(),
    })
}

fn parse_risk(value: Option<String>, field: &str) -> Result<RiskLevel> {
    value
        .ok_or_else(|| shape_error(&format!("{} is missing", field)))?
        .parse::<RiskLevel>()
        .map_err(|e| AnalysisError::InvalidResultShape(format!("{}: {}", field, e)))
}

fn shape_error(msg: &str) -> AnalysisError {
    AnalysisError::InvalidResultShape(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "classification": "legitimate",
        "confidenceScore": 0.92,
        "riskLevel": "None",
        "summary": "Well-known site.",
        "featureAnalysis": [
            {"feature": "SSL", "status": "Valid", "risk": "None", "details": "Trusted CA"},
            {"feature": "Domain Age", "status": "20 years", "risk": "Low", "details": "Old domain"},
            {"feature": "Reputation", "status": "Clean", "risk": "None", "details": "No reports"}
        ]
    }"#;

    // =============================================
    // extract_json_object テスト
    // =============================================

    #[test]
    fn test_extract_raw_object() {
        assert_eq!(extract_json_object(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_extract_with_prose() {
        let text = r#"Sure! Here is my analysis: {"a": {"b": 2}} Let me know if you need more."#;
        assert_eq!(extract_json_object(text).unwrap(), r#"{"a": {"b": 2}}"#);
    }

    #[test]
    fn test_extract_with_markdown_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_no_braces() {
        let result = extract_json_object("I could not analyze this URL.");
        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn test_extract_reversed_braces() {
        let result = extract_json_object("} nothing here {");
        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn test_extract_empty() {
        assert!(extract_json_object("").is_err());
    }

    // =============================================
    // parse_analysis テスト
    // =============================================

    #[test]
    fn test_parse_valid_round_trip() {
        let result = parse_analysis(VALID).unwrap();
        assert_eq!(result.classification, Classification::Legitimate);
        assert_eq!(result.confidence_score, 0.92);
        assert_eq!(result.risk_level, RiskLevel::None);
        assert_eq!(result.summary, "Well-known site.");
        assert_eq!(result.feature_analysis.len(), 3);
        assert_eq!(
            result.feature_analysis[1],
            FeatureFinding {
                feature: "Domain Age".to_string(),
                status: "20 years".to_string(),
                risk: RiskLevel::Low,
                details: "Old domain".to_string(),
            }
        );
        assert!(result.grounding_urls.is_empty());
    }

    #[test]
    fn test_parse_preserves_feature_order() {
        let result = parse_analysis(VALID).unwrap();
        let names: Vec<&str> = result.feature_analysis.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, vec!["SSL", "Domain Age", "Reputation"]);
    }

    #[test]
    fn test_parse_allows_duplicate_feature_names() {
        let json = r#"{"classification":"suspicious","confidenceScore":0.5,"riskLevel":"Medium",
            "featureAnalysis":[{"feature":"SSL","risk":"Low"},{"feature":"SSL","risk":"High"}]}"#;
        let result = parse_analysis(json).unwrap();
        assert_eq!(result.feature_analysis.len(), 2);
        assert_eq!(result.feature_analysis[1].risk, RiskLevel::High);
        assert_eq!(result.summary, "");
        assert_eq!(result.feature_analysis[0].status, "");
    }

    #[test]
    fn test_parse_uppercase_enums() {
        let json = r#"{"classification":"PHISHING","confidenceScore":0.8,"riskLevel":"high",
            "featureAnalysis":[{"feature":"Domain","status":"Not found","risk":"HIGH","details":""}]}"#;
        let result = parse_analysis(json).unwrap();
        assert_eq!(result.classification, Classification::Phishing);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_parse_not_json() {
        let result = parse_analysis("{not json}");
        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_array_is_malformed() {
        let result = parse_analysis("[1, 2]");
        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_missing_classification() {
        let json = r#"{"confidenceScore":0.5,"riskLevel":"Low","featureAnalysis":[{"feature":"a","risk":"Low"}]}"#;
        let result = parse_analysis(json);
        assert!(matches!(result, Err(AnalysisError::InvalidResultShape(_))));
    }

    #[test]
    fn test_parse_missing_feature_analysis() {
        let json = r#"{"classification":"legitimate","confidenceScore":0.5,"riskLevel":"Low"}"#;
        let result = parse_analysis(json);
        assert!(matches!(result, Err(AnalysisError::InvalidResultShape(m)) if m.contains("featureAnalysis")));
    }

    #[test]
    fn test_parse_empty_feature_analysis() {
        let json = r#"{"classification":"legitimate","confidenceScore":0.5,"riskLevel":"Low","featureAnalysis":[]}"#;
        let result = parse_analysis(json);
        assert!(matches!(result, Err(AnalysisError::InvalidResultShape(m)) if m.contains("empty")));
    }

    #[test]
    fn test_parse_confidence_out_of_range_rejected() {
        for score in ["1.01", "-0.1", "92"] {
            let json = format!(
                r#"{{"classification":"legitimate","confidenceScore":{},"riskLevel":"Low","featureAnalysis":[{{"feature":"a","risk":"Low"}}]}}"#,
                score
            );
            let result = parse_analysis(&json);
            assert!(
                matches!(result, Err(AnalysisError::InvalidResultShape(_))),
                "範囲外が受理された: {}",
                score
            );
        }
    }

    #[test]
    fn test_parse_confidence_bounds_accepted() {
        for score in ["0", "1", "0.0", "1.0"] {
            let json = format!(
                r#"{{"classification":"legitimate","confidenceScore":{},"riskLevel":"Low","featureAnalysis":[{{"feature":"a","risk":"Low"}}]}}"#,
                score
            );
            assert!(parse_analysis(&json).is_ok(), "境界値が拒否された: {}", score);
        }
    }

    #[test]
    fn test_parse_unknown_enum_rejected() {
        let json = r#"{"classification":"safe","confidenceScore":0.5,"riskLevel":"Low","featureAnalysis":[{"feature":"a","risk":"Low"}]}"#;
        assert!(matches!(parse_analysis(json), Err(AnalysisError::InvalidResultShape(_))));

        let json = r#"{"classification":"legitimate","confidenceScore":0.5,"riskLevel":"Low","featureAnalysis":[{"feature":"a","risk":"Critical"}]}"#;
        assert!(matches!(parse_analysis(json), Err(AnalysisError::InvalidResultShape(m)) if m.contains("featureAnalysis[0].risk")));
    }

    #[test]
    fn test_parse_wrong_type_is_shape_error() {
        let json = r#"{"classification":"legitimate","confidenceScore":"high","riskLevel":"Low","featureAnalysis":[{"feature":"a","risk":"Low"}]}"#;
        assert!(matches!(parse_analysis(json), Err(AnalysisError::InvalidResultShape(_))));
    }

    // =============================================
    // parse_response_text テスト
    // =============================================

    #[test]
    fn test_search_mode_extracts_wrapped_json() {
        let text = format!("Based on my search results, here is the analysis:\n{}\nStay safe!", VALID);
        let result = parse_response_text(&text, GenerationMode::SearchGrounded).unwrap();
        assert_eq!(result.classification, Classification::Legitimate);
    }

    #[test]
    fn test_structured_mode_parses_directly() {
        let result = parse_response_text(VALID, GenerationMode::Structured).unwrap();
        assert_eq!(result.feature_analysis.len(), 3);
    }

    #[test]
    fn test_structured_mode_rejects_prose() {
        let text = format!("Here it is: {}", VALID);
        let result = parse_response_text(&text, GenerationMode::Structured);
        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }
}
