//! GeminiClient 結合テスト
//!
//! ローカルのモックサーバに対して送信・解釈・エラー変換を検証

mod common;

use std::time::Duration;

use common::{closed_base_url, gemini_body, serve_once, serve_once_with_delay, LEGITIMATE_JSON};
use phishguard::client::GeminiClient;
use phishguard_common::{AnalysisError, Classification, GenerationMode, RiskLevel};

fn client(base_url: &str, mode: GenerationMode) -> GeminiClient {
    GeminiClient::new("test-key")
        .expect("クライアント生成失敗")
        .with_base_url(base_url)
        .with_mode(mode)
        .with_timeout(Duration::from_secs(5))
}

/// 正常な構造化レスポンス
#[tokio::test]
async fn test_structured_success() {
    let (base, server) = serve_once(200, gemini_body(LEGITIMATE_JSON, &[])).await;

    let result = client(&base, GenerationMode::Structured)
        .analyze("https://example.com")
        .await
        .expect("解析失敗");

    assert_eq!(result.classification, Classification::Legitimate);
    assert_eq!(result.confidence_score, 0.92);
    assert_eq!(result.risk_level, RiskLevel::None);
    assert_eq!(result.feature_analysis[0].feature, "SSL");
    assert_eq!(result.feature_analysis[1].feature, "Domain Age");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
    assert!(request.to_lowercase().contains("x-goog-api-key: test-key"));
    assert!(!request.contains("key=test-key"));
    assert!(request.contains("\"responseSchema\""));
    assert!(request.contains("Analyze this URL: https://example.com"));
}

/// 検索モード: 前置き付きJSONとグラウンディングURL
#[tokio::test]
async fn test_search_grounded_with_prose_and_citations() {
    let text = format!(
        "I verified the domain with Google Search. Here is the result:\n{}\nLet me know if you need anything else.",
        LEGITIMATE_JSON
    );
    let body = gemini_body(&text, &["https://en.wikipedia.org/wiki/Google", "https://safebrowsing.example"]);
    let (base, server) = serve_once(200, body).await;

    let result = client(&base, GenerationMode::SearchGrounded)
        .analyze("https://www.google.com")
        .await
        .expect("解析失敗");

    assert_eq!(result.classification, Classification::Legitimate);
    assert_eq!(
        result.grounding_urls,
        vec![
            "https://en.wikipedia.org/wiki/Google".to_string(),
            "https://safebrowsing.example".to_string(),
        ]
    );

    let request = server.await.unwrap();
    assert!(request.contains("\"googleSearch\""));
    assert!(!request.contains("\"responseMimeType\""));
}

/// JSONを含まないテキスト → MalformedResponse
#[tokio::test]
async fn test_text_without_braces() {
    let (base, _server) =
        serve_once(200, gemini_body("I'm sorry, I can't analyze that URL right now.", &[])).await;

    let error = client(&base, GenerationMode::SearchGrounded)
        .analyze("https://example.com")
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::MalformedResponse(_)));
}

/// 必須項目欠落 → InvalidResultShape
#[tokio::test]
async fn test_invalid_shape() {
    let text = r#"{"classification":"legitimate","confidenceScore":1.5,"riskLevel":"None","featureAnalysis":[{"feature":"SSL","risk":"None"}]}"#;
    let (base, _server) = serve_once(200, gemini_body(text, &[])).await;

    let error = client(&base, GenerationMode::Structured)
        .analyze("https://example.com")
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::InvalidResultShape(_)));
}

/// Gemini形式でないボディ → MalformedResponse
#[tokio::test]
async fn test_non_json_payload() {
    let (base, _server) = serve_once(200, "<html>gateway</html>".to_string()).await;

    let error = client(&base, GenerationMode::Structured)
        .analyze("https://example.com")
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::MalformedResponse(_)));
}

/// 非2xx → ServiceUnavailable（ユーザー向けには詳細を出さない）
#[tokio::test]
async fn test_http_error_status() {
    let body = r#"{"error":{"code":503,"message":"The model is overloaded."}}"#.to_string();
    let (base, _server) = serve_once(503, body).await;

    let error = client(&base, GenerationMode::SearchGrounded)
        .analyze("https://example.com")
        .await
        .unwrap_err();

    assert!(matches!(&error, AnalysisError::ServiceUnavailable(detail) if detail.contains("503")));
    assert!(error.user_message().contains("service may be busy"));
    assert!(!error.user_message().contains("overloaded"));
}

/// 接続拒否 → ServiceUnavailable
#[tokio::test]
async fn test_connection_refused() {
    let base = closed_base_url().await;

    let error = client(&base, GenerationMode::SearchGrounded)
        .analyze("https://example.com")
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::ServiceUnavailable(_)));
}

/// タイムアウト → ServiceUnavailable
#[tokio::test]
async fn test_timeout() {
    let (base, _server) =
        serve_once_with_delay(200, gemini_body(LEGITIMATE_JSON, &[]), Duration::from_secs(5)).await;

    let error = client(&base, GenerationMode::Structured)
        .with_timeout(Duration::from_millis(200))
        .analyze("https://example.com")
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::ServiceUnavailable(_)));
}

/// 不正URLは送信前に拒否（サーバなしでも InvalidInput）
#[tokio::test]
async fn test_invalid_url_makes_no_call() {
    let base = closed_base_url().await;

    let error = client(&base, GenerationMode::SearchGrounded)
        .analyze("not-a-url")
        .await
        .unwrap_err();

    assert!(matches!(error, AnalysisError::InvalidInput(_)));
}
