//! Gemini API クライアント（reqwest）
//!
//! リクエスト組み立てとレスポンス検証は phishguard_common を使い、
//! ここでは送信・タイムアウト・HTTPエラーの変換だけを行う。

use std::future::Future;
use std::time::Duration;

use phishguard_common::{
    build_request, endpoint_url, interpret_response, AnalysisError, AnalysisRequest,
    AnalysisResult, GeminiResponse, GenerationMode, DEFAULT_MODEL, GEMINI_API_BASE,
};

use crate::config::Config;
use crate::error::{PhishGuardError, Result};

/// URL解析の送信口
///
/// 本番は `GeminiClient`、テストではモックを差し込む。
pub trait Analyzer: Send + Sync + 'static {
    fn analyze(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<AnalysisResult, AnalysisError>> + Send;
}

/// Gemini API クライアント
///
/// APIキーは生成時に必須。キーなしのクライアントは作れない。
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    mode: GenerationMode,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PhishGuardError::MissingApiKey);
        }

        Ok(Self {
            http: reqwest::Client::builder().build()?,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            mode: GenerationMode::default(),
            timeout: Duration::from_secs(60),
        })
    }

    pub fn from_config(api_key: impl Into<String>, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(api_key)?
            .with_model(&config.model)
            .with_mode(config.mode)
            .with_timeout(Duration::from_secs(config.timeout_seconds)))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 接続先を差し替える（テスト・プロキシ用）
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// URLを解析（1回のHTTP呼び出し、リトライなし）
    pub async fn analyze(&self, url: &str) -> std::result::Result<AnalysisResult, AnalysisError> {
        // 送信前に検証（不正URLではネットワークを使わない）
        let request = AnalysisRequest::new(url)?;
        let body = build_request(&request, self.mode);
        let endpoint = endpoint_url(&self.base_url, &self.model);

        log::debug!("POST {} ({} mode) for {}", endpoint, self.mode, request.url());

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| unavailable(&format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(unavailable(&format!(
                "API error {}: {}",
                status,
                truncate(&text, 300)
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| unavailable(&format!("failed to read body: {}", e)))?;

        let payload: GeminiResponse = serde_json::from_str(&text).map_err(|e| {
            log::warn!("unexpected Gemini payload: {}", truncate(&text, 300));
            AnalysisError::MalformedResponse(format!("invalid Gemini payload: {}", e))
        })?;

        interpret_response(&payload, self.mode).inspect_err(|e| {
            log::warn!("analysis of {} rejected: {}", request.url(), e);
        })
    }
}

impl Analyzer for GeminiClient {
    async fn analyze(&self, url: &str) -> std::result::Result<AnalysisResult, AnalysisError> {
        GeminiClient::analyze(self, url).await
    }
}

fn unavailable(detail: &str) -> AnalysisError {
    log::warn!("Gemini API unavailable: {}", detail);
    AnalysisError::ServiceUnavailable(detail.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
