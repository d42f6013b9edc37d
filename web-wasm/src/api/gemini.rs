//! Gemini API連携（fetch）
//!
//! リクエスト組み立てとレスポンス検証は phishguard_common に任せ、
//! ここでは fetch 送信・タイムアウト・エラー変換だけを行う。

use futures::future::{select, Either};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use phishguard_common::{
    build_request, endpoint_url, interpret_response, AnalysisError, AnalysisRequest,
    AnalysisResult, GeminiRequest, GeminiResponse, GenerationMode, DEFAULT_MODEL, GEMINI_API_BASE,
};

const DEFAULT_TIMEOUT_MS: u32 = 60_000;

/// ビルド時に埋め込まれたAPIキー
///
/// `GEMINI_API_KEY`（なければ `API_KEY`）をビルド環境から読む。空文字は未設定扱い。
pub fn configured_api_key() -> Option<&'static str> {
    option_env!("GEMINI_API_KEY")
        .or(option_env!("API_KEY"))
        .filter(|key| !key.trim().is_empty())
}

/// ビルド時指定の生成モード（未指定なら検索モード）
pub fn configured_mode() -> GenerationMode {
    option_env!("PHISHGUARD_MODE")
        .and_then(|mode| mode.parse().ok())
        .unwrap_or_default()
}

/// Gemini API クライアント（ブラウザ用）
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    mode: GenerationMode,
    timeout_ms: u32,
}

impl GeminiClient {
    /// APIキー必須。空ならクライアントを作らない
    pub fn new(api_key: &str, mode: GenerationMode) -> Option<Self> {
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            api_key: api_key.to_string(),
            base_url: option_env!("PHISHGUARD_API_BASE").unwrap_or(GEMINI_API_BASE).to_string(),
            model: option_env!("PHISHGUARD_MODEL").unwrap_or(DEFAULT_MODEL).to_string(),
            mode,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    /// ビルド環境の設定から生成
    pub fn from_build_env() -> Option<Self> {
        Self::new(configured_api_key()?, configured_mode())
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// URLを解析（1回のfetch、リトライなし）
    pub async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalysisError> {
        let request = AnalysisRequest::new(url)?;
        let body = build_request(&request, self.mode);
        let endpoint = endpoint_url(&self.base_url, &self.model);

        let fetch = Box::pin(call_gemini_api(&endpoint, &self.api_key, &body));
        let timeout = Box::pin(TimeoutFuture::new(self.timeout_ms));

        let payload = match select(fetch, timeout).await {
            Either::Left((result, _)) => result?,
            Either::Right(_) => {
                return Err(unavailable(format!(
                    "request timed out after {} ms",
                    self.timeout_ms
                )))
            }
        };

        interpret_response(&payload, self.mode).inspect_err(|e| log_error(&e.to_string()))
    }
}

/// Gemini API呼び出し（fetch）
async fn call_gemini_api(
    endpoint: &str,
    api_key: &str,
    request: &GeminiRequest,
) -> Result<GeminiResponse, AnalysisError> {
    let body = serde_json::to_string(request)
        .map_err(encode_error)
        .inspect_err(|e| log_error(&e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(endpoint, &opts).map_err(js_unavailable)?;
    let headers = request.headers();
    headers.set("Content-Type", "application/json").map_err(js_unavailable)?;
    headers.set("x-goog-api-key", api_key).map_err(js_unavailable)?;

    let window = web_sys::window().ok_or_else(|| unavailable("window is not available".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_unavailable)?;
    let resp: Response = resp_value.dyn_into().map_err(js_unavailable)?;

    if !resp.ok() {
        let error = status_error(resp.status());
        log_error(&error.to_string());
        return Err(error);
    }

    let json = JsFuture::from(resp.json().map_err(js_unavailable)?)
        .await
        .map_err(|e| {
            log_error(&format!("{:?}", e));
            AnalysisError::MalformedResponse("response body is not JSON".into())
        })?;

    serde_wasm_bindgen::from_value(json)
        .map_err(|e| AnalysisError::MalformedResponse(format!("invalid Gemini payload: {}", e)))
}

/// リクエストの組み立て失敗は利用者の入力ミスではない
fn encode_error(e: serde_json::Error) -> AnalysisError {
    AnalysisError::ServiceUnavailable(format!("request encode error: {}", e))
}

fn status_error(status: u16) -> AnalysisError {
    AnalysisError::ServiceUnavailable(format!("API error: {}", status))
}

fn unavailable(detail: String) -> AnalysisError {
    log_error(&detail);
    AnalysisError::ServiceUnavailable(detail)
}

fn js_unavailable(value: JsValue) -> AnalysisError {
    unavailable(format!("{:?}", value))
}

/// 診断情報はブラウザのコンソールへ（画面には出さない）
fn log_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(&format!("[phishguard] {}", message)));
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn client_for(base_url: &str, timeout_ms: u32) -> GeminiClient {
        GeminiClient {
            base_url: base_url.to_string(),
            timeout_ms,
            ..GeminiClient::new("test-key", GenerationMode::Structured).unwrap()
        }
    }

    // =============================================
    // fetch 送信とエラー変換
    // =============================================

    /// 不正URLは fetch せずに InvalidInput
    #[wasm_bindgen_test]
    async fn test_invalid_url_makes_no_call() {
        let error = client_for("http://127.0.0.1:9", 5_000)
            .analyze("not-a-url")
            .await
            .unwrap_err();

        assert!(matches!(error, AnalysisError::InvalidInput(_)));
    }

    /// 接続できない → ServiceUnavailable
    #[wasm_bindgen_test]
    async fn test_fetch_failure_is_service_unavailable() {
        let error = client_for("http://127.0.0.1:9", 5_000)
            .analyze("https://example.com")
            .await
            .unwrap_err();

        assert!(matches!(error, AnalysisError::ServiceUnavailable(_)));
    }

    /// 応答のない接続先 → タイマー側が勝って ServiceUnavailable
    #[wasm_bindgen_test]
    async fn test_timeout_is_service_unavailable() {
        let error = client_for("http://10.255.255.1", 50)
            .analyze("https://example.com")
            .await
            .unwrap_err();

        assert!(matches!(error, AnalysisError::ServiceUnavailable(_)));
        assert!(error.user_message().contains("service may be busy"));
    }
}
