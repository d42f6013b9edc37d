//! エラー型定義

use thiserror::Error;

/// URL不正時にユーザーへ表示するメッセージ
pub const INVALID_URL_MESSAGE: &str =
    "Please enter a valid URL starting with http:// or https://";

/// AIサービス到達不能時のメッセージ
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Failed to get analysis from AI. The service may be busy or the URL is invalid.";

/// AI応答が解釈できない時のメッセージ
pub const BAD_RESPONSE_MESSAGE: &str =
    "The AI service returned a response that could not be understood. Please try again.";

/// 原因不明時のフォールバック
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// 解析エラー
///
/// `Display` は診断用の詳細を含む（ログ向け）。
/// 画面に出すのは `user_message()` のみ。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid result shape: {0}")]
    InvalidResultShape(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AnalysisError {
    /// ユーザー向けの短いメッセージ
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput(_) => INVALID_URL_MESSAGE,
            AnalysisError::MalformedResponse(_) | AnalysisError::InvalidResultShape(_) => {
                BAD_RESPONSE_MESSAGE
            }
            AnalysisError::ServiceUnavailable(_) => SERVICE_UNAVAILABLE_MESSAGE,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, AnalysisError>;
