use phishguard_common::AnalysisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhishGuardError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 GEMINI_API_KEY (または API_KEY) を設定してください")]
    MissingApiKey,

    #[error("HTTPクライアント初期化エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    /// 解析失敗（ユーザー向けメッセージのみ保持）
    #[error("{0}")]
    Analysis(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] AnalysisError),
}

pub type Result<T> = std::result::Result<T, PhishGuardError>;
