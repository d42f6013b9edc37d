//! 解析状態マシン
//!
//! Idle → Loading → Success | Failure の4状態。
//! 状態はタグ付きenumで持ち、「Loading中なのにエラーがある」のような
//! 矛盾した組み合わせを型で排除する。
//!
//! 非同期処理そのものは持たない。呼び出し側（CLIのSession、WebのApp）が
//! `submit` で得た `Ticket` を使ってAI呼び出しを行い、結果を `resolve` に渡す。
//! submit のたびにトークンを進め、最新でないトークンの結果は破棄する。

use crate::error::{AnalysisError, INVALID_URL_MESSAGE, UNEXPECTED_ERROR_MESSAGE};
use crate::types::{AnalysisRequest, AnalysisResult};

/// 画面に見える状態
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Success(AnalysisResult),
    Failure(String),
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// 実行中リクエストの引換券
#[derive(Debug)]
pub struct Ticket {
    token: u64,
    request: AnalysisRequest,
}

impl Ticket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    pub fn url(&self) -> &str {
        self.request.url()
    }
}

/// resolve の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// より新しい submit があったため破棄
    Stale,
}

/// 解析状態コントローラ
#[derive(Debug, Default)]
pub struct AnalysisController {
    state: AnalysisState,
    latest_token: u64,
}

impl AnalysisController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// 最後に発行したトークン
    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    /// URLを受け付ける
    ///
    /// URLが不正なら即座に Failure へ遷移して `None` を返す（AI呼び出しなし）。
    /// 正しければ前回の結果・エラーを消して Loading へ遷移し、`Ticket` を返す。
    pub fn submit(&mut self, url: &str) -> Option<Ticket> {
        self.latest_token += 1;
        let token = self.latest_token;

        match AnalysisRequest::new(url) {
            Ok(request) => {
                self.state = AnalysisState::Loading;
                Some(Ticket { token, request })
            }
            Err(e) => {
                log::debug!("rejected submission #{}: {}", token, e);
                self.state = AnalysisState::Failure(INVALID_URL_MESSAGE.to_string());
                None
            }
        }
    }

    /// AI呼び出しの結果を反映
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Resolution {
        if ticket.token != self.latest_token {
            log::debug!(
                "discarding stale response #{} (latest #{})",
                ticket.token,
                self.latest_token
            );
            return Resolution::Stale;
        }

        self.state = match outcome {
            Ok(result) => AnalysisState::Success(result),
            Err(e) => {
                log::debug!("analysis #{} failed: {}", ticket.token, e);
                AnalysisState::Failure(e.user_message().to_string())
            }
        };
        Resolution::Applied
    }

    /// 結果を得られずに終わったリクエスト（パニック・キャンセル）を閉じる
    pub fn abandon(&mut self, ticket: Ticket) -> Resolution {
        if ticket.token != self.latest_token {
            return Resolution::Stale;
        }
        self.state = AnalysisState::Failure(UNEXPECTED_ERROR_MESSAGE.to_string());
        Resolution::Applied
    }
}
