//! 解析セッション（スレッド安全版の状態管理）
//!
//! `AnalysisController` を1つのMutexで包み、AI呼び出しを tokio タスクで実行する。
//! ロックは状態遷移の間だけ保持し、await をまたがない。

use std::sync::{Arc, Mutex, MutexGuard};

use phishguard_common::{AnalysisController, AnalysisState, Resolution};
use tokio::task::JoinHandle;

use crate::client::Analyzer;

pub struct Session<A: Analyzer> {
    analyzer: Arc<A>,
    controller: Arc<Mutex<AnalysisController>>,
}

impl<A: Analyzer> Clone for Session<A> {
    fn clone(&self) -> Self {
        Self {
            analyzer: Arc::clone(&self.analyzer),
            controller: Arc::clone(&self.controller),
        }
    }
}

impl<A: Analyzer> Session<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            controller: Arc::new(Mutex::new(AnalysisController::new())),
        }
    }

    /// 現在の状態のスナップショット
    pub fn state(&self) -> AnalysisState {
        lock(&self.controller).state().clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.controller).is_loading()
    }

    /// URLを送信（結果は `state()` で観測する）
    ///
    /// URLが不正なら即座に Failure となり `None` を返す。
    /// 受理した場合は解析タスクのハンドルを返す。待たずに捨ててもよい。
    pub fn submit(&self, url: &str) -> Option<JoinHandle<Resolution>> {
        let ticket = lock(&self.controller).submit(url)?;

        let analyzer = Arc::clone(&self.analyzer);
        let controller = Arc::clone(&self.controller);

        Some(tokio::spawn(async move {
            let url = ticket.url().to_string();
            // パニックしても状態が Loading のまま残らないよう別タスクで包む
            let outcome = tokio::spawn(async move { analyzer.analyze(&url).await }).await;

            let mut controller = lock(&controller);
            match outcome {
                Ok(outcome) => controller.resolve(ticket, outcome),
                Err(e) => {
                    log::warn!("analysis task #{} died: {}", ticket.token(), e);
                    controller.abandon(ticket)
                }
            }
        }))
    }
}

fn lock(controller: &Mutex<AnalysisController>) -> MutexGuard<'_, AnalysisController> {
    controller.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
