//! PhishGuard - Gemini によるフィッシングURL解析
//!
//! CLI用のライブラリ部分。共通ロジックは phishguard_common にあり、
//! ここでは HTTP送信・設定・状態管理（スレッド安全版）・端末表示を扱う。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
