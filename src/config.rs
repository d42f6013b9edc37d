use crate::error::{PhishGuardError, Result};
use phishguard_common::{GenerationMode, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIキーを読む環境変数（先頭優先）
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// 設定ファイルの内容
///
/// APIキーは保存しない（環境変数からのみ取得）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub mode: GenerationMode,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            mode: GenerationMode::default(),
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhishGuardError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("phishguard").join("config.json"))
    }

    /// CLI引数で上書き
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        mode: Option<GenerationMode>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(timeout) = timeout_seconds {
            self.timeout_seconds = timeout;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(PhishGuardError::Config("モデル名が空です".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(PhishGuardError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        Ok(())
    }
}

/// 環境変数からAPIキーを取得
///
/// 見つからなければ起動失敗（リクエスト単位のエラーにはしない）。
pub fn api_key_from_env() -> Result<String> {
    pick_api_key(API_KEY_VARS.iter().map(|name| std::env::var(name).ok()))
}

fn pick_api_key(candidates: impl IntoIterator<Item = Option<String>>) -> Result<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .ok_or(PhishGuardError::MissingApiKey)
}
