//! 解析結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - AnalysisRequest: 送信前に検証済みのURL
//! - Classification / RiskLevel: AIが返す列挙値
//! - FeatureFinding: 個別の特徴分析（SSL、ドメイン評判など）
//! - AnalysisResult: 最終出力

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// 解析リクエスト（検証済みURL）
///
/// `http://` または `https://` で始まることを生成時に保証する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    url: String,
}

impl AnalysisRequest {
    /// URLを検証してリクエストを作成
    ///
    /// 前後の空白は除去する。空文字、またはスキーム不一致は `InvalidInput`。
    pub fn new(url: &str) -> Result<Self, AnalysisError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AnalysisError::InvalidInput("empty URL".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AnalysisError::InvalidInput(format!(
                "unsupported scheme: {}",
                url
            )));
        }
        Ok(Self { url: url.to_string() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// 最終判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Phishing,
    Legitimate,
    Suspicious,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::Phishing,
        Classification::Legitimate,
        Classification::Suspicious,
    ];

    /// ワイヤ上の表記（スキーマのenum値）
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Phishing => "phishing",
            Classification::Legitimate => "legitimate",
            Classification::Suspicious => "suspicious",
        }
    }

    /// 表示用タイトル
    pub fn title(&self) -> &'static str {
        match self {
            Classification::Phishing => "Phishing",
            Classification::Legitimate => "Legitimate",
            Classification::Suspicious => "Suspicious",
        }
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phishing" => Ok(Classification::Phishing),
            "legitimate" => Ok(Classification::Legitimate),
            "suspicious" => Ok(Classification::Suspicious),
            _ => Err(format!("unknown classification: {}", s)),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// リスクレベル
///
/// 宣言順がそのまま深刻度の順序（None < Low < Medium < High）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
        RiskLevel::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
            RiskLevel::None => "None",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(RiskLevel::High),
            "medium" => Ok(RiskLevel::Medium),
            "low" => Ok(RiskLevel::Low),
            "none" => Ok(RiskLevel::None),
            _ => Err(format!("unknown risk level: {}", s)),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 個別の特徴分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFinding {
    pub feature: String,   // 例: "SSL Certificate"
    pub status: String,    // 結果（自由記述）
    pub risk: RiskLevel,
    pub details: String,   // 根拠（自由記述）
}

/// AI解析結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub classification: Classification,

    /// 0.0〜1.0（範囲外はパース時に拒否済み）
    pub confidence_score: f64,

    pub risk_level: RiskLevel,

    pub summary: String,

    /// AIが返した順序のまま保持（空にはならない）
    pub feature_analysis: Vec<FeatureFinding>,

    /// 検索グラウンディングの引用URL（未検証）
    #[serde(default)]
    pub grounding_urls: Vec<String>,
}

impl AnalysisResult {
    /// 確信度を整数パーセントで返す
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence_score * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// 特徴分析の中で最も高いリスク
    pub fn highest_feature_risk(&self) -> Option<RiskLevel> {
        self.feature_analysis.iter().map(|f| f.risk).max()
    }
}

/// ワンクリック解析用のサンプルURL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleUrl {
    pub label: &'static str,
    pub url: &'static str,
    pub expected: Classification,
}

pub const EXAMPLE_URLS: &[ExampleUrl] = &[
    ExampleUrl {
        label: "Legitimate",
        url: "https://www.google.com",
        expected: Classification::Legitimate,
    },
    ExampleUrl {
        label: "Legitimate",
        url: "https://github.com",
        expected: Classification::Legitimate,
    },
    ExampleUrl {
        label: "Phishing",
        url: "http://secure-login-apple-id.com",
        expected: Classification::Phishing,
    },
    ExampleUrl {
        label: "Phishing",
        url: "http://paypal-support-billing.net",
        expected: Classification::Phishing,
    },
];
