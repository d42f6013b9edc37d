//! 端末表示
//!
//! 状態ごとに表示文字列を組み立てる（出力は呼び出し側）。

use phishguard_common::{AnalysisResult, AnalysisState, Classification, RiskLevel};

fn classification_icon(classification: Classification) -> &'static str {
    match classification {
        Classification::Legitimate => "✅",
        Classification::Phishing => "🚨",
        Classification::Suspicious => "⚠️",
    }
}

fn risk_icon(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::High => "✖",
        RiskLevel::Medium => "▲",
        RiskLevel::Low => "ℹ",
        RiskLevel::None => "✔",
    }
}

/// 確信度バー（20桁）
fn confidence_bar(percent: u8) -> String {
    let filled = (usize::from(percent) * 20 + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled))
}

/// 解析結果の表示
pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let percent = result.confidence_percent();

    out.push_str(&format!(
        "{} {}\n",
        classification_icon(result.classification),
        result.classification.title()
    ));
    out.push_str(&format!("Overall Risk Level: {}\n", result.risk_level));
    out.push_str(&format!("Confidence: {} {}%\n", confidence_bar(percent), percent));

    if !result.summary.is_empty() {
        out.push_str(&format!("\n{}\n", result.summary));
    }

    out.push_str("\nDetailed Analysis\n");
    for (i, finding) in result.feature_analysis.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} {}: {} [{}]\n",
            i + 1,
            risk_icon(finding.risk),
            finding.feature,
            finding.status,
            finding.risk
        ));
        if !finding.details.is_empty() {
            out.push_str(&format!("       {}\n", finding.details));
        }
    }

    if !result.grounding_urls.is_empty() {
        out.push_str("\nVerified Sources & Search Context\n");
        for url in &result.grounding_urls {
            out.push_str(&format!("  - {}\n", url));
        }
    }

    out
}

/// 状態の表示
pub fn render_state(state: &AnalysisState) -> String {
    match state {
        AnalysisState::Idle => "Paste a URL to scan it for phishing threats.\n".to_string(),
        AnalysisState::Loading => "Analyzing URL... This may take a moment.\n".to_string(),
        AnalysisState::Failure(message) => format!("❌ {}\n", message),
        AnalysisState::Success(result) => render_result(result),
    }
}
