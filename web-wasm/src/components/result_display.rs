//! 解析結果表示
//!
//! 判定バッジ・総合リスク・確信度バー・項目別分析・参照元リンクを表示する。

use leptos::prelude::*;
use phishguard_common::{AnalysisResult, Classification, FeatureFinding, RiskLevel};

/// 判定ごとのバッジCSSクラス
fn classification_class(classification: Classification) -> &'static str {
    match classification {
        Classification::Legitimate => "badge badge-legitimate",
        Classification::Suspicious => "badge badge-suspicious",
        Classification::Phishing => "badge badge-phishing",
    }
}

/// リスクごとのCSSクラス
fn risk_class(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::High => "risk risk-high",
        RiskLevel::Medium => "risk risk-medium",
        RiskLevel::Low => "risk risk-low",
        RiskLevel::None => "risk risk-none",
    }
}

fn confidence_style(percent: u8) -> String {
    format!("width: {}%", percent)
}

#[component]
pub fn ResultDisplay(result: AnalysisResult) -> impl IntoView {
    let percent = result.confidence_percent();
    let AnalysisResult {
        classification,
        risk_level,
        summary,
        feature_analysis,
        grounding_urls,
        ..
    } = result;

    view! {
        <section class="result-card">
            <div class="result-header">
                <span class=classification_class(classification)>
                    {classification.title()}
                </span>
                <span class=risk_class(risk_level)>
                    {format!("Overall Risk Level: {}", risk_level)}
                </span>
            </div>

            <div class="confidence">
                <span>{format!("Confidence: {}%", percent)}</span>
                <div class="progress-bar">
                    <div class="progress-fill" style=confidence_style(percent) />
                </div>
            </div>

            {(!summary.is_empty()).then(|| view! { <p class="summary">{summary}</p> })}

            <h3>"Detailed Analysis"</h3>
            <ul class="feature-list">
                {feature_analysis
                    .into_iter()
                    .map(|finding| view! { <FeatureRow finding=finding /> })
                    .collect_view()}
            </ul>

            {(!grounding_urls.is_empty()).then(|| view! {
                <div class="sources">
                    <h3>"Verified Sources & Search Context"</h3>
                    <ul>
                        {grounding_urls
                            .into_iter()
                            .map(|url| {
                                let href = url.clone();
                                view! {
                                    <li>
                                        <a href=href target="_blank" rel="noopener noreferrer">
                                            {url}
                                        </a>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </div>
            })}
        </section>
    }
}

#[component]
fn FeatureRow(finding: FeatureFinding) -> impl IntoView {
    view! {
        <li class="feature-row">
            <div class="feature-head">
                <strong>{finding.feature}</strong>
                <span class="feature-status">{finding.status}</span>
                <span class=risk_class(finding.risk)>{finding.risk.as_str()}</span>
            </div>
            {(!finding.details.is_empty()).then(|| view! {
                <p class="feature-details">{finding.details}</p>
            })}
        </li>
    }
}
