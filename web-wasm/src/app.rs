//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::gemini::GeminiClient;
use crate::components::{
    example_urls::ExampleUrls,
    footer::Footer,
    header::Header,
    loading_indicator::LoadingIndicator,
    result_display::ResultDisplay,
    url_input_form::UrlInputForm,
};
use phishguard_common::{AnalysisController, AnalysisState};

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let client = GeminiClient::from_build_env();

    view! {
        <div class="container">
            <Header />
            {match client {
                Some(client) => view! { <PhishingDetector client=client /> }.into_any(),
                None => view! { <ConfigError /> }.into_any(),
            }}
            <Footer />
        </div>
    }
}

/// URL入力・解析・結果表示
#[component]
fn PhishingDetector(client: GeminiClient) -> impl IntoView {
    let controller = RwSignal::new(AnalysisController::new());
    let is_loading = Signal::derive(move || controller.with(|c| c.is_loading()));
    let mode = client.mode();

    // 送信ハンドラ（不正URLはここで Failure になり、AIは呼ばない）
    let on_submit = move |url: String| {
        let Some(ticket) = controller.try_update(|c| c.submit(&url)).flatten() else {
            return;
        };
        let client = client.clone();
        spawn_local(async move {
            let outcome = client.analyze(ticket.url()).await;
            controller.update(|c| {
                c.resolve(ticket, outcome);
            });
        });
    };

    view! {
        <main class="detector">
            <UrlInputForm is_loading=is_loading on_submit=on_submit.clone() />
            <ExampleUrls is_loading=is_loading on_select=on_submit />
            <p class="text-muted mode-note">{format!("Analysis mode: {}", mode)}</p>

            {move || match controller.with(|c| c.state().clone()) {
                AnalysisState::Idle => view! {
                    <p class="text-muted idle-hint">
                        "Paste a URL above or pick an example to scan it for phishing threats."
                    </p>
                }
                .into_any(),
                AnalysisState::Loading => view! { <LoadingIndicator /> }.into_any(),
                AnalysisState::Failure(message) => view! {
                    <div class="error-box" role="alert">
                        <strong>"Error: "</strong>
                        {message}
                    </div>
                }
                .into_any(),
                AnalysisState::Success(result) => view! { <ResultDisplay result=result /> }.into_any(),
            }}
        </main>
    }
}

/// APIキー未設定時の表示
#[component]
fn ConfigError() -> impl IntoView {
    view! {
        <div class="error-box config-error" role="alert">
            <h2>"Configuration Error"</h2>
            <p>
                "The Gemini API key is not configured. Set GEMINI_API_KEY (or API_KEY) "
                "when building the app and reload the page."
            </p>
        </div>
    }
}
