//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"PhishGuard"</h1>
            <p class="tagline">"AI-powered phishing URL analysis with live search verification"</p>
        </header>
    }
}
