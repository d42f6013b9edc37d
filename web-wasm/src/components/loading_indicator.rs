//! 解析中インジケーター

use leptos::prelude::*;

#[component]
pub fn LoadingIndicator() -> impl IntoView {
    view! {
        <div class="loading-container" aria-busy="true">
            <div class="spinner" />
            <p class="loading-text">"Analyzing URL... This may take a moment."</p>
        </div>
    }
}
