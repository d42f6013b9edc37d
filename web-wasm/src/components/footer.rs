//! フッターコンポーネント

use leptos::prelude::*;

#[component]
pub fn Footer() -> impl IntoView {
    let year = js_sys::Date::new_0().get_full_year();

    view! {
        <footer class="footer">
            <p class="disclaimer">
                "Results are generated by AI and may be inaccurate. "
                "Always verify a site before entering credentials."
            </p>
            <p class="text-muted">{format!("© {} PhishGuard", year)}</p>
        </footer>
    }
}
