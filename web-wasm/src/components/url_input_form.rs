//! URL入力フォーム

use leptos::prelude::*;

#[component]
pub fn UrlInputForm<F>(
    #[prop(into)] is_loading: Signal<bool>,
    on_submit: F,
) -> impl IntoView
where
    F: Fn(String) + 'static + Clone,
{
    let (url, set_url) = signal(String::new());

    view! {
        <form
            class="url-form"
            on:submit=move |ev| {
                ev.prevent_default();
                on_submit(url.get_untracked());
            }
        >
            <input
                type="text"
                class="url-input"
                placeholder="https://example.com"
                aria-label="URL to analyze"
                prop:value=move || url.get()
                disabled=move || is_loading.get()
                on:input=move |ev| {
                    set_url.set(event_target_value(&ev));
                }
            />
            <button type="submit" class="btn btn-primary" disabled=move || is_loading.get()>
                {move || if is_loading.get() { "Scanning..." } else { "Scan URL" }}
            </button>
        </form>
    }
}
