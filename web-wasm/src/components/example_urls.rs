//! サンプルURLボタン

use leptos::prelude::*;
use phishguard_common::{Classification, EXAMPLE_URLS};

fn badge_class(expected: Classification) -> &'static str {
    match expected {
        Classification::Legitimate => "example-btn example-legitimate",
        Classification::Suspicious => "example-btn example-suspicious",
        Classification::Phishing => "example-btn example-phishing",
    }
}

#[component]
pub fn ExampleUrls<F>(
    #[prop(into)] is_loading: Signal<bool>,
    on_select: F,
) -> impl IntoView
where
    F: Fn(String) + 'static + Clone,
{
    view! {
        <div class="example-urls">
            <span class="text-muted">"Try an example:"</span>
            {EXAMPLE_URLS
                .iter()
                .map(|example| {
                    let on_select = on_select.clone();
                    view! {
                        <button
                            type="button"
                            class=badge_class(example.expected)
                            title=example.label
                            disabled=move || is_loading.get()
                            on:click=move |_| on_select(example.url.to_string())
                        >
                            {example.url}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_class_per_expectation() {
        assert!(badge_class(Classification::Phishing).ends_with("example-phishing"));
        assert!(badge_class(Classification::Legitimate).ends_with("example-legitimate"));
    }
}
