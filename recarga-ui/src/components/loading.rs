//! Loading Component

use leptos::*;

/// Spinner shown while a chart placeholder waits for data
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="loading-spinner w-8 h-8" />
        </div>
    }
}
