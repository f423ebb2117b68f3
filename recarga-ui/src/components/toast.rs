//! Toast Notification Component
//!
//! Shows success and error messages.

use leptos::*;
use recarga::{Notice, NoticeLevel};

use crate::state::global::use_global_state;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_global_state();

    view! {
        <div class="fixed bottom-4 right-4 z-50 space-y-2">
            <For
                each=move || state.toasts.get()
                key=|(id, _)| *id
                children=move |(id, notice)| view! { <ToastMessage id=id notice=notice /> }
            />
        </div>
    }
}

#[component]
fn ToastMessage(id: u64, notice: Notice) -> impl IntoView {
    let state = use_global_state();
    let (icon, bg_class) = match notice.level {
        NoticeLevel::Success => ("✓", "bg-green-600"),
        NoticeLevel::Danger => ("✕", "bg-red-600"),
    };

    view! {
        <div
            role="alert"
            class=format!(
                "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg",
                bg_class
            )
        >
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{notice.message}</span>
            <button
                class="ml-2 text-white/80 hover:text-white"
                aria-label=state.locale.messages().close
                on:click=move |_| state.dismiss(id)
            >
                "×"
            </button>
        </div>
    }
}
