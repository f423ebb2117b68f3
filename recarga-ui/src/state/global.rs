//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;
use recarga::{Locale, Notice};

/// How long a toast stays up unless dismissed
pub const TOAST_TIMEOUT_MS: u32 = 5000;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Rendering locale, taken from `<html lang>`
    pub locale: Locale,
    /// Visible toasts, oldest first
    pub toasts: RwSignal<Vec<(u64, Notice)>>,
    next_toast: StoredValue<u64>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        locale: document_locale(),
        toasts: create_rw_signal(Vec::new()),
        next_toast: store_value(0),
    };

    provide_context(state);
}

/// Global state from context
pub fn use_global_state() -> GlobalState {
    expect_context::<GlobalState>()
}

fn document_locale() -> Locale {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .and_then(|html| html.get_attribute("lang"))
        .and_then(|lang| lang.parse().ok())
        .unwrap_or_default()
}

impl GlobalState {
    /// Show a toast (auto-clears after timeout)
    pub fn notify(&self, notice: Notice) {
        let id = self.next_toast.get_value();
        self.next_toast.set_value(id + 1);
        self.toasts.update(|t| t.push((id, notice)));

        let this = *self;
        gloo_timers::callback::Timeout::new(TOAST_TIMEOUT_MS, move || {
            this.dismiss(id);
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|t| t.retain(|(toast, _)| *toast != id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_queue() {
        let runtime = create_runtime();
        let state = GlobalState {
            locale: Locale::PtBr,
            toasts: create_rw_signal(Vec::new()),
            next_toast: store_value(0),
        };

        state.toasts.update(|t| {
            t.push((0, Notice::success("Salvo")));
            t.push((1, Notice::danger("Falhou")));
        });
        state.dismiss(0);
        assert_eq!(state.toasts.get_untracked(), vec![(1, Notice::danger("Falhou"))]);

        runtime.dispose();
    }
}
