//! Dashboard Page
//!
//! Four monthly charts and the headline totals, loaded once on mount.

use leptos::*;
use recarga::{ChartSlot, ChartSpec, ChartSurface, DashboardChartsRenderer, DashboardSummary};
use std::collections::HashMap;

use crate::api::GlooRechargeApi;
use crate::components::{ChartCanvas, Loading, SummaryCards};
use crate::state::global::use_global_state;

/// What a chart placeholder currently shows
#[derive(Clone, PartialEq)]
enum SlotContent {
    Chart(ChartSpec),
    Message(String),
}

/// [`ChartSurface`] writing into signals the page renders from
#[derive(Clone, Copy)]
struct SignalChartSurface {
    slots: RwSignal<HashMap<ChartSlot, SlotContent>>,
    summary: RwSignal<Option<DashboardSummary>>,
}

impl ChartSurface for SignalChartSurface {
    fn render_chart(&self, spec: &ChartSpec) {
        let content = SlotContent::Chart(spec.clone());
        self.slots.update(|s| {
            s.insert(spec.slot, content);
        });
    }

    fn show_message(&self, slot: ChartSlot, message: &str) {
        let content = SlotContent::Message(message.to_string());
        self.slots.update(|s| {
            s.insert(slot, content);
        });
    }

    fn show_summary(&self, summary: &DashboardSummary) {
        self.summary.set(Some(summary.clone()));
    }
}

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_global_state();
    let locale = state.locale;
    let surface = SignalChartSurface {
        slots: create_rw_signal(HashMap::new()),
        summary: create_rw_signal(None),
    };

    let renderer = DashboardChartsRenderer::new(GlooRechargeApi::new(), surface, locale);
    spawn_local(async move { renderer.init().await });

    view! {
        <div class="space-y-8">
            <h1 class="text-3xl font-bold">"Dashboard"</h1>

            {move || surface.summary.get().map(|summary| view! {
                <SummaryCards summary=summary locale=locale />
            })}

            <div class="grid md:grid-cols-2 gap-8">
                {ChartSlot::ALL
                    .into_iter()
                    .map(|slot| {
                        // Only redraw a slot when its own content changes
                        let content = create_memo(move |_| surface.slots.with(|s| s.get(&slot).cloned()));
                        view! {
                            <section class="bg-white rounded-xl shadow p-6">
                                <h2 class="text-xl font-semibold mb-4">{slot.title(locale)}</h2>
                                {move || match content.get() {
                                    None => view! { <Loading /> }.into_view(),
                                    Some(SlotContent::Chart(spec)) => view! { <ChartCanvas spec=spec /> }.into_view(),
                                    Some(SlotContent::Message(message)) => view! {
                                        <p class="text-gray-500 text-center py-12">{message}</p>
                                    }.into_view(),
                                }}
                            </section>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
