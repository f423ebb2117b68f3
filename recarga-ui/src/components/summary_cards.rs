//! Summary Cards Component
//!
//! Headline totals shown above the dashboard charts.

use leptos::*;
use recarga::{DashboardSummary, Locale};

#[component]
pub fn SummaryCards(summary: DashboardSummary, locale: Locale) -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-5 gap-4">
            {summary
                .entries(locale)
                .into_iter()
                .map(|(label, value)| view! {
                    <div class="bg-white rounded-lg shadow p-4">
                        <p class="text-sm text-gray-500">{label}</p>
                        <p class="text-xl font-semibold">{value}</p>
                    </div>
                })
                .collect_view()}
        </div>
    }
}
