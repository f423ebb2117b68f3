//! Dashboard Charts Renderer
//!
//! Reads the monthly aggregation once and fills the four chart slots.

use crate::api::RechargeApi;
use crate::charts::{self, ChartSlot};
use crate::locale::Locale;
use crate::summary::DashboardSummary;
use crate::view::ChartSurface;

pub struct DashboardChartsRenderer<A, S> {
    api: A,
    surface: S,
    locale: Locale,
}

impl<A: RechargeApi, S: ChartSurface> DashboardChartsRenderer<A, S> {
    pub fn new(api: A, surface: S, locale: Locale) -> Self {
        Self {
            api,
            surface,
            locale,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Fetch the aggregation and render every slot. Not retried.
    pub async fn init(&self) {
        let messages = self.locale.messages();

        let aggregate = match self.api.monthly().await {
            Ok(aggregate) => aggregate,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load monthly aggregation");
                self.fill_all(messages.data_unavailable);
                return;
            }
        };

        if aggregate.is_empty() {
            tracing::debug!("Monthly aggregation is empty");
            self.fill_all(messages.no_data);
            return;
        }

        for spec in charts::build_all(&aggregate, self.locale) {
            self.surface.render_chart(&spec);
        }
        self.surface
            .show_summary(&DashboardSummary::from_aggregate(&aggregate));

        tracing::info!(months = aggregate.labels.len(), "Dashboard charts rendered");
    }

    fn fill_all(&self, message: &str) {
        for slot in ChartSlot::ALL {
            self.surface.show_message(slot, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::{Call, FakeApi, RecordingView};
    use crate::error::ApiError;
    use crate::model::{CostSeries, MonthlyAggregate};

    fn renderer(result: Result<MonthlyAggregate, ApiError>) -> DashboardChartsRenderer<FakeApi, RecordingView> {
        let api = FakeApi::default();
        api.monthly_result.replace(Some(result));
        DashboardChartsRenderer::new(api, RecordingView::default(), Locale::PtBr)
    }

    #[tokio::test]
    async fn test_failure_fills_every_slot() {
        let r = renderer(Err(ApiError::Transport("connection refused".into())));
        r.init().await;

        let messages = r.surface().messages.borrow().clone();
        assert_eq!(messages.len(), 4);
        assert!(messages
            .iter()
            .all(|(_, m)| m == "Não foi possível carregar os dados."));
        assert!(r.surface().charts.borrow().is_empty());
        assert!(r.surface().summary.borrow().is_none());
    }

    #[tokio::test]
    async fn test_empty_labels_show_no_data() {
        let r = renderer(Ok(MonthlyAggregate::default()));
        r.init().await;

        let messages = r.surface().messages.borrow().clone();
        let slots: Vec<ChartSlot> = messages.iter().map(|(s, _)| *s).collect();
        assert_eq!(slots, ChartSlot::ALL.to_vec());
        assert!(messages.iter().all(|(_, m)| m == "Sem dados para exibir."));
    }

    #[tokio::test]
    async fn test_renders_four_charts_and_summary() {
        let r = renderer(Ok(MonthlyAggregate {
            labels: vec!["2024-01".into(), "2024-02".into()],
            custos: CostSeries {
                total: vec![Some(10.0), Some(20.0)],
                pagas: vec![Some(10.0), Some(0.0)],
                percentual: vec![Some(100.0), Some(0.0)],
            },
            ..MonthlyAggregate::default()
        }));
        r.init().await;

        assert_eq!(r.api.calls(), vec![Call::Monthly]);
        let charts = r.surface().charts.borrow().clone();
        assert_eq!(charts.len(), 4);
        assert_eq!(charts[0].slot.canvas_id(), "chartCustos");
        assert_eq!(charts[3].slot.canvas_id(), "chartEconomia");
        assert_eq!(charts[1].data.labels, vec!["01/2024", "02/2024"]);
        assert!(r.surface().messages.borrow().is_empty());

        let summary = r.surface().summary.borrow().clone().unwrap();
        assert_eq!(summary.total_cost, 30.0);
    }
}
