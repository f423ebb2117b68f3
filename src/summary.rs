//! Dashboard Summary
//!
//! Headline totals and averages over the monthly aggregation.

use serde::Serialize;

use crate::charts::ValueFormat;
use crate::locale::Locale;
use crate::model::{MonthlyAggregate, Series};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub months: usize,
    pub total_cost: f64,
    pub paid_cost: f64,
    pub total_kwh: f64,
    pub total_km: f64,
    pub cost_per_kwh: f64,
    pub cost_per_km: f64,
    pub total_savings: f64,
    pub paid_savings: f64,
    pub savings_per_km: f64,
}

fn sum(series: &Series) -> f64 {
    series.iter().flatten().sum()
}

/// `numerator / denominator`, or 0 when the denominator is not positive
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl DashboardSummary {
    pub fn from_aggregate(aggregate: &MonthlyAggregate) -> Self {
        let total_cost = sum(&aggregate.custos.total);
        let total_kwh = sum(&aggregate.consumo);
        let total_km = sum(&aggregate.km);
        let total_savings = sum(&aggregate.economia.total);

        Self {
            months: aggregate.labels.len(),
            total_cost,
            paid_cost: sum(&aggregate.custos.pagas),
            total_kwh,
            total_km,
            cost_per_kwh: ratio(total_cost, total_kwh),
            cost_per_km: ratio(total_cost, total_km),
            total_savings,
            paid_savings: sum(&aggregate.economia.pagas),
            savings_per_km: ratio(total_savings, total_km),
        }
    }

    /// Labelled, formatted values in display order
    pub fn entries(&self, locale: Locale) -> Vec<(&'static str, String)> {
        let m = locale.messages();
        let money = |v: f64| ValueFormat::Currency.format(locale, Some(v));
        let number = |v: f64| ValueFormat::Number.format(locale, Some(v));
        vec![
            (m.summary_total_cost, money(self.total_cost)),
            (m.summary_paid_cost, money(self.paid_cost)),
            (m.summary_total_kwh, number(self.total_kwh)),
            (m.summary_total_km, number(self.total_km)),
            (m.summary_cost_per_kwh, money(self.cost_per_kwh)),
            (m.summary_cost_per_km, money(self.cost_per_km)),
            (m.summary_total_savings, money(self.total_savings)),
            (m.summary_paid_savings, money(self.paid_savings)),
            (m.summary_savings_per_km, money(self.savings_per_km)),
        ]
    }
}
