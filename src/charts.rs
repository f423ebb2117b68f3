//! Dashboard Chart Configurations
//!
//! Builds the four monthly charts as serializable Chart.js configurations.
//! Serializing a [`ChartSpec`] gives the object handed to `new Chart(..)`;
//! tooltip and tick callbacks are not data, so the value formats travel
//! alongside (skipped by serde) and the renderer wires them up through
//! [`ChartSpec::tooltip_label`] and [`ChartSpec::tick_label`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::format;
use crate::locale::Locale;
use crate::model::{MonthlyAggregate, Series};

/// Dashboard chart placeholders, identified by their canvas element id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartSlot {
    Costs,
    Consumption,
    Distance,
    Savings,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 4] = [
        ChartSlot::Costs,
        ChartSlot::Consumption,
        ChartSlot::Distance,
        ChartSlot::Savings,
    ];

    pub fn canvas_id(self) -> &'static str {
        match self {
            ChartSlot::Costs => "chartCustos",
            ChartSlot::Consumption => "chartConsumo",
            ChartSlot::Distance => "chartKm",
            ChartSlot::Savings => "chartEconomia",
        }
    }

    pub fn title(self, locale: Locale) -> &'static str {
        let m = locale.messages();
        match self {
            ChartSlot::Costs => m.title_costs,
            ChartSlot::Consumption => m.title_consumption,
            ChartSlot::Distance => m.title_distance,
            ChartSlot::Savings => m.title_savings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// How a value is shown in ticks and tooltips
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueFormat {
    /// `R$ 1.234,56`
    Currency,
    /// Raw value followed by `%`
    Percent,
    /// Grouped, at most two decimals
    #[default]
    Number,
}

impl ValueFormat {
    pub fn format(self, locale: Locale, value: Option<f64>) -> String {
        match self {
            ValueFormat::Currency => format::format_currency(locale, value),
            ValueFormat::Number => format::format_decimal(locale, value),
            ValueFormat::Percent => format!("{}%", format::format_plain(value.unwrap_or(0.0))),
        }
    }
}

/// One complete Chart.js configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(skip)]
    pub slot: ChartSlot,
    #[serde(skip)]
    pub locale: Locale,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Overrides the chart type for mixed bar/line charts
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChartKind>,
    pub label: String,
    pub data: Series,
    pub background_color: String,
    pub border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u32>,
    #[serde(rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
    #[serde(skip)]
    pub tooltip: ValueFormat,
    /// Appended to the formatted tooltip value
    #[serde(skip)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
    pub scales: BTreeMap<String, Axis>,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub mode: String,
    pub intersect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub title: AxisTitle,
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    #[serde(skip)]
    pub ticks: ValueFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub draw_on_chart_area: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: String,
}

impl ChartSpec {
    /// Tooltip line for a point: `"<label>: <value>[ <unit>]"`
    pub fn tooltip_label(&self, dataset_index: usize, value: Option<f64>) -> Option<String> {
        let dataset = self.data.datasets.get(dataset_index)?;
        let mut text = format!(
            "{}: {}",
            dataset.label,
            dataset.tooltip.format(self.locale, value)
        );
        if let Some(unit) = &dataset.unit {
            text.push(' ');
            text.push_str(unit);
        }
        Some(text)
    }

    /// Tick label for `value` on the axis `axis_id`
    pub fn tick_label(&self, axis_id: &str, value: f64) -> Option<String> {
        let axis = self.options.scales.get(axis_id)?;
        Some(axis.ticks.format(self.locale, Some(value)))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

struct Palette {
    fill: &'static str,
    stroke: &'static str,
    /// Translucent fill used under line datasets
    line_fill: &'static str,
}

const BLUE: Palette = Palette {
    fill: "rgba(13,110,253,0.6)",
    stroke: "rgba(13,110,253,1)",
    line_fill: "rgba(13,110,253,0.2)",
};
const GREEN: Palette = Palette {
    fill: "rgba(25,135,84,0.6)",
    stroke: "rgba(25,135,84,1)",
    line_fill: "rgba(25,135,84,0.2)",
};
const YELLOW: Palette = Palette {
    fill: "rgba(255,193,7,0.6)",
    stroke: "rgba(255,193,7,1)",
    line_fill: "rgba(255,193,7,0.2)",
};
const DARK: Palette = Palette {
    fill: "rgba(33,37,41,0.6)",
    stroke: "rgba(33,37,41,1)",
    line_fill: "rgba(33,37,41,0.2)",
};
const ORANGE: Palette = Palette {
    fill: "rgba(253,126,20,0.6)",
    stroke: "rgba(253,126,20,1)",
    line_fill: "rgba(253,126,20,0.2)",
};
const GRAY: Palette = Palette {
    fill: "rgba(108,117,125,0.6)",
    stroke: "rgba(108,117,125,1)",
    line_fill: "rgba(108,117,125,0.2)",
};

fn bars(label: &str, data: &Series, palette: &Palette, tooltip: ValueFormat) -> Dataset {
    Dataset {
        kind: None,
        label: label.to_string(),
        data: data.clone(),
        background_color: palette.fill.to_string(),
        border_color: palette.stroke.to_string(),
        border_width: Some(1),
        tension: None,
        point_radius: None,
        y_axis_id: None,
        tooltip,
        unit: None,
    }
}

fn line(label: &str, data: &Series, palette: &Palette, tooltip: ValueFormat) -> Dataset {
    Dataset {
        kind: Some(ChartKind::Line),
        label: label.to_string(),
        data: data.clone(),
        background_color: palette.line_fill.to_string(),
        border_color: palette.stroke.to_string(),
        border_width: None,
        tension: Some(0.25),
        point_radius: Some(3),
        y_axis_id: None,
        tooltip,
        unit: None,
    }
}

impl Dataset {
    fn on_axis(mut self, axis_id: &str) -> Self {
        self.y_axis_id = Some(axis_id.to_string());
        self
    }

    fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }
}

fn axis(title: &str, ticks: ValueFormat) -> Axis {
    Axis {
        position: None,
        title: AxisTitle {
            display: true,
            text: title.to_string(),
        },
        begin_at_zero: true,
        suggested_max: None,
        grid: None,
        ticks,
    }
}

impl Axis {
    fn at(mut self, position: &str) -> Self {
        self.position = Some(position.to_string());
        self
    }

    /// Right-hand axis whose grid lines stay off the plot area
    fn secondary(self) -> Self {
        let mut axis = self.at("right");
        axis.grid = Some(Grid {
            draw_on_chart_area: false,
        });
        axis
    }
}

fn options(scales: Vec<(&str, Axis)>, combined: bool) -> ChartOptions {
    ChartOptions {
        responsive: true,
        interaction: combined.then(|| Interaction {
            mode: "index".to_string(),
            intersect: false,
        }),
        scales: scales
            .into_iter()
            .map(|(id, axis)| (id.to_string(), axis))
            .collect(),
        plugins: Plugins {
            legend: Legend {
                position: "bottom".to_string(),
            },
        },
    }
}

/// Total vs paid cost bars with the paid percentage as a line
pub fn costs_chart(aggregate: &MonthlyAggregate, labels: &[String], locale: Locale) -> ChartSpec {
    let m = locale.messages();
    let mut percent_axis = axis("%", ValueFormat::Percent).secondary();
    percent_axis.suggested_max = Some(100.0);

    ChartSpec {
        slot: ChartSlot::Costs,
        locale,
        kind: ChartKind::Bar,
        data: ChartData {
            labels: labels.to_vec(),
            datasets: vec![
                bars(m.label_total_cost, &aggregate.custos.total, &BLUE, ValueFormat::Currency)
                    .on_axis("y"),
                bars(m.label_paid_cost, &aggregate.custos.pagas, &GREEN, ValueFormat::Currency)
                    .on_axis("y"),
                line(
                    m.label_percent_paid,
                    &aggregate.custos.percentual,
                    &YELLOW,
                    ValueFormat::Percent,
                )
                .on_axis("yPerc"),
            ],
        },
        options: options(
            vec![
                ("y", axis(m.currency_symbol, ValueFormat::Currency).at("left")),
                ("yPerc", percent_axis),
            ],
            true,
        ),
    }
}

/// Monthly kWh bars with kWh/100 km as a line
pub fn consumption_chart(
    aggregate: &MonthlyAggregate,
    labels: &[String],
    locale: Locale,
) -> ChartSpec {
    let m = locale.messages();
    ChartSpec {
        slot: ChartSlot::Consumption,
        locale,
        kind: ChartKind::Bar,
        data: ChartData {
            labels: labels.to_vec(),
            datasets: vec![
                bars(m.label_kwh_in_month, &aggregate.consumo, &YELLOW, ValueFormat::Number)
                    .on_axis("y")
                    .with_unit("kWh"),
                line(
                    m.label_kwh_per_100km,
                    &aggregate.consumo_por_100km,
                    &BLUE,
                    ValueFormat::Number,
                )
                .on_axis("y2")
                .with_unit(m.label_kwh_per_100km),
            ],
        },
        options: options(
            vec![
                ("y", axis("kWh", ValueFormat::Number).at("left")),
                ("y2", axis(m.label_kwh_per_100km, ValueFormat::Number).secondary()),
            ],
            true,
        ),
    }
}

pub fn distance_chart(aggregate: &MonthlyAggregate, labels: &[String], locale: Locale) -> ChartSpec {
    let m = locale.messages();
    ChartSpec {
        slot: ChartSlot::Distance,
        locale,
        kind: ChartKind::Bar,
        data: ChartData {
            labels: labels.to_vec(),
            datasets: vec![
                bars(m.label_km_in_month, &aggregate.km, &DARK, ValueFormat::Number)
                    .with_unit(m.label_km),
            ],
        },
        options: options(vec![("y", axis(m.label_km, ValueFormat::Number))], false),
    }
}

pub fn savings_chart(aggregate: &MonthlyAggregate, labels: &[String], locale: Locale) -> ChartSpec {
    let m = locale.messages();
    ChartSpec {
        slot: ChartSlot::Savings,
        locale,
        kind: ChartKind::Bar,
        data: ChartData {
            labels: labels.to_vec(),
            datasets: vec![
                bars(m.label_total_savings, &aggregate.economia.total, &ORANGE, ValueFormat::Currency),
                bars(m.label_paid_savings, &aggregate.economia.pagas, &GRAY, ValueFormat::Currency),
            ],
        },
        options: options(
            vec![("y", axis(m.currency_symbol, ValueFormat::Currency))],
            false,
        ),
    }
}

/// All four charts, in slot order, with month keys relabelled `MM/YYYY`
pub fn build_all(aggregate: &MonthlyAggregate, locale: Locale) -> Vec<ChartSpec> {
    let labels: Vec<String> = aggregate
        .labels
        .iter()
        .map(|key| format::month_label(key))
        .collect();

    vec![
        costs_chart(aggregate, &labels, locale),
        consumption_chart(aggregate, &labels, locale),
        distance_chart(aggregate, &labels, locale),
        savings_chart(aggregate, &labels, locale),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CostSeries, SavingsSeries};
    use serde_json::json;

    fn aggregate() -> MonthlyAggregate {
        MonthlyAggregate {
            labels: vec!["2024-01".to_string(), "2024-02".to_string()],
            custos: CostSeries {
                total: vec![Some(1234.5), Some(80.0)],
                pagas: vec![Some(1000.0), None],
                percentual: vec![Some(81.0), Some(0.0)],
            },
            consumo: vec![Some(310.25), Some(95.0)],
            consumo_por_100km: vec![Some(14.567), None],
            km: vec![Some(2130.0), Some(640.0)],
            economia: SavingsSeries {
                total: vec![Some(450.0), Some(120.0)],
                pagas: vec![Some(300.0), Some(0.0)],
            },
        }
    }

    #[test]
    fn test_labels_become_month_year() {
        let charts = build_all(&aggregate(), Locale::PtBr);
        assert_eq!(charts.len(), 4);
        for chart in &charts {
            assert_eq!(chart.data.labels, vec!["01/2024", "02/2024"]);
        }
        let slots: Vec<ChartSlot> = charts.iter().map(|c| c.slot).collect();
        assert_eq!(slots, ChartSlot::ALL.to_vec());
    }

    #[test]
    fn test_costs_chart_json() {
        let chart = costs_chart(&aggregate(), &["01/2024".to_string()], Locale::PtBr);
        let value = chart.to_json();

        assert_eq!(value["type"], "bar");
        assert_eq!(value["options"]["responsive"], true);
        assert_eq!(
            value["options"]["interaction"],
            json!({"mode": "index", "intersect": false})
        );
        assert_eq!(value["options"]["plugins"]["legend"]["position"], "bottom");

        let datasets = value["data"]["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 3);
        assert_eq!(datasets[0]["yAxisID"], "y");
        assert_eq!(datasets[0]["backgroundColor"], "rgba(13,110,253,0.6)");
        assert_eq!(datasets[0]["borderWidth"], 1);
        assert_eq!(datasets[1]["data"], json!([1000.0, null]));
        assert_eq!(datasets[2]["type"], "line");
        assert_eq!(datasets[2]["yAxisID"], "yPerc");
        assert_eq!(datasets[2]["tension"], 0.25);
        assert_eq!(datasets[2]["pointRadius"], 3);

        let perc = &value["options"]["scales"]["yPerc"];
        assert_eq!(perc["position"], "right");
        assert_eq!(perc["suggestedMax"], 100.0);
        assert_eq!(perc["grid"]["drawOnChartArea"], false);
        assert_eq!(perc["beginAtZero"], true);
        assert!(value["options"]["scales"]["y"].get("ticks").is_none());
    }

    #[test]
    fn test_single_series_charts_have_no_interaction() {
        let charts = build_all(&aggregate(), Locale::PtBr);
        let km = charts[2].to_json();
        assert!(km["options"].get("interaction").is_none());
        assert!(km["options"]["scales"]["y"].get("position").is_none());
        assert!(km["data"]["datasets"][0].get("yAxisID").is_none());
        assert_eq!(km["data"]["datasets"][0]["backgroundColor"], "rgba(33,37,41,0.6)");

        let savings = charts[3].to_json();
        assert_eq!(savings["data"]["datasets"][1]["borderColor"], "rgba(108,117,125,1)");
    }

    #[test]
    fn test_tooltips() {
        let charts = build_all(&aggregate(), Locale::PtBr);

        assert_eq!(
            charts[0].tooltip_label(0, Some(1234.5)).unwrap(),
            "Custo total (R$): R$ 1.234,50"
        );
        assert_eq!(
            charts[0].tooltip_label(2, Some(81.5)).unwrap(),
            "% pago sobre o total: 81.5%"
        );
        assert_eq!(
            charts[1].tooltip_label(0, Some(310.25)).unwrap(),
            "kWh no mês: 310,25 kWh"
        );
        assert_eq!(
            charts[1].tooltip_label(1, Some(14.567)).unwrap(),
            "kWh/100 km: 14,57 kWh/100 km"
        );
        assert_eq!(
            charts[2].tooltip_label(0, Some(2130.0)).unwrap(),
            "Km rodados no mês: 2.130 km"
        );
        assert_eq!(
            charts[3].tooltip_label(1, None).unwrap(),
            "Economia em recargas pagas (R$): R$ 0,00"
        );
        assert!(charts[3].tooltip_label(5, Some(1.0)).is_none());
    }

    #[test]
    fn test_ticks() {
        let charts = build_all(&aggregate(), Locale::PtBr);
        assert_eq!(charts[0].tick_label("y", 1500.0).unwrap(), "R$ 1.500,00");
        assert_eq!(charts[0].tick_label("yPerc", 40.0).unwrap(), "40%");
        assert_eq!(charts[1].tick_label("y2", 12.5).unwrap(), "12,5");
        assert!(charts[2].tick_label("y2", 1.0).is_none());

        let en = build_all(&aggregate(), Locale::EnUs);
        assert_eq!(en[3].tick_label("y", 1500.0).unwrap(), "R$ 1,500.00");
    }
}
