//! Terminal Views
//!
//! [`ListView`] and [`ChartSurface`] over stdout/stderr for the `recarga`
//! binary. Modals become stored state the command reads back.

use serde::Serialize;
use std::cell::{Cell, RefCell};

use crate::charts::{ChartSlot, ChartSpec};
use crate::locale::Locale;
use crate::model::RechargeId;
use crate::query::Filters;
use crate::summary::DashboardSummary;
use crate::table::{EditForm, RenderedRow, RenderedTable, TableBody};
use crate::view::{ChartSurface, ListView, Notice, NoticeLevel};

/// Output format of the CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::warn!(error = %e, "Failed to serialize output"),
    }
}

/// Render a table with left-aligned columns sized to their widest cell
pub fn format_columns(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        out.push('\n');
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

pub struct TerminalListView {
    format: OutputFormat,
    locale: Locale,
    table: RefCell<Option<RenderedTable>>,
    edit: RefCell<Option<EditForm>>,
    delete_target: RefCell<Option<RechargeId>>,
    navigation: RefCell<Option<String>>,
    failed: Cell<bool>,
}

impl TerminalListView {
    pub fn new(format: OutputFormat, locale: Locale) -> Self {
        Self {
            format,
            locale,
            table: RefCell::new(None),
            edit: RefCell::new(None),
            delete_target: RefCell::new(None),
            navigation: RefCell::new(None),
            failed: Cell::new(false),
        }
    }

    /// Whether a failure notification was shown
    pub fn failed(&self) -> bool {
        self.failed.get()
    }

    /// Form of the open edit modal
    pub fn edit_form(&self) -> Option<EditForm> {
        self.edit.borrow().clone()
    }

    /// Recharge the open delete confirmation is for
    pub fn delete_target(&self) -> Option<RechargeId> {
        self.delete_target.borrow().clone()
    }

    /// Last navigation target
    pub fn navigation(&self) -> Option<String> {
        self.navigation.borrow().clone()
    }

    pub fn render_table(&self, table: &RenderedTable) -> String {
        let m = self.locale.messages();
        let mut headers = vec!["ID"];
        headers.extend(m.columns);

        let body = match &table.body {
            TableBody::Rows(rows) => format_columns(
                &headers,
                &rows
                    .iter()
                    .map(|row| {
                        std::iter::once(row.id.to_string())
                            .chain(row.cells.iter().cloned())
                            .collect()
                    })
                    .collect::<Vec<_>>(),
            ),
            TableBody::Placeholder { message, .. } => message.clone(),
        };

        format!("{}\n\n{}", body, table.pager.caption)
    }
}

impl ListView for TerminalListView {
    fn show_table(&self, table: &RenderedTable) {
        match self.format {
            OutputFormat::Table => println!("{}", self.render_table(table)),
            OutputFormat::Json => print_json(table),
        }
        self.table.replace(Some(table.clone()));
    }

    fn show_filters(&self, filters: &Filters) {
        tracing::debug!(?filters, "Filters updated");
    }

    fn rendered_row(&self, id: &RechargeId) -> Option<RenderedRow> {
        self.table
            .borrow()
            .as_ref()
            .and_then(|t| t.body.find(id).cloned())
    }

    fn open_edit(&self, form: &EditForm) {
        self.edit.replace(Some(form.clone()));
    }

    fn close_edit(&self) {
        self.edit.replace(None);
    }

    fn open_delete_confirm(&self, id: &RechargeId) {
        self.delete_target.replace(Some(id.clone()));
    }

    fn close_delete_confirm(&self) {
        self.delete_target.replace(None);
    }

    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => eprintln!("{}", notice.message),
            NoticeLevel::Danger => {
                self.failed.set(true);
                eprintln!("Error: {}", notice.message);
            }
        }
    }

    fn navigate(&self, url: &str) {
        self.navigation.replace(Some(url.to_string()));
    }
}

pub struct TerminalSurface {
    format: OutputFormat,
    locale: Locale,
}

#[derive(Serialize)]
struct ChartOutput<'a> {
    canvas: &'static str,
    config: &'a ChartSpec,
}

impl TerminalSurface {
    pub fn new(format: OutputFormat, locale: Locale) -> Self {
        Self { format, locale }
    }

    /// One line per month with every dataset's tooltip text
    pub fn render_chart_table(&self, spec: &ChartSpec) -> String {
        let mut headers = vec![""];
        headers.extend(spec.data.datasets.iter().map(|d| d.label.as_str()));

        let rows: Vec<Vec<String>> = spec
            .data
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut row = vec![label.clone()];
                for (d, dataset) in spec.data.datasets.iter().enumerate() {
                    let value = dataset.data.get(i).copied().flatten();
                    let text = spec.tooltip_label(d, value).unwrap_or_default();
                    let shown = text
                        .strip_prefix(&format!("{}: ", dataset.label))
                        .unwrap_or(&text)
                        .to_string();
                    row.push(shown);
                }
                row
            })
            .collect();

        format!(
            "{}\n{}",
            spec.slot.title(self.locale),
            format_columns(&headers, &rows)
        )
    }
}

impl ChartSurface for TerminalSurface {
    fn render_chart(&self, spec: &ChartSpec) {
        match self.format {
            OutputFormat::Table => println!("{}\n", self.render_chart_table(spec)),
            OutputFormat::Json => print_json(&ChartOutput {
                canvas: spec.slot.canvas_id(),
                config: spec,
            }),
        }
    }

    fn show_message(&self, slot: ChartSlot, message: &str) {
        println!("{}: {}", slot.title(self.locale), message);
    }

    fn show_summary(&self, summary: &DashboardSummary) {
        match self.format {
            OutputFormat::Table => {
                for (label, value) in summary.entries(self.locale) {
                    println!("{:<30} {}", label, value);
                }
            }
            OutputFormat::Json => print_json(summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::build_all;
    use crate::model::{CostSeries, MonthlyAggregate, RechargePage, RechargeRecord};
    use chrono::NaiveDate;

    #[test]
    fn test_format_columns() {
        let out = format_columns(
            &["Local", "kWh"],
            &[
                vec!["Casa".to_string(), "12".to_string()],
                vec!["Eletroposto".to_string(), "7.5".to_string()],
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Local        kWh");
        assert_eq!(lines[1], "-".repeat(16));
        assert_eq!(lines[2], "Casa         12");
        assert_eq!(lines[3], "Eletroposto  7.5");
    }

    #[test]
    fn test_table_and_placeholder() {
        let view = TerminalListView::new(OutputFormat::Table, Locale::PtBr);
        let record = RechargeRecord {
            id: RechargeId::new("4"),
            data: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().into(),
            kwh: 10.0,
            custo: 15.0,
            isento: true,
            odometro: 100.0,
            local: None,
            observacoes: None,
        };
        let page = RechargePage {
            items: vec![record],
            total: 1,
            has_prev: false,
            has_next: false,
        };
        let text = view.render_table(&RenderedTable::render(&page, 1, 20, Locale::PtBr));
        assert!(text.starts_with("ID  Data"));
        assert!(text.contains("R$ 15.00"));
        assert!(text.ends_with("Exibindo 1–1 de 1"));

        let empty = RechargePage {
            items: vec![],
            total: 0,
            has_prev: false,
            has_next: false,
        };
        let text = view.render_table(&RenderedTable::render(&empty, 1, 20, Locale::PtBr));
        assert!(text.starts_with("Nenhuma recarga encontrada."));
    }

    #[test]
    fn test_danger_notice_marks_failure() {
        let view = TerminalListView::new(OutputFormat::Table, Locale::PtBr);
        view.notify(Notice::success("ok"));
        assert!(!view.failed());
        view.notify(Notice::danger("boom"));
        assert!(view.failed());
    }

    #[test]
    fn test_chart_table_uses_tooltip_values() {
        let aggregate = MonthlyAggregate {
            labels: vec!["2024-05".to_string()],
            custos: CostSeries {
                total: vec![Some(1500.0)],
                pagas: vec![Some(750.0)],
                percentual: vec![Some(50.0)],
            },
            ..MonthlyAggregate::default()
        };
        let charts = build_all(&aggregate, Locale::PtBr);
        let surface = TerminalSurface::new(OutputFormat::Table, Locale::PtBr);

        let text = surface.render_chart_table(&charts[0]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Custos por mês");
        assert!(lines[3].starts_with("05/2024"));
        assert!(lines[3].contains("R$ 1.500,00"));
        assert!(lines[3].ends_with("50%"));
    }
}
