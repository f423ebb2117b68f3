//! Table Rendering Model
//!
//! Turns a [`RechargePage`] into the rows, caption and pager state the list
//! view displays, and reads a rendered row back into the edit form.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::FormError;
use crate::format;
use crate::locale::Locale;
use crate::model::{RechargeId, RechargePage, RechargeRecord, RechargeUpdate};
use crate::query::SortKey;

/// Number of table columns, actions column included
pub const COLUMN_COUNT: usize = 8;

/// One rendered recharge row.
///
/// `cells` holds the visible text of the seven data columns in display
/// order; `notes_title` is the hover text of the notes cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub id: RechargeId,
    pub cells: [String; 7],
    pub notes_title: String,
}

impl RenderedRow {
    pub fn render(record: &RechargeRecord, locale: Locale) -> Self {
        let messages = locale.messages();
        let notes = record.observacoes.clone().unwrap_or_default();
        Self {
            id: record.id.clone(),
            cells: [
                format::format_date(&record.data),
                format::format_plain(record.kwh),
                format::format_currency_fixed(messages.currency_symbol, record.custo),
                messages.yes_no(record.isento).to_string(),
                format::format_odometer(record.odometro),
                record.local.clone().unwrap_or_default(),
                format::truncate_notes(&notes),
            ],
            notes_title: notes,
        }
    }

    pub fn cell(&self, column: SortKey) -> &str {
        let idx = match column {
            SortKey::Data => 0,
            SortKey::Kwh => 1,
            SortKey::Custo => 2,
            SortKey::Isento => 3,
            SortKey::Odometro => 4,
            SortKey::Local => 5,
            SortKey::Observacoes => 6,
        };
        &self.cells[idx]
    }
}

/// Table body contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableBody {
    Rows(Vec<RenderedRow>),
    /// Single row spanning `colspan` columns
    Placeholder { message: String, colspan: usize },
}

impl TableBody {
    pub fn row_count(&self) -> usize {
        match self {
            TableBody::Rows(rows) => rows.len(),
            TableBody::Placeholder { .. } => 1,
        }
    }

    pub fn find(&self, id: &RechargeId) -> Option<&RenderedRow> {
        match self {
            TableBody::Rows(rows) => rows.iter().find(|r| &r.id == id),
            TableBody::Placeholder { .. } => None,
        }
    }
}

/// Pagination caption and button state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub caption: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Everything the list view shows for one loaded page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTable {
    pub body: TableBody,
    pub pager: Pager,
}

impl RenderedTable {
    pub fn render(page: &RechargePage, current_page: u32, page_size: u32, locale: Locale) -> Self {
        let messages = locale.messages();

        let body = if page.items.is_empty() {
            TableBody::Placeholder {
                message: messages.no_records.to_string(),
                colspan: COLUMN_COUNT,
            }
        } else {
            TableBody::Rows(
                page.items
                    .iter()
                    .map(|r| RenderedRow::render(r, locale))
                    .collect(),
            )
        };

        let (from, to) = format::page_bounds(current_page, page_size, page.total);
        let pager = Pager {
            caption: messages.showing(from, to, page.total),
            prev_enabled: page.has_prev,
            next_enabled: page.has_next,
        };

        Self { body, pager }
    }
}

/// Edit modal contents; every field is kept as the text the input shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditForm {
    pub id: RechargeId,
    pub data: String,
    pub kwh: String,
    pub custo: String,
    pub isento: bool,
    pub odometro: String,
    pub local: String,
    pub observacoes: String,
}

impl EditForm {
    /// Fill the form from the text of a rendered row
    pub fn from_row(row: &RenderedRow, locale: Locale) -> Self {
        let messages = locale.messages();
        let custo = row.cell(SortKey::Custo);
        let prefix = format!("{} ", messages.currency_symbol);
        Self {
            id: row.id.clone(),
            data: row.cell(SortKey::Data).to_string(),
            kwh: row.cell(SortKey::Kwh).to_string(),
            custo: custo.strip_prefix(&prefix).unwrap_or(custo).to_string(),
            isento: row.cell(SortKey::Isento) == messages.yes,
            odometro: row.cell(SortKey::Odometro).to_string(),
            local: row.cell(SortKey::Local).to_string(),
            observacoes: row.notes_title.clone(),
        }
    }

    /// Parse the form into the full-record update payload
    pub fn to_update(&self) -> Result<RechargeUpdate, FormError> {
        let data = NaiveDate::parse_from_str(self.data.trim(), "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(self.data.clone()))?;

        Ok(RechargeUpdate {
            data,
            kwh: parse_number("kwh", &self.kwh)?,
            custo: parse_number("custo", &self.custo)?,
            odometro: parse_number("odometro", &self.odometro)?,
            isento: self.isento,
            local: self.local.clone(),
            observacoes: self.observacoes.clone(),
        })
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FormError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
