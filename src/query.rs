//! List Query State
//!
//! Paging, sorting and filter state for the recharge list, and the query
//! strings built from it. The server does the actual paging, sorting and
//! filtering; this only tracks what to ask for.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed page size of the recharge list
pub const PAGE_SIZE: u32 = 20;

/// Sortable column keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Data,
    Kwh,
    Custo,
    Isento,
    Odometro,
    Local,
    Observacoes,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Data,
        SortKey::Kwh,
        SortKey::Custo,
        SortKey::Isento,
        SortKey::Odometro,
        SortKey::Local,
        SortKey::Observacoes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Data => "data",
            SortKey::Kwh => "kwh",
            SortKey::Custo => "custo",
            SortKey::Isento => "isento",
            SortKey::Odometro => "odometro",
            SortKey::Local => "local",
            SortKey::Observacoes => "observacoes",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown sort column: {}", s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

impl FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(format!("Unknown sort direction: {}. Use asc or desc", other)),
        }
    }
}

/// Fee-exemption filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsentoFilter {
    #[default]
    All,
    /// Only exempt recharges
    True,
    /// Only paid recharges
    False,
}

impl IsentoFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            IsentoFilter::All => "all",
            IsentoFilter::True => "true",
            IsentoFilter::False => "false",
        }
    }
}

impl FromStr for IsentoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(IsentoFilter::All),
            "true" | "sim" | "yes" => Ok(IsentoFilter::True),
            "false" | "nao" | "não" | "no" => Ok(IsentoFilter::False),
            other => Err(format!("Unknown exemption filter: {}", other)),
        }
    }
}

/// The five filter inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub local: String,
    pub observacoes: String,
    pub isento: IsentoFilter,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl Filters {
    /// Filter parameters in wire order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("local", self.local.clone()),
            ("observacoes", self.observacoes.clone()),
            ("isento", self.isento.as_str().to_string()),
            ("date_from", format_opt_date(self.date_from)),
            ("date_to", format_opt_date(self.date_to)),
        ]
    }
}

fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Client-side query state of the recharge list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryState {
    pub current_page: u32,
    pub sort_by: SortKey,
    pub sort_dir: SortDir,
    pub page_size: u32,
    pub filters: Filters,
}

impl Default for ListQueryState {
    fn default() -> Self {
        Self {
            current_page: 1,
            sort_by: SortKey::Data,
            sort_dir: SortDir::Asc,
            page_size: PAGE_SIZE,
            filters: Filters::default(),
        }
    }
}

impl ListQueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filters and go back to page 1
    pub fn apply_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.current_page = 1;
    }

    /// Reset every filter to its default and go back to page 1
    pub fn clear_filters(&mut self) {
        self.apply_filters(Filters::default());
    }

    /// Restrict the date range to `[today - 30 days, today]` and go back to page 1
    pub fn last_30_days(&mut self, today: NaiveDate) {
        self.filters.date_from = Some(today - Duration::days(30));
        self.filters.date_to = Some(today);
        self.current_page = 1;
    }

    /// Step back one page. Returns `false` (and changes nothing) on page 1.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one page. The server decides whether that page has rows.
    pub fn next_page(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    /// Flip direction on the active column, or switch to `key` ascending
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_by == key {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_by = key;
            self.sort_dir = SortDir::Asc;
        }
    }

    /// The nine list parameters, in wire order
    pub fn list_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.current_page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("sort_by", self.sort_by.as_str().to_string()),
            ("sort_dir", self.sort_dir.as_str().to_string()),
        ];
        params.extend(self.filters.params());
        params
    }

    /// The five export parameters; page and sort never travel with an export
    pub fn export_params(&self) -> Vec<(&'static str, String)> {
        self.filters.params()
    }

    pub fn list_query_string(&self) -> String {
        encode_query(&self.list_params())
    }

    pub fn export_query_string(&self) -> String {
        encode_query(&self.export_params())
    }
}

/// Percent-encode `key=value` pairs joined with `&`
pub fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
