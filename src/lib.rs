//! # Recarga
//!
//! Client side of an EV recharge tracker: the manageable recharge list and
//! the monthly dashboard charts.
//!
//! ## Modules
//!
//! - [`controller`]: recharge list flows (load, filter, page, sort, edit, delete, export)
//! - [`dashboard`]: monthly charts renderer
//! - [`charts`]: Chart.js configurations for the four dashboard charts
//! - [`api`]: the consumed REST surface, behind the [`RechargeApi`] trait
//! - [`view`]: display seams implemented by the browser, the CLI and tests
//! - [`client`] (feature `native`): `reqwest` implementation of [`RechargeApi`]
//! - [`terminal`] (feature `native`): stdout views used by the `recarga` binary
//!
//! Everything outside `native` builds for `wasm32-unknown-unknown`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use recarga::*;
//!
//! # struct Stdout;
//! # impl ListView for Stdout {
//! #     fn show_table(&self, t: &RenderedTable) { println!("{}", t.pager.caption) }
//! #     fn show_filters(&self, _: &Filters) {}
//! #     fn rendered_row(&self, _: &RechargeId) -> Option<RenderedRow> { None }
//! #     fn open_edit(&self, _: &EditForm) {}
//! #     fn close_edit(&self) {}
//! #     fn open_delete_confirm(&self, _: &RechargeId) {}
//! #     fn close_delete_confirm(&self) {}
//! #     fn notify(&self, n: Notice) { eprintln!("{}", n.message) }
//! #     fn navigate(&self, _: &str) {}
//! # }
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api = HttpRechargeApi::new(&config.server)?;
//!     let endpoints = api.endpoints().clone();
//!
//!     let controller =
//!         RechargeListController::new(api, Stdout, endpoints, config.display.locale);
//!     controller.toggle_sort(SortKey::Data).await;
//!     controller.next_page().await;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod charts;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod locale;
pub mod model;
pub mod query;
pub mod summary;
pub mod table;
pub mod view;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod terminal;

// Re-export top-level types for convenience
pub use api::{Endpoints, RechargeApi};
pub use charts::{ChartSlot, ChartSpec, ValueFormat};
pub use controller::RechargeListController;
pub use dashboard::DashboardChartsRenderer;
pub use error::{ApiError, ApiResult, FormError};
pub use locale::{Locale, Messages};
pub use model::{
    MonthlyAggregate, RechargeId, RechargePage, RechargeRecord, RechargeUpdate, RecordDate,
};
pub use query::{Filters, IsentoFilter, ListQueryState, SortDir, SortKey, PAGE_SIZE};
pub use summary::DashboardSummary;
pub use table::{EditForm, Pager, RenderedRow, RenderedTable, TableBody};
pub use view::{ChartSurface, ListView, Notice, NoticeLevel};

#[cfg(feature = "native")]
pub use client::{extract_csrf_token, HttpRechargeApi};
#[cfg(feature = "native")]
pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};
#[cfg(feature = "native")]
pub use terminal::{OutputFormat, TerminalListView, TerminalSurface};
