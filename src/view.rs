//! Display Seams
//!
//! What the controllers need from whatever displays them: the DOM in the
//! browser build, stdout in the CLI, recording doubles in tests. All methods
//! take `&self`; implementations keep their own interior mutability.

use serde::Serialize;

use crate::charts::{ChartSlot, ChartSpec};
use crate::model::RechargeId;
use crate::query::Filters;
use crate::summary::DashboardSummary;
use crate::table::{EditForm, RenderedRow, RenderedTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Danger,
}

/// Transient, dismissible notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Danger,
            message: message.into(),
        }
    }
}

/// Recharge list page
pub trait ListView {
    /// Replace the table body, caption and pager buttons
    fn show_table(&self, table: &RenderedTable);

    /// Reflect filter values back into the filter inputs
    fn show_filters(&self, filters: &Filters);

    /// Currently rendered row for `id`, as displayed
    fn rendered_row(&self, id: &RechargeId) -> Option<RenderedRow>;

    fn open_edit(&self, form: &EditForm);

    fn close_edit(&self);

    fn open_delete_confirm(&self, id: &RechargeId);

    fn close_delete_confirm(&self);

    fn notify(&self, notice: Notice);

    /// Full-page navigation to `url`
    fn navigate(&self, url: &str);
}

/// Dashboard chart placeholders
pub trait ChartSurface {
    fn render_chart(&self, spec: &ChartSpec);

    /// Replace the chart in `slot` with a text message
    fn show_message(&self, slot: ChartSlot, message: &str);

    fn show_summary(&self, summary: &DashboardSummary);
}
