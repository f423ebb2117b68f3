//! Recharge API Seam
//!
//! The REST surface both controllers talk to, and the paths it lives under.
//! Implemented over `reqwest` for the CLI and over `gloo-net` in the browser.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::model::{MonthlyAggregate, RechargeId, RechargePage, RechargeUpdate};
use crate::query::ListQueryState;

pub const LIST_PATH: &str = "/api/manage_recharges";
pub const EXPORT_PATH: &str = "/export_recharges";
pub const MONTHLY_PATH: &str = "/api/recharges_monthly";
/// Page whose `<meta name="csrf-token">` carries the anti-forgery token
pub const MANAGE_PAGE_PATH: &str = "/manage_recharges";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Consumed recharge endpoints.
///
/// Futures are not required to be `Send`: the browser client runs on the
/// single UI thread.
#[async_trait(?Send)]
pub trait RechargeApi {
    /// Read one page of the list
    async fn list(&self, query: &ListQueryState) -> ApiResult<RechargePage>;

    /// Replace the editable fields of a recharge
    async fn update(&self, id: &RechargeId, update: &RechargeUpdate) -> ApiResult<()>;

    async fn delete(&self, id: &RechargeId) -> ApiResult<()>;

    /// Read the monthly aggregation
    async fn monthly(&self) -> ApiResult<MonthlyAggregate>;
}

/// URL builder for a server root. An empty base yields same-origin
/// relative URLs, which is what the browser build uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn list(&self, query: &ListQueryState) -> String {
        format!("{}{}?{}", self.base, LIST_PATH, query.list_query_string())
    }

    pub fn recharge(&self, id: &RechargeId) -> String {
        format!(
            "{}{}/{}",
            self.base,
            LIST_PATH,
            urlencoding::encode(id.as_str())
        )
    }

    pub fn export(&self, query: &ListQueryState) -> String {
        format!("{}{}?{}", self.base, EXPORT_PATH, query.export_query_string())
    }

    pub fn monthly(&self) -> String {
        format!("{}{}", self.base, MONTHLY_PATH)
    }

    pub fn manage_page(&self) -> String {
        format!("{}{}", self.base, MANAGE_PAGE_PATH)
    }
}
