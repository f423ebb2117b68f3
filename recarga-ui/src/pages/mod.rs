//! Page Components
//!
//! One component per route.

pub mod dashboard;
pub mod manage_recharges;

pub use dashboard::Dashboard;
pub use manage_recharges::ManageRecharges;
