//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod chart;
pub mod loading;
pub mod nav;
pub mod summary_cards;
pub mod toast;

pub use chart::ChartCanvas;
pub use loading::Loading;
pub use nav::Nav;
pub use summary_cards::SummaryCards;
pub use toast::Toast;
