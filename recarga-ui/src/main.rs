//! Recarga Web
//!
//! Browser front-end of the recharge tracker built with Leptos (WASM).
//!
//! # Features
//!
//! - Recharge list with filters, sorting, paging, edit, delete and CSV export
//! - Monthly dashboard charts (Chart.js) and totals
//!
//! # Architecture
//!
//! Client-side rendered Leptos application. The flows themselves live in the
//! `recarga` crate; this crate implements its display seams with signals and
//! its API seam with `gloo-net`.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
