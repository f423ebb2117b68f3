//! API Module
//!
//! Browser implementation of the recharge API.

pub mod client;

pub use client::GlooRechargeApi;
