//! State Management
//!
//! Global reactive state shared by both pages.

pub mod global;
