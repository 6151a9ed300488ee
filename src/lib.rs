//! Judicial recovery panel: load case records, filter them by court, state
//! and data-quality flags, and summarize what is left.

pub mod config;
pub mod data;
pub mod format;
pub mod session;
