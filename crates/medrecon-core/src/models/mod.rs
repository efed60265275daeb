//! Data models.

pub mod config;
pub mod discrepancy;
pub mod record;
