//! HTTP front end for the player wallet ledger.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
