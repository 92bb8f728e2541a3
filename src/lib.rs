//! Single-user equity portfolio: open positions, buy/sell application,
//! allocation recomputation and persistence.

pub mod api;
pub mod config;
pub mod error;
pub mod persistence;
pub mod portfolio;
pub mod quote;
pub mod rounding;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod types;
