//! Domain layer for the MCP Registry Gateway analytics backend.
//!
//! This crate contains:
//! - Reporting models returned by the HTTP API
//! - Pure derivation logic (performance scoring, latency tiers, pool
//!   utilization)
//! - Retention policy types

pub mod models;
