//! Persistence layer for the MCP Registry Gateway analytics backend.
//!
//! This crate contains:
//! - Database connection management
//! - Idempotent provisioning of analytics database objects (extensions,
//!   indexes, materialized views)
//! - Entity definitions (query result row mappings)
//! - Repository implementations for the reporting operations

pub mod db;
pub mod entities;
pub mod metrics;
pub mod provisioning;
pub mod repositories;
