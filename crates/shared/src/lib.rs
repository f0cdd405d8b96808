//! Shared utilities for the MCP Registry Gateway analytics backend.
//!
//! This crate provides common functionality used across the other crates:
//! - JSON field validation for JSONB-backed columns
//! - Request parameter validation helpers

pub mod json_fields;
pub mod validation;
