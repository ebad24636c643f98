//! Shared types and configuration for Fixora.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Clock-time helpers for `HH:MM` working-hours fields
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
