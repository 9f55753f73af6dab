//! Shared types, errors, and configuration for Costline.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, TenancyConfig, VarianceConfig};
pub use error::{AppError, AppResult, ErrorClass};
