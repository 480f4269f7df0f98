//! Shared types, errors, and configuration for the CRM backend.
//!
//! This crate provides common types used across all other crates:
//! - The resource catalogue and application-wide error taxonomy
//! - Pagination arithmetic and the list envelope
//! - Session token claims and the JWT service
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod resource;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use resource::Resource;
