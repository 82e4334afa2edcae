//! Business logic services for storefront.
//!
//! # Services
//!
//! - `admin_api` - HTTP client for the external admin backend
//! - `dashboard` - Concurrent aggregation of admin collections

pub mod admin_api;
pub mod dashboard;
