//! Core types for Zafra.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{MAX_PRICE, discount_percent, format_usd, is_valid_price};
