//! Zafra Core - Shared domain types for the Zafra storefront.
//!
//! This crate provides the types used across all Zafra components:
//! - `storefront` - JSON storefront service (catalog, cart, auth, dashboard)
//! - `cli` - Operator command-line tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! HTTP clients, no clocks. Anything time-dependent takes `now` as an
//! argument so it can be tested deterministically.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails and money formatting
//! - [`product`] - Catalog records, create/patch payloads and list filters
//! - [`cart`] - Cart line items and order-summary derivation
//! - [`session`] - Bearer tokens, claim decoding and the session gate
//! - [`account`] - Login and registration payload validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod cart;
pub mod product;
pub mod session;
pub mod types;

pub use account::{LoginCredentials, Registration, RegistrationError, Role, ValidRegistration};
pub use cart::{Cart, CartItem, OrderSummary, PricingPolicy};
pub use product::{NewProduct, Notes, PriceError, Product, ProductFilter, ProductPatch};
pub use session::{
    AuthSession, BearerToken, ClaimSet, Claims, InvalidToken, TokenValidity, UserProfile, check_token,
};
pub use types::*;
