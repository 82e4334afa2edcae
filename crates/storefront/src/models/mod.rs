//! Storefront-local models.
//!
//! Domain records live in `zafra-core`; this module only holds what is
//! specific to how the storefront keeps visitor state.

pub mod session;

pub use session::keys as session_keys;
