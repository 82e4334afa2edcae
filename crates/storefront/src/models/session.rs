//! Session-related types.

/// Session keys for visitor state.
pub mod keys {
    /// Key for the signed-in [`AuthSession`](zafra_core::AuthSession).
    pub const AUTH: &str = "auth";

    /// Key for the visitor's [`Cart`](zafra_core::Cart).
    pub const CART: &str = "cart";
}
