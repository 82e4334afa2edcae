//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (only when `ZAFRA_CORS_ORIGIN` is set)
//! 5. Session layer (tower-sessions with an evicting in-memory store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{AuthRejection, RequireSession, SessionContext};
pub use request_id::{RequestId, request_id_middleware};
pub use session::{InMemorySessionStore, create_session_layer};
