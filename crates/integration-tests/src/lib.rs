//! Integration tests for the Zafra storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zafra-integration-tests
//! ```
//!
//! Everything runs in-process: the storefront router is driven with
//! `tower::ServiceExt::oneshot`, and the admin backend is a small axum app
//! bound to `127.0.0.1:0` for the duration of a test.
//!
//! # Test Categories
//!
//! - `catalog` - Product CRUD over HTTP
//! - `cart` - Session-backed cart and order summary
//! - `auth` - Login, registration, logout and the session gate
//! - `dashboard` - Aggregation, partial failure and demo fallback

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use zafra_storefront::config::StorefrontConfig;
use zafra_storefront::state::AppState;

/// Account the fake backend accepts.
pub const ADMIN_EMAIL: &str = "amira@zafra.com";
/// Password for [`ADMIN_EMAIL`].
pub const ADMIN_PASSWORD: &str = "Jasmine2024";
/// Account the fake backend signs in with an already-expired token.
pub const STALE_EMAIL: &str = "stale@zafra.com";
/// Account the fake backend signs in without issuing a token.
pub const TOKENLESS_EMAIL: &str = "tokenless@zafra.com";
/// Email the fake backend refuses to register twice.
pub const TAKEN_EMAIL: &str = "taken@zafra.com";

/// Structured token with `{"sub":"42","exp":4102444800}` (year 2100).
pub const VALID_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiI0MiIsImV4cCI6NDEwMjQ0NDgwMH0.c2ln";
/// Structured token with `{"exp":1000}`.
pub const EXPIRED_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjEwMDB9.c2ln";

/// A base URL nothing listens on.
#[must_use]
pub fn unreachable_admin_url() -> Url {
    Url::parse("http://127.0.0.1:9/admin").expect("valid URL")
}

/// Storefront router talking to the admin backend at `admin_api_url`.
#[must_use]
pub fn storefront(admin_api_url: Url) -> Router {
    let config = StorefrontConfig {
        admin_api_url,
        ..StorefrontConfig::default()
    };
    let state = AppState::new(config).expect("Failed to build application state");
    zafra_storefront::app(state)
}

// =============================================================================
// Test client
// =============================================================================

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body, a JSON string for non-JSON text, or `null` when empty.
    pub body: Value,
}

impl TestResponse {
    /// The `location` header, for redirects.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Drives a router in-process, carrying the session cookie between calls
/// like a browser would.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
    accept_json: bool,
}

impl TestClient {
    /// A client that asks for JSON on every request.
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self {
            app,
            cookie: None,
            accept_json: true,
        }
    }

    /// A client that sends no `Accept` header, like a plain browser link.
    #[must_use]
    pub const fn browser(app: Router) -> Self {
        Self {
            app,
            cookie: None,
            accept_json: false,
        }
    }

    /// Whether a session cookie is currently held.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, body: Value) -> TestResponse {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&mut self, path: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn patch(&mut self, path: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&mut self, path: &str) -> TestResponse {
        self.send(Method::DELETE, path, None).await
    }

    /// Send a raw body with a JSON content type.
    pub async fn send_raw(&mut self, method: Method, path: &str, body: &str) -> TestResponse {
        let request = self
            .request(method, path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("Failed to build request");
        self.dispatch(request).await
    }

    /// Send a request, with `body` as JSON when given.
    pub async fn send(&mut self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let builder = self.request(method, path);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");
        self.dispatch(request).await
    }

    fn request(&self, method: Method, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if self.accept_json {
            builder = builder.header(header::ACCEPT, "application/json");
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn dispatch(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        self.store_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    fn store_cookie(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else {
                continue;
            };
            if value.contains("Max-Age=0") {
                self.cookie = None;
            } else {
                self.cookie = Some(pair.trim().to_owned());
            }
        }
    }
}

// =============================================================================
// Fake admin backend
// =============================================================================

/// Collections the fake backend should fail with a 500.
#[derive(Debug, Clone, Default)]
struct Failing(Arc<HashSet<&'static str>>);

impl Failing {
    fn check(&self, name: &str) -> Option<Response> {
        self.0.contains(name).then(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{name} table is locked") })),
            )
                .into_response()
        })
    }
}

/// Start a fake admin backend on `127.0.0.1:0` and return its base URL.
///
/// Collections named in `failing` (`users`, `products`, `orders`,
/// `reviews`) answer 500.
pub async fn spawn_admin_backend(failing: &[&'static str]) -> Url {
    let failing = Failing(Arc::new(failing.iter().copied().collect()));
    let admin = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/users", get(users))
        .route("/products", get(products))
        .route("/orders", get(orders))
        .route("/reviews", get(reviews))
        .with_state(failing);
    let app = Router::new().nest("/admin", admin);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("Listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Url::parse(&format!("http://{addr}/admin")).expect("valid URL")
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    match email {
        ADMIN_EMAIL if password == ADMIN_PASSWORD => Json(json!({
            "token": VALID_TOKEN,
            "user": { "id": 42, "name": "Amira Haddad", "email": ADMIN_EMAIL, "role": "admin" },
        }))
        .into_response(),
        STALE_EMAIL => Json(json!({ "access_token": EXPIRED_TOKEN })).into_response(),
        TOKENLESS_EMAIL => Json(json!({ "user": { "email": TOKENLESS_EMAIL } })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response(),
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body.get("confirmPassword").is_some() || body.get("confirm_password").is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Unexpected field: confirmPassword" })),
        )
            .into_response();
    }
    if body["email"] == TAKEN_EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "User already exists" })),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "id": 7 })),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {VALID_TOKEN}");
    let given = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if given == Some(expected.as_str()) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Missing or invalid token" })),
        )
            .into_response())
    }
}

fn collection(name: &str, failing: &Failing, headers: &HeaderMap, records: Value) -> Response {
    if let Err(response) = authorized(headers) {
        return response;
    }
    failing
        .check(name)
        .unwrap_or_else(|| Json(records).into_response())
}

async fn users(State(failing): State<Failing>, headers: HeaderMap) -> Response {
    collection(
        "users",
        &failing,
        &headers,
        json!([
            { "id": 1, "name": "Amira Haddad", "email": ADMIN_EMAIL, "created_at": "2024-01-01" },
            { "id": 2, "name": "Omar Saleh", "email": "omar@zafra.com", "created_at": "2024-01-03" },
        ]),
    )
}

async fn products(State(failing): State<Failing>, headers: HeaderMap) -> Response {
    collection(
        "products",
        &failing,
        &headers,
        json!([
            { "id": 1, "name": "Zafra Classic", "price": 89, "description": "Classic fragrance" },
        ]),
    )
}

/// Twelve orders of 10.50 each; one has a null amount.
async fn orders(State(failing): State<Failing>, headers: HeaderMap) -> Response {
    let records: Vec<Value> = (1..=12)
        .map(|id| {
            let amount = if id == 12 { Value::Null } else { json!(10.5) };
            json!({
                "id": id,
                "user_id": 1,
                "product_id": 1,
                "quantity": 1,
                "total_amount": amount,
                "status": "Completed",
                "created_at": "2024-02-01",
            })
        })
        .collect();
    collection("orders", &failing, &headers, Value::Array(records))
}

async fn reviews(State(failing): State<Failing>, headers: HeaderMap) -> Response {
    collection(
        "reviews",
        &failing,
        &headers,
        json!([
            { "id": 1, "user_id": 2, "product_id": 1, "rating": 4.5, "comment": "Lovely" },
        ]),
    )
}
