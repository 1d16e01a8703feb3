//! HTTP function boundary
//!
//! | Method    | Path    | Function                |
//! |-----------|---------|-------------------------|
//! | `POST`    | `/`     | batch questions → CSV   |
//! | `GET`     | `/logs` | interaction log → CSV   |
//! | `POST`    | `/logs` | record one interaction  |
//! | `OPTIONS` | any     | CORS preflight          |

use std::net::SocketAddr;
use std::sync::Arc;

use agentprobe_core::export::preflight;
use agentprobe_domain::FunctionResponse;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tracing::{info, warn};

use crate::context::AppContext;

type SharedContext = Arc<AppContext>;

/// Build the router for the three functions.
pub fn router(context: SharedContext) -> Router {
    Router::new()
        .route("/", post(batch).options(options))
        .route("/logs", get(export_logs).post(record).options(options))
        .fallback(fallback)
        .with_state(context)
}

/// Bind `addr` and serve until the process stops.
pub async fn serve(addr: SocketAddr, context: SharedContext) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(bind_address = %listener.local_addr()?, "function server started");
    axum::serve(listener, router(context)).await
}

async fn batch(State(context): State<SharedContext>, body: Bytes) -> Response {
    let request = request_value(&body);
    to_response(context.batch.handle(&context.config, &request).await)
}

async fn export_logs(State(context): State<SharedContext>) -> Response {
    to_response(context.logs.handle(&context.config).await)
}

async fn record(State(context): State<SharedContext>, body: Bytes) -> Response {
    let request = request_value(&body);
    to_response(context.record.handle(&context.config, &request).await)
}

async fn options() -> Response {
    to_response(preflight())
}

async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return to_response(preflight());
    }
    StatusCode::NOT_FOUND.into_response()
}

/// JSON bodies are passed through; anything else is handed over as text so
/// the function reports it as an invalid request.
fn request_value(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Convert a function response envelope into an HTTP response.
pub fn to_response(envelope: FunctionResponse) -> Response {
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = Response::new(Body::from(envelope.body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in envelope.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "dropping response header that is not valid HTTP"),
        }
    }

    response
}
