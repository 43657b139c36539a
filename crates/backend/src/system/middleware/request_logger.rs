use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::format_number;
use crate::system::session::{session_from_headers, DEFAULT_SESSION};

/// One console line per request: time, duration, body size, status,
/// method, path and the caller's session.
///
/// The body is buffered to report its real size.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let session = session_from_headers(req.headers()).unwrap_or_else(|| DEFAULT_SESSION.to_string());

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let (size, body) = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => (format_number(bytes.len()), Body::from(bytes)),
        Err(e) => {
            tracing::warn!("Could not buffer response body for {} {}: {}", method, path, e);
            ("error".to_string(), Body::default())
        }
    };

    // cyan for success, yellow for everything else
    let color_code = if parts.status.is_success() { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>10} | {} {:>6} {} [{}]",
        color_code,
        Local::now().format("%H:%M:%S"),
        start.elapsed().as_millis(),
        size,
        parts.status.as_u16(),
        method,
        path,
        session
    );

    Response::from_parts(parts, body)
}
