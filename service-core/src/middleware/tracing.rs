use axum::http::{HeaderValue, Request as HttpRequest};
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reads the caller's `x-request-id` or mints one, so the trace span and the
/// response both carry the same correlation id.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = match request_id_of(&req) {
        Some(id) => id.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            ::tracing::debug!(request_id = %id, "Assigned request id");
            id
        }
    };

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = header_value.clone() {
        req.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let mut response = next.run(req).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// The request id attached to a request, if any.
pub fn request_id_of<B>(request: &HttpRequest<B>) -> Option<&str> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
