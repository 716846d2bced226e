//! Routes outside of the notes procedures

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::api::Error;
use crate::api::Success;

/// Liveness probe
///
/// Does not touch the storage
#[allow(clippy::unused_async)]
pub async fn health() -> Success<&'static str> {
    Success::ok("ok")
}

/// All requests without a matching route end up here
#[allow(clippy::unused_async)]
pub async fn fallback() -> Error {
    Error::not_found("Unknown procedure")
}

/// Give timed out requests the same body as every other failure
///
/// Only the timeout layer answers with `408 Request Timeout`
#[allow(clippy::unused_async)]
pub async fn timeout_as_error(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        Error::request_timeout().into_response()
    } else {
        response
    }
}
