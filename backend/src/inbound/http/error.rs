//! HTTP adapter mapping for domain errors.
//!
//! Keeps [`Error`] transport-agnostic while giving Actix handlers consistent
//! JSON bodies, status codes and headers. Rate-limited responses also carry
//! `Retry-After` in seconds, derived from the `retryAfterHours` detail.

use actix_web::http::header::RETRY_AFTER;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const SECONDS_PER_HOUR: u64 = 3_600;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::ProvisioningFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn retry_after_seconds(error: &Error) -> Option<u64> {
    if error.code() != ErrorCode::RateLimited {
        return None;
    }
    error
        .details()
        .and_then(|details| details.get("retryAfterHours"))
        .and_then(serde_json::Value::as_u64)
        .map(|hours| hours.saturating_mul(SECONDS_PER_HOUR))
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if let Some(seconds) = retry_after_seconds(self) {
            builder.insert_header((RETRY_AFTER, seconds.to_string()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
