//! Any errors that charlie-web might generate, and supporting implementations.

use std::error::Error;
use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use backtrace::Backtrace;
use charlie_sightseeing::{is_truthy, SearchError};
use serde_json::{json, Value};
use thiserror::Error;

/// Reported as `apiError` when the upstream did not send a body.
const NO_UPSTREAM_DETAILS: &str = "No additional details";

/// The Standard Error for most of Charlie
pub struct HandlerError {
    /// The wrapped error value.
    kind: HandlerErrorKind,
    /// The backtrace related to the wrapped error.
    pub(crate) backtrace: Backtrace,
}

/// An error that happened in a web handler.
#[derive(Error, Debug)]
pub enum HandlerErrorKind {
    /// The request did not say where the user is going.
    #[error("Destination is required")]
    MissingDestination,

    /// The upstream answered, but not with a list of tours. Carries the body
    /// it sent.
    #[error("No sightseeing data found")]
    NoData(Value),

    /// The upstream could not be reached or rejected the request.
    #[error("Failed to fetch sightSeeing details")]
    Upstream(#[from] SearchError),
}

impl HandlerErrorKind {
    /// Convert the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingDestination => StatusCode::BAD_REQUEST,
            Self::NoData(_) => StatusCode::NOT_FOUND,
        }
    }

    /// The JSON body reporting the error to the client.
    pub fn response_body(&self) -> Value {
        let message = self.to_string();
        match self {
            Self::MissingDestination => json!({ "error": message }),
            Self::NoData(api_response) => json!({
                "error": message,
                "apiResponse": api_response,
            }),
            Self::Upstream(error) => json!({
                "error": message,
                "details": error.to_string(),
                "apiError": error
                    .upstream_body()
                    .filter(|body| is_truthy(body))
                    .cloned()
                    .unwrap_or_else(|| Value::String(NO_UPSTREAM_DETAILS.to_owned())),
            }),
        }
    }
}

impl HandlerError {
    /// Access the wrapped error.
    pub fn kind(&self) -> &HandlerErrorKind {
        &self.kind
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.kind.source()
    }
}

impl<T> From<T> for HandlerError
where
    HandlerErrorKind: From<T>,
{
    fn from(item: T) -> Self {
        HandlerError {
            kind: HandlerErrorKind::from(item),
            backtrace: Backtrace::new(),
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::fmt::Debug for HandlerError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Name the struct `HandlerError/<error name>` so that log aggregation
        // groups different kinds of errors separately.
        fmt.debug_struct(&format!("HandlerError/{:?}", &self.kind))
            .field("kind", &self.kind)
            .field("backtrace", &self.backtrace)
            .finish()
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.kind().response_body())
    }
}

#[cfg(test)]
mod tests {
    use super::{HandlerError, HandlerErrorKind};
    use actix_web::{http::StatusCode, ResponseError};
    use charlie_sightseeing::SearchError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn missing_destination_is_a_client_error() {
        let error: HandlerError = HandlerErrorKind::MissingDestination.into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.kind().response_body(),
            json!({"error": "Destination is required"})
        );
    }

    #[test]
    fn no_data_echoes_the_upstream_body() {
        let error: HandlerError = HandlerErrorKind::NoData(json!({"status": false})).into();
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            error.kind().response_body(),
            json!({"error": "No sightseeing data found", "apiResponse": {"status": false}})
        );
    }

    #[test]
    fn upstream_errors_include_details() {
        let error: HandlerError = SearchError::Upstream {
            status: 429,
            body: json!({"message": "Too many requests"}),
        }
        .into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            error.kind().response_body(),
            json!({
                "error": "Failed to fetch sightSeeing details",
                "details": "Request failed with status code 429",
                "apiError": {"message": "Too many requests"},
            })
        );
    }

    #[test]
    fn empty_upstream_bodies_have_no_details() {
        for body in [json!(""), json!(null)] {
            let error: HandlerError = SearchError::Upstream { status: 502, body }.into();
            assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                error.kind().response_body(),
                json!({
                    "error": "Failed to fetch sightSeeing details",
                    "details": "Request failed with status code 502",
                    "apiError": "No additional details",
                })
            );
        }
    }

    #[test]
    fn debug_output_names_the_kind() {
        let error: HandlerError = HandlerErrorKind::MissingDestination.into();
        assert!(format!("{:?}", error).starts_with("HandlerError/MissingDestination"));
    }
}
