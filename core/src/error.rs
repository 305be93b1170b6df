//! Error types for the NextDNS API client.
//!
//! # Design
//! Failures that happen before any traffic (bad config, missing profile,
//! serialization) get their own `ApiError` variants. Everything the API
//! answers with is funneled through `ResponseError`, whose `ErrorKind` is
//! the outcome of response classification.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, ApiError>;

pub(crate) const INTERNAL_SERVICE_ERROR: &str = "internal service error received";
pub(crate) const RESPONSE_ERROR: &str = "response error received";
pub(crate) const MALFORMED_BODY: &str = "malformed response body received";
pub(crate) const MALFORMED_ERROR_BODY: &str = "malformed error response body received";

/// Category of a classified API response failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API returned a 5xx status.
    ServiceError,
    /// Any other rejected request, including 200 bodies carrying `errors`.
    Request,
    /// The body could not be decoded.
    Malformed,
    /// 401 or 403.
    Authentication,
    /// 404.
    NotFound,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ServiceError => "service_error",
            ErrorKind::Request => "request",
            ErrorKind::Malformed => "malformed",
            ErrorKind::Authentication => "authentication",
            ErrorKind::NotFound => "not_found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `{"errors": [...]}` envelope returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub source: Option<ErrorSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorSource {
    #[serde(default)]
    pub parameter: Option<String>,
}

/// A classified failure response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    pub kind: ErrorKind,
    pub message: &'static str,
    pub status: u16,
    /// Canonical reason phrase for `status`, empty when unknown.
    pub status_text: &'static str,
    pub body: String,
    pub errors: Vec<ErrorDetail>,
    /// Decoder message when the body could not be parsed.
    pub cause: Option<String>,
}

impl ResponseError {
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str(self.message);
        }
        write!(f, "{} ({}): ", self.message, self.kind)?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match err.detail.as_deref() {
                Some(detail) if !detail.is_empty() => write!(f, "{detail} ({})", err.code)?,
                _ => f.write_str(&err.code)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ResponseError {}

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("api key must not be empty")]
    EmptyApiKey,

    #[error("missing profile is required")]
    MissingProfile,

    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl ApiError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classified kind, when the failure came from an API response.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Response(err) => Some(err.kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }

    pub fn response(&self) -> Option<&ResponseError> {
        match self {
            ApiError::Response(err) => Some(err),
            _ => None,
        }
    }
}

/// Canonical reason phrase for `status`, empty when it has none.
pub(crate) fn status_text(status: u16) -> &'static str {
    ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_error(errors: Vec<ErrorDetail>) -> ResponseError {
        ResponseError {
            kind: ErrorKind::Request,
            message: RESPONSE_ERROR,
            status: 400,
            status_text: status_text(400),
            body: String::new(),
            errors,
            cause: None,
        }
    }

    fn detail(code: &str, detail: Option<&str>) -> ErrorDetail {
        ErrorDetail {
            code: code.to_string(),
            detail: detail.map(str::to_string),
            source: None,
        }
    }

    #[test]
    fn display_without_details_is_the_message() {
        let err = response_error(Vec::new());
        assert_eq!(err.to_string(), "response error received");
    }

    #[test]
    fn display_lists_every_detail() {
        let err = response_error(vec![
            detail("duplicate", Some("already exists")),
            detail("invalid", None),
        ]);
        assert_eq!(
            err.to_string(),
            "response error received (request): already exists (duplicate); invalid"
        );
    }

    #[test]
    fn api_error_exposes_kind() {
        let mut err = response_error(Vec::new());
        err.kind = ErrorKind::NotFound;
        let api: ApiError = err.into();
        assert!(api.is_not_found());
        assert_eq!(api.kind(), Some(ErrorKind::NotFound));
        assert_eq!(ApiError::MissingProfile.kind(), None);
    }

    #[test]
    fn error_response_decodes_source_parameter() {
        let parsed: ErrorResponse = serde_json::from_str(
            r#"{"errors":[{"code":"required","source":{"parameter":"type"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.errors[0].code, "required");
        assert_eq!(
            parsed.errors[0].source.as_ref().unwrap().parameter.as_deref(),
            Some("type")
        );
    }

    #[test]
    fn status_text_covers_every_registered_status() {
        assert_eq!(status_text(410), "Gone");
        assert_eq!(status_text(413), "Payload Too Large");
        assert_eq!(status_text(418), "I'm a teapot");
        assert_eq!(status_text(501), "Not Implemented");
        assert_eq!(status_text(599), "");
        assert_eq!(status_text(42), "");
    }

    #[test]
    fn kind_strings_match_api_vocabulary() {
        assert_eq!(ErrorKind::ServiceError.to_string(), "service_error");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
    }
}
