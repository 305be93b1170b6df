//! Response classification and `data` envelope decoding.
//!
//! Every response from the API passes through [`classify`] before anything
//! is decoded. The API sometimes answers 200 with an `errors` envelope (for
//! example when adding a duplicate list entry), so the raw body is inspected
//! regardless of status.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{
    status_text, ErrorKind, ErrorResponse, ResponseError, INTERNAL_SERVICE_ERROR,
    MALFORMED_BODY, MALFORMED_ERROR_BODY, RESPONSE_ERROR,
};
use crate::http::HttpResponse;

const NO_CONTENT: u16 = 204;

/// One page of a listing, with the cursor for the next page if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Deserialize, Default)]
struct Meta {
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize, Default)]
struct Pagination {
    #[serde(default)]
    cursor: Option<String>,
}

/// Outcome of classifying a response that did not fail.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// 204: there is nothing to decode.
    NoContent,
    /// A success body that may be decoded.
    Body,
}

/// Map a response onto success or a classified `ResponseError`.
pub(crate) fn classify(response: &HttpResponse) -> Result<Outcome, ResponseError> {
    if response.status == NO_CONTENT {
        return Ok(Outcome::NoContent);
    }

    if response.status >= 400 || has_errors_member(&response.body) {
        return Err(classify_failure(response));
    }

    Ok(Outcome::Body)
}

/// True when the body is a JSON object with a top-level `errors` key.
fn has_errors_member(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(serde_json::Value::as_object)
        .is_some_and(|object| object.contains_key("errors"))
}

fn classify_failure(response: &HttpResponse) -> ResponseError {
    let status = response.status;
    let mut err = ResponseError {
        kind: ErrorKind::Request,
        message: RESPONSE_ERROR,
        status,
        status_text: status_text(status),
        body: response.body.clone(),
        errors: Vec::new(),
        cause: None,
    };

    if status >= 500 {
        err.kind = ErrorKind::ServiceError;
        err.message = INTERNAL_SERVICE_ERROR;
        return err;
    }

    match serde_json::from_str::<ErrorResponse>(&response.body) {
        Ok(parsed) => {
            err.kind = match status {
                401 | 403 => ErrorKind::Authentication,
                404 => ErrorKind::NotFound,
                _ => ErrorKind::Request,
            };
            err.errors = parsed.errors;
        }
        Err(e) => {
            err.kind = ErrorKind::Malformed;
            err.message = MALFORMED_ERROR_BODY;
            err.cause = Some(e.to_string());
        }
    }
    err
}

/// Decode the `data` member of a success body.
pub(crate) fn decode_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ResponseError> {
    decode_envelope(response).map(|envelope| envelope.data)
}

/// Decode a listing, keeping the pagination cursor.
pub(crate) fn decode_page<T: DeserializeOwned>(
    response: &HttpResponse,
) -> Result<Page<T>, ResponseError> {
    let envelope: Envelope<Vec<T>> = decode_envelope(response)?;
    let cursor = envelope
        .meta
        .and_then(|m| m.pagination)
        .and_then(|p| p.cursor)
        .filter(|c| !c.is_empty());
    Ok(Page {
        data: envelope.data,
        cursor,
    })
}

/// A 204 reached a call that expected `data`.
pub(crate) fn no_content_error(response: &HttpResponse) -> ResponseError {
    malformed(response, "response has no content".to_string())
}

fn decode_envelope<T: DeserializeOwned>(
    response: &HttpResponse,
) -> Result<Envelope<T>, ResponseError> {
    serde_json::from_str(&response.body).map_err(|e| malformed(response, e.to_string()))
}

fn malformed(response: &HttpResponse, cause: String) -> ResponseError {
    ResponseError {
        kind: ErrorKind::Malformed,
        message: MALFORMED_BODY,
        status: response.status,
        status_text: status_text(response.status),
        body: response.body.clone(),
        errors: Vec::new(),
        cause: Some(cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(status: u16, body: &str) -> ErrorKind {
        classify(&HttpResponse::new(status, body)).unwrap_err().kind
    }

    #[test]
    fn no_content_skips_decoding() {
        let outcome = classify(&HttpResponse::new(204, "")).unwrap();
        assert_eq!(outcome, Outcome::NoContent);
    }

    #[test]
    fn plain_success_is_a_body() {
        let outcome = classify(&HttpResponse::new(200, r#"{"data":[]}"#)).unwrap();
        assert_eq!(outcome, Outcome::Body);
    }

    #[test]
    fn server_errors_are_not_parsed() {
        let err = classify(&HttpResponse::new(502, "<html>bad gateway</html>")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceError);
        assert_eq!(err.message, "internal service error received");
        assert_eq!(err.status_text, "Bad Gateway");
        assert!(err.errors.is_empty());
    }

    #[test]
    fn status_codes_map_to_kinds() {
        let body = r#"{"errors":[{"code":"x"}]}"#;
        assert_eq!(kind_of(401, body), ErrorKind::Authentication);
        assert_eq!(kind_of(403, body), ErrorKind::Authentication);
        assert_eq!(kind_of(404, body), ErrorKind::NotFound);
        assert_eq!(kind_of(400, body), ErrorKind::Request);
        assert_eq!(kind_of(429, body), ErrorKind::Request);
    }

    #[test]
    fn embedded_errors_on_200_are_request_errors() {
        let err = classify(&HttpResponse::new(
            200,
            r#"{"errors":[{"code":"duplicate","detail":"entry already exists"}]}"#,
        ))
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Request);
        assert!(err.has_code("duplicate"));
        assert_eq!(
            err.to_string(),
            "response error received (request): entry already exists (duplicate)"
        );
    }

    #[test]
    fn errors_as_a_data_value_is_success() {
        let outcome = classify(&HttpResponse::new(
            200,
            r#"{"data":{"id":"abc123","name":"errors"}}"#,
        ))
        .unwrap();
        assert_eq!(outcome, Outcome::Body);

        let nested = classify(&HttpResponse::new(
            200,
            r#"{"data":[{"id":"r1","name":"x","content":"y","errors":[]}]}"#,
        ))
        .unwrap();
        assert_eq!(nested, Outcome::Body);
    }

    #[test]
    fn unparsable_success_body_is_left_to_decoding() {
        let outcome = classify(&HttpResponse::new(200, r#"not json "errors""#)).unwrap();
        assert_eq!(outcome, Outcome::Body);
    }

    #[test]
    fn unparsable_error_body_is_malformed() {
        let err = classify(&HttpResponse::new(400, "oops")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
        assert_eq!(err.message, "malformed error response body received");
        assert!(err.cause.is_some());
        assert_eq!(err.body, "oops");
    }

    #[test]
    fn empty_error_body_is_malformed() {
        assert_eq!(kind_of(404, ""), ErrorKind::Malformed);
    }

    #[test]
    fn decode_data_unwraps_envelope() {
        let ids: Vec<String> =
            decode_data(&HttpResponse::new(200, r#"{"data":["a","b"]}"#)).unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn decode_data_rejects_invalid_json() {
        let err = decode_data::<Vec<String>>(&HttpResponse::new(200, "not json")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
        assert_eq!(err.message, "malformed response body received");
    }

    #[test]
    fn decode_page_keeps_cursor() {
        let page: Page<u32> = decode_page(&HttpResponse::new(
            200,
            r#"{"data":[1,2],"meta":{"pagination":{"cursor":"next-1"}}}"#,
        ))
        .unwrap();
        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.cursor.as_deref(), Some("next-1"));
        assert!(page.has_more());
    }

    #[test]
    fn decode_page_treats_null_cursor_as_last_page() {
        let page: Page<u32> = decode_page(&HttpResponse::new(
            200,
            r#"{"data":[],"meta":{"pagination":{"cursor":null}}}"#,
        ))
        .unwrap();
        assert!(page.cursor.is_none());
        assert!(!page.has_more());
    }
}
