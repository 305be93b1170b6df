//! The shared dispatch path used by every resource service.
//!
//! # Design
//! `Client` owns the base URL, credentials and a [`Transport`]. Services
//! only build paths and payloads; they call [`Client::request`] to get a
//! stamped `HttpRequest` and then one of [`Client::fetch`],
//! [`Client::fetch_page`] or [`Client::execute`]. All three go through
//! `dispatch`, which sends the request and classifies the response, so
//! error handling is identical for every endpoint.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, CONTENT_TYPE_JSON};
use crate::response::{self, Outcome, Page};
use crate::services::{
    AllowlistService, AnalyticsService, DenylistService, ParentalControlCategoriesService,
    ParentalControlService, ParentalControlServicesService, PrivacyBlocklistsService,
    PrivacyNativesService, PrivacyService, ProfilesService, RewritesService,
    SecurityService, SecurityTldsService, SettingsBlockPageService, SettingsLogsService,
    SettingsPerformanceService, SettingsService, SetupLinkedIpService, SetupService,
};
use crate::transport::{Transport, UreqTransport};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const USER_AGENT: &str = concat!("nextdns-rs/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the NextDNS management API.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_key: Option<String>,
    debug: bool,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Build a client from the `NEXTDNS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request for `path`, relative to the base URL.
    pub fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let request = HttpRequest::new(method, url)
            .with_header("accept", CONTENT_TYPE_JSON)
            .with_header("user-agent", USER_AGENT);
        match &self.api_key {
            Some(key) => request.with_header(API_KEY_HEADER, key.as_str()),
            None => request,
        }
    }

    /// Send `request` and decode the `data` member of the response.
    pub fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        match self.dispatch(request)? {
            (response, Outcome::NoContent) => Err(response::no_content_error(&response).into()),
            (response, Outcome::Body) => Ok(response::decode_data(&response)?),
        }
    }

    /// Send `request` and decode a paginated listing.
    pub fn fetch_page<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<Page<T>> {
        match self.dispatch(request)? {
            (response, Outcome::NoContent) => Err(response::no_content_error(&response).into()),
            (response, Outcome::Body) => Ok(response::decode_page(&response)?),
        }
    }

    /// Send `request` for its side effect; the body is only classified.
    pub fn execute(&self, request: HttpRequest) -> Result<()> {
        self.dispatch(request).map(|_| ())
    }

    fn dispatch(&self, request: HttpRequest) -> Result<(HttpResponse, Outcome)> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        if self.debug {
            if let Some(body) = &request.body {
                tracing::debug!(body = %body, "request body");
            }
        }

        let response = self
            .transport
            .send(&request)
            .map_err(ApiError::Transport)?;

        if self.debug && !response.body.is_empty() {
            tracing::debug!(status = response.status, body = %response.body, "received response");
        } else {
            tracing::debug!(status = response.status, "received response");
        }

        match response::classify(&response) {
            Ok(outcome) => Ok((response, outcome)),
            Err(err) => {
                tracing::debug!(
                    method = %request.method,
                    url = %request.url,
                    status = err.status,
                    kind = %err.kind,
                    "request rejected"
                );
                Err(err.into())
            }
        }
    }

    pub fn profiles(&self) -> ProfilesService<'_> {
        ProfilesService::new(self)
    }

    pub fn allowlist(&self) -> AllowlistService<'_> {
        AllowlistService::new(self)
    }

    pub fn denylist(&self) -> DenylistService<'_> {
        DenylistService::new(self)
    }

    pub fn parental_control(&self) -> ParentalControlService<'_> {
        ParentalControlService::new(self)
    }

    pub fn parental_control_services(&self) -> ParentalControlServicesService<'_> {
        ParentalControlServicesService::new(self)
    }

    pub fn parental_control_categories(&self) -> ParentalControlCategoriesService<'_> {
        ParentalControlCategoriesService::new(self)
    }

    pub fn privacy(&self) -> PrivacyService<'_> {
        PrivacyService::new(self)
    }

    pub fn privacy_blocklists(&self) -> PrivacyBlocklistsService<'_> {
        PrivacyBlocklistsService::new(self)
    }

    pub fn privacy_natives(&self) -> PrivacyNativesService<'_> {
        PrivacyNativesService::new(self)
    }

    pub fn security(&self) -> SecurityService<'_> {
        SecurityService::new(self)
    }

    pub fn security_tlds(&self) -> SecurityTldsService<'_> {
        SecurityTldsService::new(self)
    }

    pub fn settings(&self) -> SettingsService<'_> {
        SettingsService::new(self)
    }

    pub fn settings_logs(&self) -> SettingsLogsService<'_> {
        SettingsLogsService::new(self)
    }

    pub fn settings_block_page(&self) -> SettingsBlockPageService<'_> {
        SettingsBlockPageService::new(self)
    }

    pub fn settings_performance(&self) -> SettingsPerformanceService<'_> {
        SettingsPerformanceService::new(self)
    }

    pub fn rewrites(&self) -> RewritesService<'_> {
        RewritesService::new(self)
    }

    pub fn setup(&self) -> SetupService<'_> {
        SetupService::new(self)
    }

    pub fn setup_linked_ip(&self) -> SetupLinkedIpService<'_> {
        SetupLinkedIpService::new(self)
    }

    pub fn analytics(&self) -> AnalyticsService<'_> {
        AnalyticsService::new(self)
    }
}

#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Replace the default `ureq` transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Client> {
        self.config.validate()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new(self.config.timeout)),
        };
        Ok(Client {
            base_url: self.config.base_url.trim_end_matches('/').to_string(),
            api_key: self.config.api_key,
            debug: self.config.debug,
            transport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::error::ErrorKind;
    use crate::testing::{client_with, RecordingTransport};

    #[test]
    fn request_stamps_common_headers() {
        let transport = RecordingTransport::new();
        let req = client_with(&transport).request(HttpMethod::Get, "profiles");
        assert_eq!(req.url, "http://localhost:3000/profiles");
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("x-api-key"), Some("test-key"));
        assert!(req.header("user-agent").unwrap().starts_with("nextdns-rs/"));
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn request_without_key_has_no_auth_header() {
        let client = Client::builder()
            .base_url("http://localhost:3000")
            .transport(RecordingTransport::new())
            .build()
            .unwrap();
        let req = client.request(HttpMethod::Get, "profiles");
        assert!(req.header(API_KEY_HEADER).is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = Client::builder()
            .base_url("http://localhost:3000/")
            .transport(RecordingTransport::new())
            .build()
            .unwrap();
        let req = client.request(HttpMethod::Get, "/profiles");
        assert_eq!(req.url, "http://localhost:3000/profiles");
    }

    #[test]
    fn empty_api_key_fails_to_build() {
        let err = Client::builder().api_key("").build().unwrap_err();
        assert!(matches!(err, ApiError::EmptyApiKey));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let transport = RecordingTransport::new();
        let out = format!("{:?}", client_with(&transport));
        assert!(!out.contains("test-key"));
        assert!(out.contains("<REDACTED>"));
    }

    #[test]
    fn fetch_unwraps_data() {
        let transport = RecordingTransport::new();
        transport.respond(200, r#"{"data":{"id":"abc123"}}"#);
        let client = client_with(&transport);
        let value: serde_json::Value = client
            .fetch(client.request(HttpMethod::Get, "profiles/abc123"))
            .unwrap();
        assert_eq!(value["id"], "abc123");
    }

    #[test]
    fn fetch_on_no_content_is_malformed() {
        let transport = RecordingTransport::new();
        transport.respond(204, "");
        let client = client_with(&transport);
        let err = client
            .fetch::<serde_json::Value>(client.request(HttpMethod::Get, "profiles/abc123"))
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Malformed));
        assert_eq!(
            err.response().unwrap().cause.as_deref(),
            Some("response has no content")
        );
    }

    #[test]
    fn fetch_page_on_no_content_is_malformed() {
        let transport = RecordingTransport::new();
        transport.respond(204, "");
        let client = client_with(&transport);
        let err = client
            .fetch_page::<serde_json::Value>(client.request(HttpMethod::Get, "profiles"))
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Malformed));
    }

    #[test]
    fn fetch_accepts_errors_as_a_field_value() {
        let transport = RecordingTransport::new();
        transport.respond(200, r#"{"data":{"id":"abc123","name":"errors"}}"#);
        let client = client_with(&transport);
        let value: serde_json::Value = client
            .fetch(client.request(HttpMethod::Get, "profiles/abc123"))
            .unwrap();
        assert_eq!(value["name"], "errors");
    }

    #[test]
    fn execute_accepts_no_content() {
        let transport = RecordingTransport::new();
        transport.respond(204, "");
        let client = client_with(&transport);
        client
            .execute(client.request(HttpMethod::Delete, "profiles/abc123"))
            .unwrap();
        assert_eq!(transport.last().method, HttpMethod::Delete);
    }

    #[test]
    fn execute_still_classifies_embedded_errors() {
        let transport = RecordingTransport::new();
        transport.respond(200, r#"{"errors":[{"code":"duplicate"}]}"#);
        let client = client_with(&transport);
        let err = client
            .execute(client.request(HttpMethod::Post, "profiles/abc123/denylist"))
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Request));
        assert!(err.response().unwrap().has_code("duplicate"));
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run one PATCH with a JSON body and return what was logged at debug level.
    fn logs_for_patch(debug: bool) -> String {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let transport = RecordingTransport::new();
        transport.respond(200, r#"{"data":{"id":"abc123","name":"Renamed"}}"#);
        let client = Client::builder()
            .base_url("http://localhost:3000")
            .api_key("test-key")
            .debug(debug)
            .transport(transport.clone())
            .build()
            .unwrap();

        tracing::subscriber::with_default(subscriber, || {
            let req = client
                .request(HttpMethod::Patch, "profiles/abc123")
                .json(&serde_json::json!({"name": "Home"}))
                .unwrap();
            client.fetch::<serde_json::Value>(req).unwrap();
        });

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn debug_logs_bodies_but_never_the_api_key() {
        let out = logs_for_patch(true);
        assert!(out.contains("sending request"), "{out}");
        assert!(out.contains("request body"), "{out}");
        assert!(out.contains(r#""name":"Home""#), "{out}");
        assert!(out.contains("Renamed"), "{out}");
        assert!(!out.contains("test-key"), "{out}");
    }

    #[test]
    fn bodies_stay_out_of_logs_without_debug() {
        let out = logs_for_patch(false);
        assert!(out.contains("sending request"), "{out}");
        assert!(out.contains("received response"), "{out}");
        assert!(!out.contains("request body"), "{out}");
        assert!(!out.contains("Home"), "{out}");
        assert!(!out.contains("Renamed"), "{out}");
        assert!(!out.contains("test-key"), "{out}");
    }

    #[test]
    fn transport_failures_are_wrapped() {
        let transport = RecordingTransport::new();
        let client = client_with(&transport);
        let err = client
            .execute(client.request(HttpMethod::Get, "profiles"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
