//! In-memory emulation of the NextDNS management API.
//!
//! Each profile is stored as one JSON document. Object resources are
//! addressed by a JSON pointer into that document, list resources by a
//! pointer to an array of `{"id": ...}` entries, so one set of handlers
//! serves every endpoint.

use std::{collections::HashMap, net::IpAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-api-key";

pub type Db = Arc<RwLock<HashMap<String, Value>>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    api_key: Option<Arc<str>>,
}

/// Settings objects: route suffix and JSON pointer into the profile.
const OBJECTS: &[(&str, &str)] = &[
    ("security", "/security"),
    ("privacy", "/privacy"),
    ("parentalControl", "/parentalControl"),
    ("settings", "/settings"),
    ("settings/logs", "/settings/logs"),
    ("settings/blockPage", "/settings/blockPage"),
    ("settings/performance", "/settings/performance"),
    ("setup/linkedip", "/setup/linkedIp"),
];

/// Lists of `{"id": ...}` entries.
const COLLECTIONS: &[(&str, &str)] = &[
    ("allowlist", "/allowlist"),
    ("denylist", "/denylist"),
    ("parentalControl/services", "/parentalControl/services"),
    ("parentalControl/categories", "/parentalControl/categories"),
    ("privacy/blocklists", "/privacy/blocklists"),
    ("privacy/natives", "/privacy/natives"),
    ("security/tlds", "/security/tlds"),
];

/// Error codes the API puts in its `{"errors": [...]}` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Forbidden,
    NotFound,
    Invalid,
    Required,
    /// Reported with a 200 status, like the real API does.
    Duplicate,
}

impl MockError {
    fn status(self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Invalid | Self::Required => StatusCode::BAD_REQUEST,
            Self::Duplicate => StatusCode::OK,
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::NotFound => "notFound",
            Self::Invalid => "invalid",
            Self::Required => "required",
            Self::Duplicate => "duplicate",
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let body = json!({ "errors": [{ "code": self.code() }] });
        (self.status(), Json(body)).into_response()
    }
}

type Reply = Result<Response, MockError>;

fn data(value: Value) -> Response {
    Json(json!({ "data": value })).into_response()
}

fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

pub fn app() -> Router {
    build_router(AppState {
        db: Db::default(),
        api_key: None,
    })
}

/// Like [`app`], but every request must carry `x-api-key: {api_key}`.
pub fn app_with_api_key(api_key: impl Into<String>) -> Router {
    build_router(AppState {
        db: Db::default(),
        api_key: Some(Arc::from(api_key.into())),
    })
}

fn build_router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new()
        .route("/profiles", get(list_profiles).post(create_profile))
        .route(
            "/profiles/{profile}",
            get(get_profile).patch(update_profile).delete(delete_profile),
        )
        .route(
            "/profiles/{profile}/setup",
            get(|State(state): State<AppState>, Path(profile): Path<String>| {
                get_object(state, profile, "/setup")
            }),
        )
        .route(
            "/profiles/{profile}/rewrites",
            get(|State(state): State<AppState>, Path(profile): Path<String>| {
                list_entries(state, profile, "/rewrites")
            })
            .post(create_rewrite),
        )
        .route(
            "/profiles/{profile}/rewrites/{id}",
            axum::routing::delete(
                |State(state): State<AppState>, Path((profile, id)): Path<(String, String)>| {
                    delete_entry(state, profile, "/rewrites", id)
                },
            ),
        )
        .route("/profiles/{profile}/analytics/{kind}", get(analytics));

    for &(route, pointer) in OBJECTS {
        router = router.route(
            &format!("/profiles/{{profile}}/{route}"),
            get(move |State(state): State<AppState>, Path(profile): Path<String>| {
                get_object(state, profile, pointer)
            })
            .patch(
                move |State(state): State<AppState>, Path(profile): Path<String>, body: Bytes| {
                    patch_object(state, profile, pointer, body)
                },
            ),
        );
    }

    for &(route, pointer) in COLLECTIONS {
        router = router
            .route(
                &format!("/profiles/{{profile}}/{route}"),
                get(move |State(state): State<AppState>, Path(profile): Path<String>| {
                    list_entries(state, profile, pointer)
                })
                .put(
                    move |State(state): State<AppState>, Path(profile): Path<String>, body: Bytes| {
                        replace_entries(state, profile, pointer, body)
                    },
                )
                .post(
                    move |State(state): State<AppState>, Path(profile): Path<String>, body: Bytes| {
                        add_entry(state, profile, pointer, body)
                    },
                ),
            )
            .route(
                &format!("/profiles/{{profile}}/{route}/{{id}}"),
                axum::routing::patch(
                    move |State(state): State<AppState>,
                          Path((profile, id)): Path<(String, String)>,
                          body: Bytes| { update_entry(state, profile, pointer, id, body) },
                )
                .delete(
                    move |State(state): State<AppState>,
                          Path((profile, id)): Path<(String, String)>| {
                        delete_entry(state, profile, pointer, id)
                    },
                ),
            );
    }

    router
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_api_key(
    listener: TcpListener,
    api_key: Option<String>,
) -> Result<(), std::io::Error> {
    let app = match api_key {
        Some(key) => app_with_api_key(key),
        None => app(),
    };
    axum::serve(listener, app).await
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.api_key {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_ref()) {
            tracing::warn!(uri = %request.uri(), "rejected request without valid api key");
            return MockError::Forbidden.into_response();
        }
    }
    next.run(request).await
}

fn parse_body(body: &Bytes) -> Result<Value, MockError> {
    serde_json::from_slice(body).map_err(|_| MockError::Invalid)
}

/// Recursively merge `patch` into `target`. Objects merge key by key,
/// anything else replaces.
fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

fn default_profile(id: &str) -> Value {
    json!({
        "id": id,
        "fingerprint": format!("fp{id}"),
        "name": "",
        "security": {
            "threatIntelligenceFeeds": true,
            "aiThreatDetection": true,
            "googleSafeBrowsing": false,
            "cryptojacking": true,
            "dnsRebinding": true,
            "idnHomographs": true,
            "typosquatting": true,
            "dga": true,
            "nrd": false,
            "ddns": false,
            "parking": false,
            "csam": true,
            "tlds": []
        },
        "privacy": {
            "blocklists": [{ "id": "nextdns-recommended" }],
            "natives": [],
            "disguisedTrackers": true,
            "allowAffiliate": true
        },
        "parentalControl": {
            "services": [],
            "categories": [],
            "safeSearch": false,
            "youtubeRestrictedMode": false,
            "blockBypass": false
        },
        "denylist": [],
        "allowlist": [],
        "settings": {
            "logs": {
                "enabled": true,
                "drop": { "ip": false, "domain": false },
                "retention": 7776000,
                "location": "us"
            },
            "blockPage": { "enabled": true },
            "performance": { "ecs": true, "cacheBoost": true, "cnameFlattening": true },
            "web3": true
        },
        "rewrites": [],
        "setup": {
            "ipv4": ["45.90.28.0", "45.90.30.0"],
            "ipv6": [format!("2a07:a8c0::{id}"), format!("2a07:a8c1::{id}")],
            "linkedIp": {
                "servers": ["45.90.28.0", "45.90.30.0"],
                "ip": "203.0.113.10",
                "ddns": null,
                "updateToken": format!("token-{id}")
            },
            "dnscrypt": format!("sdns://mock-{id}")
        }
    })
}

async fn list_profiles(State(state): State<AppState>) -> Response {
    let db = state.db.read().await;
    let mut profiles: Vec<Value> = db
        .values()
        .map(|p| json!({ "id": p["id"], "fingerprint": p["fingerprint"], "name": p["name"] }))
        .collect();
    profiles.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));
    Json(json!({ "data": profiles, "meta": { "pagination": { "cursor": null } } })).into_response()
}

async fn create_profile(State(state): State<AppState>, body: Bytes) -> Reply {
    let patch = if body.is_empty() {
        json!({})
    } else {
        parse_body(&body)?
    };
    if !patch.is_object() {
        return Err(MockError::Invalid);
    }

    let id = short_id();
    let mut profile = default_profile(&id);
    merge(&mut profile, patch);
    profile["id"] = json!(id);

    state.db.write().await.insert(id.clone(), profile.clone());
    tracing::info!(profile = %id, "created profile");
    Ok(data(profile))
}

async fn get_profile(State(state): State<AppState>, Path(profile): Path<String>) -> Reply {
    get_object(state, profile, "").await
}

async fn update_profile(
    State(state): State<AppState>,
    Path(profile): Path<String>,
    body: Bytes,
) -> Reply {
    patch_object(state, profile, "", body).await
}

async fn delete_profile(State(state): State<AppState>, Path(profile): Path<String>) -> Reply {
    state
        .db
        .write()
        .await
        .remove(&profile)
        .ok_or(MockError::NotFound)?;
    tracing::info!(profile = %profile, "deleted profile");
    Ok(no_content())
}

async fn get_object(state: AppState, profile: String, pointer: &'static str) -> Reply {
    let db = state.db.read().await;
    let doc = db.get(&profile).ok_or(MockError::NotFound)?;
    let value = doc.pointer(pointer).ok_or(MockError::NotFound)?;
    Ok(data(value.clone()))
}

async fn patch_object(state: AppState, profile: String, pointer: &'static str, body: Bytes) -> Reply {
    let patch = parse_body(&body)?;
    if !patch.is_object() {
        return Err(MockError::Invalid);
    }
    let mut db = state.db.write().await;
    let doc = db.get_mut(&profile).ok_or(MockError::NotFound)?;
    let target = doc.pointer_mut(pointer).ok_or(MockError::NotFound)?;
    merge(target, patch);
    Ok(no_content())
}

fn entries_mut<'a>(
    db: &'a mut HashMap<String, Value>,
    profile: &str,
    pointer: &str,
) -> Result<&'a mut Vec<Value>, MockError> {
    db.get_mut(profile)
        .ok_or(MockError::NotFound)?
        .pointer_mut(pointer)
        .and_then(Value::as_array_mut)
        .ok_or(MockError::NotFound)
}

fn position(entries: &[Value], id: &str) -> Option<usize> {
    entries.iter().position(|e| e["id"].as_str() == Some(id))
}

async fn list_entries(state: AppState, profile: String, pointer: &'static str) -> Reply {
    let db = state.db.read().await;
    let entries = db
        .get(&profile)
        .ok_or(MockError::NotFound)?
        .pointer(pointer)
        .and_then(Value::as_array)
        .ok_or(MockError::NotFound)?;
    Ok(data(Value::Array(entries.clone())))
}

async fn replace_entries(
    state: AppState,
    profile: String,
    pointer: &'static str,
    body: Bytes,
) -> Reply {
    let Value::Array(replacement) = parse_body(&body)? else {
        return Err(MockError::Invalid);
    };
    if replacement.iter().any(|e| e["id"].as_str().is_none()) {
        return Err(MockError::Invalid);
    }
    let mut db = state.db.write().await;
    *entries_mut(&mut db, &profile, pointer)? = replacement;
    Ok(no_content())
}

async fn add_entry(state: AppState, profile: String, pointer: &'static str, body: Bytes) -> Reply {
    let entry = parse_body(&body)?;
    let id = entry["id"].as_str().ok_or(MockError::Invalid)?.to_string();
    let mut db = state.db.write().await;
    let entries = entries_mut(&mut db, &profile, pointer)?;
    if position(entries, &id).is_some() {
        return Err(MockError::Duplicate);
    }
    entries.push(entry.clone());
    Ok(data(entry))
}

async fn update_entry(
    state: AppState,
    profile: String,
    pointer: &'static str,
    id: String,
    body: Bytes,
) -> Reply {
    let patch = parse_body(&body)?;
    if !patch.is_object() {
        return Err(MockError::Invalid);
    }
    let mut db = state.db.write().await;
    let entries = entries_mut(&mut db, &profile, pointer)?;
    let index = position(entries, &id).ok_or(MockError::NotFound)?;
    merge(&mut entries[index], patch);
    entries[index]["id"] = json!(id);
    Ok(no_content())
}

async fn delete_entry(state: AppState, profile: String, pointer: &'static str, id: String) -> Reply {
    let mut db = state.db.write().await;
    let entries = entries_mut(&mut db, &profile, pointer)?;
    let index = position(entries, &id).ok_or(MockError::NotFound)?;
    entries.remove(index);
    Ok(no_content())
}

fn rewrite_type(content: &str) -> &'static str {
    match content.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => "A",
        Ok(IpAddr::V6(_)) => "AAAA",
        Err(_) => "CNAME",
    }
}

async fn create_rewrite(
    State(state): State<AppState>,
    Path(profile): Path<String>,
    body: Bytes,
) -> Reply {
    let input = parse_body(&body)?;
    let name = input["name"].as_str().ok_or(MockError::Required)?;
    let content = input["content"].as_str().ok_or(MockError::Required)?;
    let rewrite = json!({
        "id": short_id(),
        "name": name,
        "type": rewrite_type(content),
        "content": content,
    });

    let mut db = state.db.write().await;
    entries_mut(&mut db, &profile, "/rewrites")?.push(rewrite.clone());
    Ok(data(rewrite))
}

fn analytics_rows(kind: &str, params: &HashMap<String, String>) -> Result<Vec<Value>, MockError> {
    let rows = match kind {
        "status" => json!([
            { "status": "default", "queries": 9210 },
            { "status": "blocked", "queries": 1284 },
            { "status": "allowed", "queries": 36 }
        ]),
        "domains" => {
            let root = params.get("root").is_some_and(|v| v == "true");
            if root {
                json!([
                    { "domain": "apple.com", "queries": 512 },
                    { "domain": "google.com", "queries": 340 }
                ])
            } else {
                json!([
                    { "domain": "gateway.icloud.com", "root": "icloud.com", "queries": 410 },
                    { "domain": "www.google.com", "root": "google.com", "queries": 227 },
                    { "domain": "app-measurement.com", "root": "app-measurement.com", "queries": 96 }
                ])
            }
        }
        "reasons" => json!([
            { "id": "blocklist:nextdns-recommended", "name": "NextDNS Ads & Trackers Blocklist", "queries": 1050 },
            { "id": "native:apple", "name": "Native Tracking (Apple)", "queries": 234 }
        ]),
        "ips" => json!([
            {
                "ip": "198.51.100.24",
                "network": { "cellular": false, "vpn": false, "isp": "Example Telecom", "asn": 64500 },
                "geo": { "latitude": 48.8566, "longitude": 2.3522, "countryCode": "FR", "country": "France", "city": "Paris" },
                "queries": 8402
            }
        ]),
        "devices" => json!([
            { "id": "8TD1G", "name": "Laptop", "model": "apple:mac", "localIp": "192.168.1.20", "queries": 6120 },
            { "id": "__UNIDENTIFIED__", "queries": 310 }
        ]),
        "protocols" => json!([
            { "protocol": "DNS-over-HTTPS", "queries": 7450 },
            { "protocol": "UDP", "queries": 3080 }
        ]),
        "queryTypes" => json!([
            { "type": 1, "name": "A", "queries": 6020 },
            { "type": 28, "name": "AAAA", "queries": 3310 },
            { "type": 65, "name": "HTTPS", "queries": 1200 }
        ]),
        "ipVersions" => json!([
            { "version": 4, "queries": 7100 },
            { "version": 6, "queries": 3430 }
        ]),
        "dnssec" => json!([
            { "validated": false, "queries": 9020 },
            { "validated": true, "queries": 1510 }
        ]),
        "encryption" => json!([
            { "encrypted": true, "queries": 7450 },
            { "encrypted": false, "queries": 3080 }
        ]),
        "destinations" => match params.get("type").map(String::as_str) {
            Some("countries") => json!([
                { "code": "US", "domains": ["apple.com", "google.com"], "queries": 6230 },
                { "code": "FR", "domains": ["free.fr"], "queries": 1120 }
            ]),
            Some("gafam") => json!([
                { "company": "apple", "queries": 2210 },
                { "company": "google", "queries": 1890 },
                { "company": "others", "queries": 5400 }
            ]),
            Some(_) => return Err(MockError::Invalid),
            None => return Err(MockError::Required),
        },
        _ => return Err(MockError::NotFound),
    };
    match rows {
        Value::Array(rows) => Ok(rows),
        _ => Ok(Vec::new()),
    }
}

/// Canned rows per kind. The cursor is the offset of the next row.
async fn analytics(
    State(state): State<AppState>,
    Path((profile, kind)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    if !state.db.read().await.contains_key(&profile) {
        return Err(MockError::NotFound);
    }
    let rows = analytics_rows(&kind, &params)?;

    let offset = match params.get("cursor") {
        Some(cursor) => cursor.parse::<usize>().map_err(|_| MockError::Invalid)?,
        None => 0,
    };
    let limit = match params.get("limit") {
        Some(limit) => limit.parse::<usize>().map_err(|_| MockError::Invalid)?,
        None => rows.len(),
    };

    let end = offset.saturating_add(limit).min(rows.len());
    let page: Vec<Value> = rows.get(offset..end).unwrap_or_default().to_vec();
    let cursor = (end < rows.len()).then(|| end.to_string());

    Ok(Json(json!({
        "data": page,
        "meta": { "pagination": { "cursor": cursor } }
    }))
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_combines_nested_objects() {
        let mut target = json!({ "a": { "b": 1, "c": 2 }, "d": [1] });
        merge(&mut target, json!({ "a": { "c": 3 }, "d": [2, 3], "e": true }));
        assert_eq!(target, json!({ "a": { "b": 1, "c": 3 }, "d": [2, 3], "e": true }));
    }

    #[test]
    fn short_id_is_six_hex_chars() {
        let id = short_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn rewrite_type_follows_content() {
        assert_eq!(rewrite_type("10.0.0.1"), "A");
        assert_eq!(rewrite_type("fd00::1"), "AAAA");
        assert_eq!(rewrite_type("nas.lan"), "CNAME");
    }

    #[test]
    fn default_profile_has_every_section() {
        let profile = default_profile("abc123");
        for pointer in OBJECTS.iter().chain(COLLECTIONS).map(|(_, p)| *p) {
            assert!(profile.pointer(pointer).is_some(), "missing {pointer}");
        }
        assert!(profile["rewrites"].is_array());
    }

    #[test]
    fn destinations_require_type() {
        let params = HashMap::new();
        assert_eq!(
            analytics_rows("destinations", &params).unwrap_err(),
            MockError::Required
        );
    }

    #[test]
    fn duplicate_is_reported_with_ok_status() {
        let response = MockError::Duplicate.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
