use serde::{Deserialize, Serialize};

use super::Collection;
use crate::client::Client;
use crate::error::Result;

const ALLOWLIST_PATH: &str = "allowlist";

/// A domain on an allow or deny list.
///
/// `id` is the domain itself. It is left out of the body when empty, which
/// is how PATCH requests toggle `active` without renaming the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub active: bool,
}

impl DomainEntry {
    pub fn new(domain: impl Into<String>, active: bool) -> Self {
        Self {
            id: domain.into(),
            active,
        }
    }
}

pub type AllowlistEntry = DomainEntry;

#[derive(Debug, Clone)]
pub struct CreateAllowlistRequest {
    pub profile_id: String,
    pub allowlist: Vec<AllowlistEntry>,
}

#[derive(Debug, Clone)]
pub struct GetAllowlistRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct AddAllowlistRequest {
    pub profile_id: String,
    pub entry: AllowlistEntry,
}

#[derive(Debug, Clone)]
pub struct UpdateAllowlistRequest {
    pub profile_id: String,
    pub id: String,
    pub entry: AllowlistEntry,
}

#[derive(Debug, Clone)]
pub struct DeleteAllowlistRequest {
    pub profile_id: String,
    pub id: String,
}

pub struct AllowlistService<'a> {
    entries: Collection<'a>,
}

impl<'a> AllowlistService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            entries: Collection::new(client, ALLOWLIST_PATH),
        }
    }

    /// Replace the whole allowlist.
    pub fn create(&self, request: &CreateAllowlistRequest) -> Result<()> {
        self.entries.replace(&request.profile_id, &request.allowlist)
    }

    pub fn get(&self, request: &GetAllowlistRequest) -> Result<Vec<AllowlistEntry>> {
        self.entries.list(&request.profile_id)
    }

    pub fn add(&self, request: &AddAllowlistRequest) -> Result<()> {
        self.entries.add(&request.profile_id, &request.entry)
    }

    pub fn update(&self, request: &UpdateAllowlistRequest) -> Result<()> {
        self.entries
            .update(&request.profile_id, &request.id, &request.entry)
    }

    pub fn delete(&self, request: &DeleteAllowlistRequest) -> Result<()> {
        self.entries.delete(&request.profile_id, &request.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ErrorKind};
    use crate::http::HttpMethod;
    use crate::testing::{client_with, url, RecordingTransport};

    #[test]
    fn create_replaces_list_with_put() {
        let transport = RecordingTransport::new();
        transport.respond(204, "");
        let client = client_with(&transport);

        client
            .allowlist()
            .create(&CreateAllowlistRequest {
                profile_id: "abc123".to_string(),
                allowlist: vec![
                    DomainEntry::new("duckduckgo.com", true),
                    DomainEntry::new("google.com", false),
                ],
            })
            .unwrap();

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, url("profiles/abc123/allowlist"));
        assert_eq!(
            transport.last_body(),
            serde_json::json!([
                {"id": "duckduckgo.com", "active": true},
                {"id": "google.com", "active": false}
            ])
        );
    }

    #[test]
    fn get_decodes_entries() {
        let transport = RecordingTransport::new();
        transport.respond(
            200,
            r#"{"data":[{"id":"google.com","active":false},{"id":"duckduckgo.com","active":true}]}"#,
        );
        let client = client_with(&transport);

        let list = client
            .allowlist()
            .get(&GetAllowlistRequest {
                profile_id: "abc123".to_string(),
            })
            .unwrap();

        assert_eq!(
            list,
            vec![
                DomainEntry::new("google.com", false),
                DomainEntry::new("duckduckgo.com", true)
            ]
        );
    }

    #[test]
    fn update_patches_entry_without_id_in_body() {
        let transport = RecordingTransport::new();
        transport.respond(204, "");
        let client = client_with(&transport);

        client
            .allowlist()
            .update(&UpdateAllowlistRequest {
                profile_id: "abc123".to_string(),
                id: "duckduckgo.com".to_string(),
                entry: DomainEntry {
                    active: true,
                    ..DomainEntry::default()
                },
            })
            .unwrap();

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, url("profiles/abc123/allowlist/duckduckgo.com"));
        assert_eq!(transport.last_body(), serde_json::json!({"active": true}));
    }

    #[test]
    fn add_duplicate_reported_with_200_is_an_error() {
        let transport = RecordingTransport::new();
        transport.respond(
            200,
            r#"{"errors":[{"code":"duplicate","detail":"entry already exists"}]}"#,
        );
        let client = client_with(&transport);

        let err = client
            .allowlist()
            .add(&AddAllowlistRequest {
                profile_id: "abc123".to_string(),
                entry: DomainEntry::new("duckduckgo.com", true),
            })
            .unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::Request));
        assert_eq!(transport.last().method, HttpMethod::Post);
    }

    #[test]
    fn delete_requires_entry_id() {
        let transport = RecordingTransport::new();
        let client = client_with(&transport);

        let err = client
            .allowlist()
            .delete(&DeleteAllowlistRequest {
                profile_id: "abc123".to_string(),
                id: String::new(),
            })
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert!(transport.requests().is_empty());
    }
}
