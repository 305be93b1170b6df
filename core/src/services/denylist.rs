use super::{Collection, DomainEntry};
use crate::client::Client;
use crate::error::Result;

const DENYLIST_PATH: &str = "denylist";

pub type DenylistEntry = DomainEntry;

#[derive(Debug, Clone)]
pub struct CreateDenylistRequest {
    pub profile_id: String,
    pub denylist: Vec<DenylistEntry>,
}

#[derive(Debug, Clone)]
pub struct GetDenylistRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct AddDenylistRequest {
    pub profile_id: String,
    pub entry: DenylistEntry,
}

#[derive(Debug, Clone)]
pub struct UpdateDenylistRequest {
    pub profile_id: String,
    pub id: String,
    pub entry: DenylistEntry,
}

#[derive(Debug, Clone)]
pub struct DeleteDenylistRequest {
    pub profile_id: String,
    pub id: String,
}

pub struct DenylistService<'a> {
    entries: Collection<'a>,
}

impl<'a> DenylistService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            entries: Collection::new(client, DENYLIST_PATH),
        }
    }

    /// Replace the whole denylist.
    pub fn create(&self, request: &CreateDenylistRequest) -> Result<()> {
        self.entries.replace(&request.profile_id, &request.denylist)
    }

    pub fn get(&self, request: &GetDenylistRequest) -> Result<Vec<DenylistEntry>> {
        self.entries.list(&request.profile_id)
    }

    pub fn add(&self, request: &AddDenylistRequest) -> Result<()> {
        self.entries.add(&request.profile_id, &request.entry)
    }

    pub fn update(&self, request: &UpdateDenylistRequest) -> Result<()> {
        self.entries
            .update(&request.profile_id, &request.id, &request.entry)
    }

    pub fn delete(&self, request: &DeleteDenylistRequest) -> Result<()> {
        self.entries.delete(&request.profile_id, &request.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{client_with, url, RecordingTransport};

    #[test]
    fn get_uses_denylist_path() {
        let transport = RecordingTransport::new();
        transport.respond(200, r#"{"data":[{"id":"tracker.example","active":true}]}"#);
        let client = client_with(&transport);

        let list = client
            .denylist()
            .get(&GetDenylistRequest {
                profile_id: "abc123".to_string(),
            })
            .unwrap();

        assert_eq!(transport.last().url, url("profiles/abc123/denylist"));
        assert_eq!(list, vec![DomainEntry::new("tracker.example", true)]);
    }

    #[test]
    fn add_posts_single_entry() {
        let transport = RecordingTransport::new();
        transport.respond(200, r#"{"data":{"id":"ads.example","active":true}}"#);
        let client = client_with(&transport);

        client
            .denylist()
            .add(&AddDenylistRequest {
                profile_id: "abc123".to_string(),
                entry: DomainEntry::new("ads.example", true),
            })
            .unwrap();

        assert_eq!(transport.last().method, HttpMethod::Post);
        assert_eq!(
            transport.last_body(),
            serde_json::json!({"id": "ads.example", "active": true})
        );
    }

    #[test]
    fn delete_targets_entry() {
        let transport = RecordingTransport::new();
        transport.respond(204, "");
        let client = client_with(&transport);

        client
            .denylist()
            .delete(&DeleteDenylistRequest {
                profile_id: "abc123".to_string(),
                id: "ads.example".to_string(),
            })
            .unwrap();

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, url("profiles/abc123/denylist/ads.example"));
        assert!(req.body.is_none());
    }
}
