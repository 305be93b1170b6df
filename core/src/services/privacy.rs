use serde::{Deserialize, Serialize};

use super::{Collection, Document};
use crate::client::Client;
use crate::error::Result;

const PRIVACY_PATH: &str = "privacy";
const PRIVACY_BLOCKLISTS_PATH: &str = "privacy/blocklists";
const PRIVACY_NATIVES_PATH: &str = "privacy/natives";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Privacy {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocklists: Vec<PrivacyBlocklist>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub natives: Vec<PrivacyNative>,
    pub disguised_trackers: bool,
    pub allow_affiliate: bool,
}

/// A tracker blocklist (`nextdns-recommended`, `oisd`, ...). Only `id` is
/// sent; the rest is filled in by the API on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyBlocklist {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
}

impl PrivacyBlocklist {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Native tracking protection for a vendor (`apple`, `windows`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyNative {
    pub id: String,
}

impl PrivacyNative {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone)]
pub struct GetPrivacyRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdatePrivacyRequest {
    pub profile_id: String,
    pub privacy: Privacy,
}

pub struct PrivacyService<'a> {
    document: Document<'a>,
}

impl<'a> PrivacyService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, PRIVACY_PATH),
        }
    }

    pub fn get(&self, request: &GetPrivacyRequest) -> Result<Privacy> {
        self.document.get(&request.profile_id)
    }

    pub fn update(&self, request: &UpdatePrivacyRequest) -> Result<()> {
        self.document.update(&request.profile_id, &request.privacy)
    }
}

#[derive(Debug, Clone)]
pub struct CreatePrivacyBlocklistsRequest {
    pub profile_id: String,
    pub blocklists: Vec<PrivacyBlocklist>,
}

#[derive(Debug, Clone)]
pub struct GetPrivacyBlocklistsRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct AddPrivacyBlocklistRequest {
    pub profile_id: String,
    pub blocklist: PrivacyBlocklist,
}

#[derive(Debug, Clone)]
pub struct DeletePrivacyBlocklistRequest {
    pub profile_id: String,
    pub id: String,
}

pub struct PrivacyBlocklistsService<'a> {
    entries: Collection<'a>,
}

impl<'a> PrivacyBlocklistsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            entries: Collection::new(client, PRIVACY_BLOCKLISTS_PATH),
        }
    }

    pub fn create(&self, request: &CreatePrivacyBlocklistsRequest) -> Result<()> {
        self.entries
            .replace(&request.profile_id, &request.blocklists)
    }

    pub fn get(&self, request: &GetPrivacyBlocklistsRequest) -> Result<Vec<PrivacyBlocklist>> {
        self.entries.list(&request.profile_id)
    }

    pub fn add(&self, request: &AddPrivacyBlocklistRequest) -> Result<()> {
        self.entries.add(&request.profile_id, &request.blocklist)
    }

    pub fn delete(&self, request: &DeletePrivacyBlocklistRequest) -> Result<()> {
        self.entries.delete(&request.profile_id, &request.id)
    }
}

#[derive(Debug, Clone)]
pub struct CreatePrivacyNativesRequest {
    pub profile_id: String,
    pub natives: Vec<PrivacyNative>,
}

#[derive(Debug, Clone)]
pub struct GetPrivacyNativesRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct AddPrivacyNativeRequest {
    pub profile_id: String,
    pub native: PrivacyNative,
}

#[derive(Debug, Clone)]
pub struct DeletePrivacyNativeRequest {
    pub profile_id: String,
    pub id: String,
}

pub struct PrivacyNativesService<'a> {
    entries: Collection<'a>,
}

impl<'a> PrivacyNativesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            entries: Collection::new(client, PRIVACY_NATIVES_PATH),
        }
    }

    pub fn create(&self, request: &CreatePrivacyNativesRequest) -> Result<()> {
        self.entries.replace(&request.profile_id, &request.natives)
    }

    pub fn get(&self, request: &GetPrivacyNativesRequest) -> Result<Vec<PrivacyNative>> {
        self.entries.list(&request.profile_id)
    }

    pub fn add(&self, request: &AddPrivacyNativeRequest) -> Result<()> {
        self.entries.add(&request.profile_id, &request.native)
    }

    pub fn delete(&self, request: &DeletePrivacyNativeRequest) -> Result<()> {
        self.entries.delete(&request.profile_id, &request.id)
    }
}
