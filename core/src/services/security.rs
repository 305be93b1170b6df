use serde::{Deserialize, Serialize};

use super::{Collection, Document};
use crate::client::Client;
use crate::error::Result;

const SECURITY_PATH: &str = "security";
const SECURITY_TLDS_PATH: &str = "security/tlds";

/// Threat protection toggles. A PATCH sends every flag, so read the
/// current state first when changing a single one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Security {
    pub threat_intelligence_feeds: bool,
    pub ai_threat_detection: bool,
    pub google_safe_browsing: bool,
    pub cryptojacking: bool,
    pub dns_rebinding: bool,
    pub idn_homographs: bool,
    pub typosquatting: bool,
    pub dga: bool,
    pub nrd: bool,
    pub ddns: bool,
    pub parking: bool,
    pub csam: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tlds: Vec<SecurityTld>,
}

/// A blocked top-level domain, without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityTld {
    pub id: String,
}

impl SecurityTld {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone)]
pub struct GetSecurityRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSecurityRequest {
    pub profile_id: String,
    pub security: Security,
}

pub struct SecurityService<'a> {
    document: Document<'a>,
}

impl<'a> SecurityService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, SECURITY_PATH),
        }
    }

    pub fn get(&self, request: &GetSecurityRequest) -> Result<Security> {
        self.document.get(&request.profile_id)
    }

    pub fn update(&self, request: &UpdateSecurityRequest) -> Result<()> {
        self.document.update(&request.profile_id, &request.security)
    }
}

#[derive(Debug, Clone)]
pub struct CreateSecurityTldsRequest {
    pub profile_id: String,
    pub tlds: Vec<SecurityTld>,
}

#[derive(Debug, Clone)]
pub struct GetSecurityTldsRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct AddSecurityTldRequest {
    pub profile_id: String,
    pub tld: SecurityTld,
}

#[derive(Debug, Clone)]
pub struct DeleteSecurityTldRequest {
    pub profile_id: String,
    pub id: String,
}

pub struct SecurityTldsService<'a> {
    entries: Collection<'a>,
}

impl<'a> SecurityTldsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            entries: Collection::new(client, SECURITY_TLDS_PATH),
        }
    }

    pub fn create(&self, request: &CreateSecurityTldsRequest) -> Result<()> {
        self.entries.replace(&request.profile_id, &request.tlds)
    }

    pub fn get(&self, request: &GetSecurityTldsRequest) -> Result<Vec<SecurityTld>> {
        self.entries.list(&request.profile_id)
    }

    pub fn add(&self, request: &AddSecurityTldRequest) -> Result<()> {
        self.entries.add(&request.profile_id, &request.tld)
    }

    pub fn delete(&self, request: &DeleteSecurityTldRequest) -> Result<()> {
        self.entries.delete(&request.profile_id, &request.id)
    }
}
