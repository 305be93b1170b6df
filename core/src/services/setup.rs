use serde::{Deserialize, Serialize};

use super::Document;
use crate::client::Client;
use crate::error::Result;

const SETUP_PATH: &str = "setup";
const SETUP_LINKED_IP_PATH: &str = "setup/linkedip";

/// Endpoints a device uses to reach the profile. Read-only except for the
/// linked IP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Setup {
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_ip: Option<LinkedIp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnscrypt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkedIp {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// DDNS hostname kept in sync with the linked IP; `null` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ddns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetSetupRequest {
    pub profile_id: String,
}

pub struct SetupService<'a> {
    document: Document<'a>,
}

impl<'a> SetupService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, SETUP_PATH),
        }
    }

    pub fn get(&self, request: &GetSetupRequest) -> Result<Setup> {
        self.document.get(&request.profile_id)
    }
}

#[derive(Debug, Clone)]
pub struct GetSetupLinkedIpRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSetupLinkedIpRequest {
    pub profile_id: String,
    pub linked_ip: LinkedIp,
}

pub struct SetupLinkedIpService<'a> {
    document: Document<'a>,
}

impl<'a> SetupLinkedIpService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, SETUP_LINKED_IP_PATH),
        }
    }

    pub fn get(&self, request: &GetSetupLinkedIpRequest) -> Result<LinkedIp> {
        self.document.get(&request.profile_id)
    }

    pub fn update(&self, request: &UpdateSetupLinkedIpRequest) -> Result<()> {
        self.document.update(&request.profile_id, &request.linked_ip)
    }
}
