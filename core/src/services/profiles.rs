use serde::{Deserialize, Serialize};

use super::{profile_path, AllowlistEntry, DenylistEntry, ParentalControl, Privacy, Rewrite,
    Security, Settings, Setup, PROFILES_PATH};
use crate::client::Client;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::response::Page;

/// A full profile. Every field is optional so the same type doubles as a
/// PATCH body: absent fields are left untouched by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Security>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parental_control: Option<ParentalControl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denylist: Option<Vec<DenylistEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<AllowlistEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrites: Option<Vec<Rewrite>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Setup>,
}

impl Profile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One row of the profile listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CreateProfileRequest {
    /// Initial settings; an empty profile gets the API defaults.
    pub profile: Profile,
}

#[derive(Debug, Clone)]
pub struct GetProfileRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListProfilesRequest {
    pub cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub profile_id: String,
    pub profile: Profile,
}

#[derive(Debug, Clone)]
pub struct DeleteProfileRequest {
    pub profile_id: String,
}

#[derive(Deserialize)]
struct CreatedProfile {
    id: String,
}

pub struct ProfilesService<'a> {
    client: &'a Client,
}

impl<'a> ProfilesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a profile and return its ID.
    pub fn create(&self, request: &CreateProfileRequest) -> Result<String> {
        let req = self
            .client
            .request(HttpMethod::Post, PROFILES_PATH)
            .json(&request.profile)?;
        let created: CreatedProfile = self.client.fetch(req)?;
        tracing::info!(profile = %created.id, "created profile");
        Ok(created.id)
    }

    pub fn get(&self, request: &GetProfileRequest) -> Result<Profile> {
        let path = profile_path(&request.profile_id)?;
        self.client.fetch(self.client.request(HttpMethod::Get, &path))
    }

    pub fn list(&self, request: &ListProfilesRequest) -> Result<Page<ProfileSummary>> {
        let req = self
            .client
            .request(HttpMethod::Get, PROFILES_PATH)
            .with_query(request.cursor.iter().map(|c| ("cursor", c.as_str())));
        self.client.fetch_page(req)
    }

    pub fn update(&self, request: &UpdateProfileRequest) -> Result<()> {
        let path = profile_path(&request.profile_id)?;
        let req = self
            .client
            .request(HttpMethod::Patch, &path)
            .json(&request.profile)?;
        self.client.execute(req)
    }

    pub fn delete(&self, request: &DeleteProfileRequest) -> Result<()> {
        let path = profile_path(&request.profile_id)?;
        self.client.execute(self.client.request(HttpMethod::Delete, &path))?;
        tracing::info!(profile = %request.profile_id, "deleted profile");
        Ok(())
    }
}
