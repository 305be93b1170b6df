//! Resource services.
//!
//! Every service borrows the [`Client`] and follows the same convention:
//! validate identifiers, build a path under `profiles/{id}`, optionally
//! attach a JSON payload, and hand the request to the client's dispatcher.
//! List-shaped resources share [`Collection`].

mod allowlist;
mod analytics;
mod denylist;
mod parental_control;
mod privacy;
mod profiles;
mod rewrites;
mod security;
mod settings;
mod setup;

pub use allowlist::*;
pub use analytics::*;
pub use denylist::*;
pub use parental_control::*;
pub use privacy::*;
pub use profiles::*;
pub use rewrites::*;
pub use security::*;
pub use settings::*;
pub use setup::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::Client;
use crate::error::{ApiError, Result};
use crate::http::HttpMethod;

pub(crate) const PROFILES_PATH: &str = "profiles";

/// `profiles/{profile_id}`
pub(crate) fn profile_path(profile_id: &str) -> Result<String> {
    if profile_id.trim().is_empty() {
        return Err(ApiError::MissingProfile);
    }
    Ok(format!("{PROFILES_PATH}/{profile_id}"))
}

/// `profiles/{profile_id}/{resource}`
pub(crate) fn resource_path(profile_id: &str, resource: &str) -> Result<String> {
    Ok(format!("{}/{resource}", profile_path(profile_id)?))
}

/// `profiles/{profile_id}/{resource}/{id}`
pub(crate) fn item_path(profile_id: &str, resource: &str, id: &str) -> Result<String> {
    let base = resource_path(profile_id, resource)?;
    if id.trim().is_empty() {
        return Err(ApiError::InvalidRequest("missing entry id"));
    }
    Ok(format!("{base}/{id}"))
}

/// A list of entries nested under a profile.
///
/// `replace` overwrites the whole list, the other verbs act on one entry.
pub(crate) struct Collection<'a> {
    client: &'a Client,
    resource: &'static str,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(client: &'a Client, resource: &'static str) -> Self {
        Self { client, resource }
    }

    pub(crate) fn replace<T: Serialize>(&self, profile_id: &str, entries: &[T]) -> Result<()> {
        let path = resource_path(profile_id, self.resource)?;
        let request = self.client.request(HttpMethod::Put, &path).json(entries)?;
        self.client.execute(request)
    }

    pub(crate) fn list<T: DeserializeOwned>(&self, profile_id: &str) -> Result<Vec<T>> {
        let path = resource_path(profile_id, self.resource)?;
        self.client.fetch(self.client.request(HttpMethod::Get, &path))
    }

    pub(crate) fn add<T: Serialize>(&self, profile_id: &str, entry: &T) -> Result<()> {
        let path = resource_path(profile_id, self.resource)?;
        let request = self.client.request(HttpMethod::Post, &path).json(entry)?;
        self.client.execute(request)
    }

    pub(crate) fn update<T: Serialize>(&self, profile_id: &str, id: &str, entry: &T) -> Result<()> {
        let path = item_path(profile_id, self.resource, id)?;
        let request = self.client.request(HttpMethod::Patch, &path).json(entry)?;
        self.client.execute(request)
    }

    pub(crate) fn delete(&self, profile_id: &str, id: &str) -> Result<()> {
        let path = item_path(profile_id, self.resource, id)?;
        self.client.execute(self.client.request(HttpMethod::Delete, &path))
    }
}

/// A settings object nested under a profile, read with GET and changed
/// with PATCH.
pub(crate) struct Document<'a> {
    client: &'a Client,
    resource: &'static str,
}

impl<'a> Document<'a> {
    pub(crate) fn new(client: &'a Client, resource: &'static str) -> Self {
        Self { client, resource }
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, profile_id: &str) -> Result<T> {
        let path = resource_path(profile_id, self.resource)?;
        self.client.fetch(self.client.request(HttpMethod::Get, &path))
    }

    pub(crate) fn update<T: Serialize>(&self, profile_id: &str, patch: &T) -> Result<()> {
        let path = resource_path(profile_id, self.resource)?;
        let request = self.client.request(HttpMethod::Patch, &path).json(patch)?;
        self.client.execute(request)
    }
}
