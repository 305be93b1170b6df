use serde::{Deserialize, Serialize};

use super::{item_path, resource_path};
use crate::client::Client;
use crate::error::Result;
use crate::http::HttpMethod;

const REWRITES_PATH: &str = "rewrites";

/// A DNS rewrite: answer queries for `name` with `content`.
///
/// `kind` is derived by the API from `content` (`A`, `AAAA` or `CNAME`)
/// and is never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing)]
    pub kind: Option<String>,
    pub content: String,
}

impl Rewrite {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

/// The part of a create response the client needs.
#[derive(Deserialize)]
struct CreatedRewrite {
    id: String,
}

#[derive(Debug, Clone)]
pub struct CreateRewriteRequest {
    pub profile_id: String,
    pub rewrite: Rewrite,
}

#[derive(Debug, Clone)]
pub struct ListRewritesRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteRewriteRequest {
    pub profile_id: String,
    pub id: String,
}

pub struct RewritesService<'a> {
    client: &'a Client,
}

impl<'a> RewritesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a rewrite and return the ID the API assigned to it.
    pub fn create(&self, request: &CreateRewriteRequest) -> Result<String> {
        let path = resource_path(&request.profile_id, REWRITES_PATH)?;
        let req = self
            .client
            .request(HttpMethod::Post, &path)
            .json(&request.rewrite)?;
        let created: CreatedRewrite = self.client.fetch(req)?;
        Ok(created.id)
    }

    pub fn list(&self, request: &ListRewritesRequest) -> Result<Vec<Rewrite>> {
        let path = resource_path(&request.profile_id, REWRITES_PATH)?;
        self.client.fetch(self.client.request(HttpMethod::Get, &path))
    }

    pub fn delete(&self, request: &DeleteRewriteRequest) -> Result<()> {
        let path = item_path(&request.profile_id, REWRITES_PATH, &request.id)?;
        self.client.execute(self.client.request(HttpMethod::Delete, &path))
    }
}
