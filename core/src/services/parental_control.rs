use serde::{Deserialize, Serialize};

use super::{Collection, Document};
use crate::client::Client;
use crate::error::Result;

const PARENTAL_CONTROL_PATH: &str = "parentalControl";
const PARENTAL_CONTROL_SERVICES_PATH: &str = "parentalControl/services";
const PARENTAL_CONTROL_CATEGORIES_PATH: &str = "parentalControl/categories";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentalControl {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ParentalControlEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<ParentalControlEntry>,
    pub safe_search: bool,
    pub youtube_restricted_mode: bool,
    pub block_bypass: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recreation: Option<Recreation>,
}

/// A blocked service (`tiktok`, `fortnite`, ...) or category (`gambling`,
/// `social-networks`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentalControlEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub active: bool,
    /// Whether the entry is lifted during recreation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recreation: Option<bool>,
}

impl ParentalControlEntry {
    pub fn new(id: impl Into<String>, active: bool) -> Self {
        Self {
            id: id.into(),
            active,
            recreation: None,
        }
    }
}

/// Weekly windows during which recreation-flagged entries are unblocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recreation {
    pub times: RecreationTimes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecreationTimes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<TimeWindow>,
}

/// Local wall-clock window, `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

impl TimeWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetParentalControlRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateParentalControlRequest {
    pub profile_id: String,
    pub parental_control: ParentalControl,
}

pub struct ParentalControlService<'a> {
    document: Document<'a>,
}

impl<'a> ParentalControlService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, PARENTAL_CONTROL_PATH),
        }
    }

    pub fn get(&self, request: &GetParentalControlRequest) -> Result<ParentalControl> {
        self.document.get(&request.profile_id)
    }

    pub fn update(&self, request: &UpdateParentalControlRequest) -> Result<()> {
        self.document
            .update(&request.profile_id, &request.parental_control)
    }
}

#[derive(Debug, Clone)]
pub struct CreateParentalControlServicesRequest {
    pub profile_id: String,
    pub services: Vec<ParentalControlEntry>,
}

#[derive(Debug, Clone)]
pub struct GetParentalControlServicesRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct AddParentalControlServiceRequest {
    pub profile_id: String,
    pub service: ParentalControlEntry,
}

#[derive(Debug, Clone)]
pub struct UpdateParentalControlServiceRequest {
    pub profile_id: String,
    pub id: String,
    pub service: ParentalControlEntry,
}

#[derive(Debug, Clone)]
pub struct DeleteParentalControlServiceRequest {
    pub profile_id: String,
    pub id: String,
}

pub struct ParentalControlServicesService<'a> {
    entries: Collection<'a>,
}

impl<'a> ParentalControlServicesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            entries: Collection::new(client, PARENTAL_CONTROL_SERVICES_PATH),
        }
    }

    pub fn create(&self, request: &CreateParentalControlServicesRequest) -> Result<()> {
        self.entries.replace(&request.profile_id, &request.services)
    }

    pub fn get(
        &self,
        request: &GetParentalControlServicesRequest,
    ) -> Result<Vec<ParentalControlEntry>> {
        self.entries.list(&request.profile_id)
    }

    pub fn add(&self, request: &AddParentalControlServiceRequest) -> Result<()> {
        self.entries.add(&request.profile_id, &request.service)
    }

    pub fn update(&self, request: &UpdateParentalControlServiceRequest) -> Result<()> {
        self.entries
            .update(&request.profile_id, &request.id, &request.service)
    }

    pub fn delete(&self, request: &DeleteParentalControlServiceRequest) -> Result<()> {
        self.entries.delete(&request.profile_id, &request.id)
    }
}

#[derive(Debug, Clone)]
pub struct CreateParentalControlCategoriesRequest {
    pub profile_id: String,
    pub categories: Vec<ParentalControlEntry>,
}

#[derive(Debug, Clone)]
pub struct GetParentalControlCategoriesRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct AddParentalControlCategoryRequest {
    pub profile_id: String,
    pub category: ParentalControlEntry,
}

#[derive(Debug, Clone)]
pub struct UpdateParentalControlCategoryRequest {
    pub profile_id: String,
    pub id: String,
    pub category: ParentalControlEntry,
}

#[derive(Debug, Clone)]
pub struct DeleteParentalControlCategoryRequest {
    pub profile_id: String,
    pub id: String,
}

pub struct ParentalControlCategoriesService<'a> {
    entries: Collection<'a>,
}

impl<'a> ParentalControlCategoriesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            entries: Collection::new(client, PARENTAL_CONTROL_CATEGORIES_PATH),
        }
    }

    pub fn create(&self, request: &CreateParentalControlCategoriesRequest) -> Result<()> {
        self.entries
            .replace(&request.profile_id, &request.categories)
    }

    pub fn get(
        &self,
        request: &GetParentalControlCategoriesRequest,
    ) -> Result<Vec<ParentalControlEntry>> {
        self.entries.list(&request.profile_id)
    }

    pub fn add(&self, request: &AddParentalControlCategoryRequest) -> Result<()> {
        self.entries.add(&request.profile_id, &request.category)
    }

    pub fn update(&self, request: &UpdateParentalControlCategoryRequest) -> Result<()> {
        self.entries
            .update(&request.profile_id, &request.id, &request.category)
    }

    pub fn delete(&self, request: &DeleteParentalControlCategoryRequest) -> Result<()> {
        self.entries.delete(&request.profile_id, &request.id)
    }
}
