use serde::{Deserialize, Serialize};

use super::Document;
use crate::client::Client;
use crate::error::Result;

const SETTINGS_PATH: &str = "settings";
const SETTINGS_LOGS_PATH: &str = "settings/logs";
const SETTINGS_BLOCK_PAGE_PATH: &str = "settings/blockPage";
const SETTINGS_PERFORMANCE_PATH: &str = "settings/performance";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<SettingsLogs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_page: Option<SettingsBlockPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<SettingsPerformance>,
    pub web3: bool,
}

/// Query log settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsLogs {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop: Option<LogsDrop>,
    /// Retention in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention: Option<u32>,
    /// Storage region (`us`, `eu`, `gb`, `ch`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Which parts of a query are left out of the logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsDrop {
    pub ip: bool,
    pub domain: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsBlockPage {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPerformance {
    pub ecs: bool,
    pub cache_boost: bool,
    pub cname_flattening: bool,
}

#[derive(Debug, Clone)]
pub struct GetSettingsRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSettingsRequest {
    pub profile_id: String,
    pub settings: Settings,
}

pub struct SettingsService<'a> {
    document: Document<'a>,
}

impl<'a> SettingsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, SETTINGS_PATH),
        }
    }

    pub fn get(&self, request: &GetSettingsRequest) -> Result<Settings> {
        self.document.get(&request.profile_id)
    }

    pub fn update(&self, request: &UpdateSettingsRequest) -> Result<()> {
        self.document.update(&request.profile_id, &request.settings)
    }
}

#[derive(Debug, Clone)]
pub struct GetSettingsLogsRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSettingsLogsRequest {
    pub profile_id: String,
    pub logs: SettingsLogs,
}

pub struct SettingsLogsService<'a> {
    document: Document<'a>,
}

impl<'a> SettingsLogsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, SETTINGS_LOGS_PATH),
        }
    }

    pub fn get(&self, request: &GetSettingsLogsRequest) -> Result<SettingsLogs> {
        self.document.get(&request.profile_id)
    }

    pub fn update(&self, request: &UpdateSettingsLogsRequest) -> Result<()> {
        self.document.update(&request.profile_id, &request.logs)
    }
}

#[derive(Debug, Clone)]
pub struct GetSettingsBlockPageRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSettingsBlockPageRequest {
    pub profile_id: String,
    pub block_page: SettingsBlockPage,
}

pub struct SettingsBlockPageService<'a> {
    document: Document<'a>,
}

impl<'a> SettingsBlockPageService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, SETTINGS_BLOCK_PAGE_PATH),
        }
    }

    pub fn get(&self, request: &GetSettingsBlockPageRequest) -> Result<SettingsBlockPage> {
        self.document.get(&request.profile_id)
    }

    pub fn update(&self, request: &UpdateSettingsBlockPageRequest) -> Result<()> {
        self.document
            .update(&request.profile_id, &request.block_page)
    }
}

#[derive(Debug, Clone)]
pub struct GetSettingsPerformanceRequest {
    pub profile_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSettingsPerformanceRequest {
    pub profile_id: String,
    pub performance: SettingsPerformance,
}

pub struct SettingsPerformanceService<'a> {
    document: Document<'a>,
}

impl<'a> SettingsPerformanceService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            document: Document::new(client, SETTINGS_PERFORMANCE_PATH),
        }
    }

    pub fn get(&self, request: &GetSettingsPerformanceRequest) -> Result<SettingsPerformance> {
        self.document.get(&request.profile_id)
    }

    pub fn update(&self, request: &UpdateSettingsPerformanceRequest) -> Result<()> {
        self.document
            .update(&request.profile_id, &request.performance)
    }
}
