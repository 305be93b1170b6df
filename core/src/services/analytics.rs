//! Aggregated query statistics under `profiles/{id}/analytics/{kind}`.
//!
//! Every endpoint takes the same [`AnalyticsQuery`] filter and returns a
//! [`Page`] of rows; pass `page.cursor` back in the next query to continue.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::resource_path;
use crate::client::Client;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::response::Page;

/// Device filter value selecting queries from devices that were not
/// identified.
pub const UNIDENTIFIED_DEVICE: &str = "__UNIDENTIFIED__";

/// Filters shared by every analytics endpoint. Unset fields are not sent.
///
/// `from` and `to` accept anything the API does: ISO 8601 dates, unix
/// timestamps or relative offsets such as `-7d`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub device: Option<String>,
}

impl AnalyticsQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = &self.from {
            pairs.push(("from", from.clone()));
        }
        if let Some(to) = &self.to {
            pairs.push(("to", to.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor", cursor.clone()));
        }
        if let Some(device) = &self.device {
            pairs.push(("device", device.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsRequest {
    pub profile_id: String,
    pub query: AnalyticsQuery,
}

#[derive(Debug, Clone, Default)]
pub struct DomainsAnalyticsRequest {
    pub profile_id: String,
    /// `default`, `blocked` or `allowed`.
    pub status: Option<String>,
    /// Aggregate by registrable domain instead of the full name.
    pub root: bool,
    pub query: AnalyticsQuery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DestinationType {
    #[default]
    Countries,
    Gafam,
}

impl DestinationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::Gafam => "gafam",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DestinationsAnalyticsRequest {
    pub profile_id: String,
    pub destination_type: DestinationType,
    pub query: AnalyticsQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAnalytics {
    pub status: String,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainsAnalytics {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonsAnalytics {
    pub id: String,
    pub name: String,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpsAnalytics {
    pub ip: String,
    #[serde(default)]
    pub network: IpNetwork,
    #[serde(default)]
    pub geo: IpGeo,
    pub queries: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpNetwork {
    pub cellular: bool,
    pub vpn: bool,
    pub isp: String,
    pub asn: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpGeo {
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: String,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesAnalytics {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_ip: Option<String>,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolsAnalytics {
    pub protocol: String,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTypesAnalytics {
    /// Numeric DNS record type (1 = A, 28 = AAAA, ...).
    #[serde(rename = "type")]
    pub query_type: u16,
    #[serde(default)]
    pub name: String,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpVersionsAnalytics {
    pub version: u8,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnssecAnalytics {
    #[serde(alias = "validated")]
    pub dnssec: bool,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionAnalytics {
    pub encrypted: bool,
    pub queries: u64,
}

/// A country (`code`, plus the domains resolved there) or a GAFAM
/// `company`, depending on the requested [`DestinationType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationsAnalytics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub queries: u64,
}

pub struct AnalyticsService<'a> {
    client: &'a Client,
}

impl<'a> AnalyticsService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn page<T: DeserializeOwned>(
        &self,
        profile_id: &str,
        kind: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<Page<T>> {
        let path = resource_path(profile_id, &format!("analytics/{kind}"))?;
        let request = self.client.request(HttpMethod::Get, &path).with_query(params);
        self.client.fetch_page(request)
    }

    pub fn status(&self, request: &AnalyticsRequest) -> Result<Page<StatusAnalytics>> {
        self.page(&request.profile_id, "status", request.query.to_pairs())
    }

    pub fn domains(&self, request: &DomainsAnalyticsRequest) -> Result<Page<DomainsAnalytics>> {
        let mut params = request.query.to_pairs();
        if let Some(status) = &request.status {
            params.push(("status", status.clone()));
        }
        if request.root {
            params.push(("root", "true".to_string()));
        }
        self.page(&request.profile_id, "domains", params)
    }

    pub fn reasons(&self, request: &AnalyticsRequest) -> Result<Page<ReasonsAnalytics>> {
        self.page(&request.profile_id, "reasons", request.query.to_pairs())
    }

    pub fn ips(&self, request: &AnalyticsRequest) -> Result<Page<IpsAnalytics>> {
        self.page(&request.profile_id, "ips", request.query.to_pairs())
    }

    pub fn devices(&self, request: &AnalyticsRequest) -> Result<Page<DevicesAnalytics>> {
        self.page(&request.profile_id, "devices", request.query.to_pairs())
    }

    pub fn protocols(&self, request: &AnalyticsRequest) -> Result<Page<ProtocolsAnalytics>> {
        self.page(&request.profile_id, "protocols", request.query.to_pairs())
    }

    pub fn query_types(&self, request: &AnalyticsRequest) -> Result<Page<QueryTypesAnalytics>> {
        self.page(&request.profile_id, "queryTypes", request.query.to_pairs())
    }

    pub fn ip_versions(&self, request: &AnalyticsRequest) -> Result<Page<IpVersionsAnalytics>> {
        self.page(&request.profile_id, "ipVersions", request.query.to_pairs())
    }

    pub fn dnssec(&self, request: &AnalyticsRequest) -> Result<Page<DnssecAnalytics>> {
        self.page(&request.profile_id, "dnssec", request.query.to_pairs())
    }

    pub fn encryption(&self, request: &AnalyticsRequest) -> Result<Page<EncryptionAnalytics>> {
        self.page(&request.profile_id, "encryption", request.query.to_pairs())
    }

    pub fn destinations(
        &self,
        request: &DestinationsAnalyticsRequest,
    ) -> Result<Page<DestinationsAnalytics>> {
        let mut params = request.query.to_pairs();
        params.push(("type", request.destination_type.as_str().to_string()));
        self.page(&request.profile_id, "destinations", params)
    }
}
