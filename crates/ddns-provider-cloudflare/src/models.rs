//! Cloudflare API v4 wire types

use ddns_core::traits::{RecordUpdate, RemoteRecord, RemoteZone};
use serde::{Deserialize, Serialize};

/// Standard response envelope
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    /// Errors joined for logging
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "no error details".to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Pagination details of a listing
#[derive(Debug, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CfTokenStatus {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CfZone {
    pub id: String,
    pub name: String,
}

impl From<CfZone> for RemoteZone {
    fn from(zone: CfZone) -> Self {
        RemoteZone {
            id: zone.id,
            name: zone.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CfRecord {
    pub id: String,
    #[serde(default)]
    pub zone_id: Option<String>,
    pub name: String,
    pub r#type: String,
    pub content: String,
    #[serde(default)]
    pub proxied: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub ttl: Option<u32>,
}

impl From<CfRecord> for RemoteRecord {
    fn from(record: CfRecord) -> Self {
        RemoteRecord {
            id: record.id,
            zone_id: record.zone_id,
            name: record.name,
            record_type: record.r#type,
            content: record.content,
            proxied: record.proxied,
            comment: record.comment,
            ttl: record.ttl,
        }
    }
}

/// Body of a record overwrite
#[derive(Debug, Serialize)]
pub struct CfRecordBody<'a> {
    pub r#type: &'a str,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    pub proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

impl<'a> From<&'a RecordUpdate> for CfRecordBody<'a> {
    fn from(update: &'a RecordUpdate) -> Self {
        CfRecordBody {
            r#type: &update.record_type,
            name: &update.name,
            content: &update.content,
            ttl: update.ttl,
            proxied: update.proxied,
            comment: update.comment.as_deref(),
        }
    }
}
