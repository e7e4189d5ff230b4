//! Test doubles and common utilities for reconciliation contract tests
//!
//! The mock provider serves a fixed set of zones and records and records
//! every call made against it, so tests can assert on exactly what the
//! reconciler sent.

#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, RecordUpdate, RemoteRecord, RemoteZone, TokenStatus};
use ddns_core::{Credentials, RecordType};
use http::{HeaderMap, HeaderValue};
use std::sync::Mutex;

/// A call made against the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    VerifyToken,
    ListZones,
    ListRecords {
        zone_id: String,
        name: String,
        record_type: RecordType,
    },
    UpdateRecord {
        zone_id: String,
        record_id: String,
        update: RecordUpdate,
    },
}

/// A DnsProvider backed by in-memory zones and records
pub struct MockDnsProvider {
    token_status: TokenStatus,
    zones: Vec<RemoteZone>,
    /// (zone id, record)
    records: Vec<(String, RemoteRecord)>,
    /// Fail every list_records call for this zone id
    failing_zone: Option<String>,
    calls: Mutex<Vec<ProviderCall>>,
    /// Credentials seen by verify_token
    seen_credentials: Mutex<Vec<Credentials>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            token_status: TokenStatus::Active,
            zones: Vec::new(),
            records: Vec::new(),
            failing_zone: None,
            calls: Mutex::new(Vec::new()),
            seen_credentials: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token_status(mut self, status: TokenStatus) -> Self {
        self.token_status = status;
        self
    }

    pub fn with_zone(mut self, id: &str, name: &str) -> Self {
        self.zones.push(RemoteZone {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_record(mut self, zone_id: &str, record: RemoteRecord) -> Self {
        self.records.push((zone_id.to_string(), record));
        self
    }

    pub fn failing_in_zone(mut self, zone_id: &str) -> Self {
        self.failing_zone = Some(zone_id.to_string());
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the update calls made so far
    pub fn updates(&self) -> Vec<(String, String, RecordUpdate)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::UpdateRecord {
                    zone_id,
                    record_id,
                    update,
                } => Some((zone_id, record_id, update)),
                _ => None,
            })
            .collect()
    }

    /// Number of list_records calls made so far
    pub fn list_records_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ProviderCall::ListRecords { .. }))
            .count()
    }

    pub fn seen_credentials(&self) -> Vec<Credentials> {
        self.seen_credentials.lock().unwrap().clone()
    }

    fn record_call(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn verify_token(&self, credentials: &Credentials) -> Result<TokenStatus> {
        self.record_call(ProviderCall::VerifyToken);
        self.seen_credentials
            .lock()
            .unwrap()
            .push(credentials.clone());
        Ok(self.token_status.clone())
    }

    async fn list_zones(&self, _credentials: &Credentials) -> Result<Vec<RemoteZone>> {
        self.record_call(ProviderCall::ListZones);
        Ok(self.zones.clone())
    }

    async fn list_records(
        &self,
        _credentials: &Credentials,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<RemoteRecord>> {
        self.record_call(ProviderCall::ListRecords {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
            record_type,
        });

        if self.failing_zone.as_deref() == Some(zone_id) {
            return Err(Error::provider("mock", "connection reset by peer"));
        }

        Ok(self
            .records
            .iter()
            .filter(|(zone, record)| {
                zone == zone_id && record.name == name && record.record_type == record_type.as_str()
            })
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn update_record(
        &self,
        _credentials: &Credentials,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<RemoteRecord> {
        self.record_call(ProviderCall::UpdateRecord {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
            update: update.clone(),
        });

        Ok(RemoteRecord {
            id: record_id.to_string(),
            zone_id: Some(zone_id.to_string()),
            name: update.name.clone(),
            record_type: update.record_type.clone(),
            content: update.content.clone(),
            proxied: Some(update.proxied),
            comment: update.comment.clone(),
            ttl: Some(update.ttl),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An existing record with no proxy flag and no comment
pub fn remote_record(id: &str, name: &str, record_type: &str, content: &str) -> RemoteRecord {
    RemoteRecord {
        id: id.to_string(),
        zone_id: None,
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        proxied: None,
        comment: None,
        ttl: Some(1),
    }
}

pub fn test_credentials() -> Credentials {
    Credentials::new("user@example.com", "test-token")
}

/// Headers carrying Basic credentials for `email:token`
pub fn auth_headers(email: &str, token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let value = format!("Basic {}", STANDARD.encode(format!("{}:{}", email, token)));
    headers.insert(
        http::header::AUTHORIZATION,
        HeaderValue::from_str(&value).unwrap(),
    );
    headers
}
