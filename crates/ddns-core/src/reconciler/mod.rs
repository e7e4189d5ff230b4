//! Record reconciliation
//!
//! The Reconciler makes the provider's address records match the records a
//! caller asked for:
//! - Verifying the token with the provider
//! - Enumerating the zones visible to the token
//! - Finding the one existing record per (zone, name, type)
//! - Replacing its content, keeping its proxy flag and comment
//!
//! ## Flow
//!
//! ```text
//! verify_token ──► list_zones ──► for record in desired:
//!                                   for zone in zones:
//!                                     list_records(zone, name, type)
//!                                       0 matches → skip
//!                                       1 match   → update_record
//!                                       n matches → Conflict (abort)
//! ```
//!
//! Every desired record is checked against every zone. Work is strictly
//! sequential and never rolled back: a conflict found late leaves earlier
//! updates in place. Records are never created.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::record::{DesiredRecord, RecordType};
use crate::traits::{DnsProvider, RecordUpdate, RemoteRecord, RemoteZone};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Events emitted by the Reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileEvent {
    /// Provider confirmed the token is active
    TokenVerified,

    /// Zones visible to the token
    ZonesListed { count: usize },

    /// No existing record matched, nothing was written
    RecordSkipped {
        name: String,
        record_type: RecordType,
        zone_id: String,
    },

    /// An existing record was updated
    RecordUpdated {
        name: String,
        record_type: RecordType,
        zone_id: String,
        record_id: String,
        content: String,
    },

    /// More than one existing record matched
    ConflictDetected {
        name: String,
        record_type: RecordType,
        zone_id: String,
        matches: usize,
    },

    /// All records processed
    Completed { updated: usize, skipped: usize },
}

/// What happened to one desired record in one zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    /// The existing record was updated
    Updated { record_id: String },
    /// No record matched
    Skipped,
}

/// Result of reconciling one desired record against one zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub name: String,
    pub record_type: RecordType,
    pub zone_id: String,
    pub zone_name: String,
    pub action: RecordAction,
}

/// Summary of a successful reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// One entry per (desired record, zone), in processing order
    pub outcomes: Vec<RecordOutcome>,
}

impl ReconcileReport {
    /// Number of records updated
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.action, RecordAction::Updated { .. }))
            .count()
    }

    /// Number of (record, zone) pairs skipped for lack of a match
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action == RecordAction::Skipped)
            .count()
    }
}

/// Reconciles desired records against a DNS provider
///
/// A single Reconciler is shared by all requests; it keeps no per-request
/// state.
pub struct Reconciler {
    /// DNS provider for reading and updating records
    provider: Arc<dyn DnsProvider>,

    /// Optional event sender for external monitoring
    event_tx: Option<mpsc::Sender<ReconcileEvent>>,
}

impl Reconciler {
    /// Create a reconciler without an event channel
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self {
            provider,
            event_tx: None,
        }
    }

    /// Create a reconciler that reports events on a bounded channel
    ///
    /// # Returns
    ///
    /// A tuple of (reconciler, event_receiver)
    pub fn with_events(
        provider: Arc<dyn DnsProvider>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<ReconcileEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let reconciler = Self {
            provider,
            event_tx: Some(tx),
        };
        (reconciler, rx)
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Bring the provider's records in line with `records`
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: every record was processed without conflict
    /// - `Err(Error::Unauthenticated)`: the token is not active
    /// - `Err(Error::NoZones)`: the token sees no zone
    /// - `Err(Error::Conflict)`: a (zone, name, type) had several matches
    /// - `Err(_)`: any provider failure, surfaced unchanged
    pub async fn reconcile(
        &self,
        credentials: &Credentials,
        records: &[DesiredRecord],
    ) -> Result<ReconcileReport> {
        let status = self.provider.verify_token(credentials).await?;
        if !status.is_active() {
            info!("Token for {} is not active: {}", credentials.email, status);
            return Err(Error::unauthenticated(format!(
                "This API Token is {}",
                status
            )));
        }
        self.emit_event(ReconcileEvent::TokenVerified);

        let zones = self.provider.list_zones(credentials).await?;
        if zones.is_empty() {
            info!("No zones visible to token for {}", credentials.email);
            return Err(Error::no_zones("No zones found"));
        }
        debug!("Token can see {} zone(s)", zones.len());
        self.emit_event(ReconcileEvent::ZonesListed { count: zones.len() });

        let mut report = ReconcileReport::default();
        for record in records {
            for zone in &zones {
                let outcome = self.reconcile_in_zone(credentials, record, zone).await?;
                report.outcomes.push(outcome);
            }
        }

        info!(
            "Reconciliation complete: {} updated, {} skipped",
            report.updated(),
            report.skipped()
        );
        self.emit_event(ReconcileEvent::Completed {
            updated: report.updated(),
            skipped: report.skipped(),
        });

        Ok(report)
    }

    /// Reconcile one desired record against one zone
    async fn reconcile_in_zone(
        &self,
        credentials: &Credentials,
        record: &DesiredRecord,
        zone: &RemoteZone,
    ) -> Result<RecordOutcome> {
        let mut matches = self
            .provider
            .list_records(credentials, &zone.id, &record.name, record.record_type)
            .await?;

        let outcome = |action| RecordOutcome {
            name: record.name.clone(),
            record_type: record.record_type,
            zone_id: zone.id.clone(),
            zone_name: zone.name.clone(),
            action,
        };

        if matches.len() > 1 {
            info!(
                "Found {} {} records named {} in zone {}",
                matches.len(),
                record.record_type,
                record.name,
                zone.name
            );
            self.emit_event(ReconcileEvent::ConflictDetected {
                name: record.name.clone(),
                record_type: record.record_type,
                zone_id: zone.id.clone(),
                matches: matches.len(),
            });
            return Err(Error::conflict(format!(
                "More than one matching record found for {} ({}) in zone {}",
                record.name, record.record_type, zone.name
            )));
        }

        let Some(existing) = matches.pop() else {
            info!(
                "No {} record named {} in zone {}, skipping",
                record.record_type, record.name, zone.name
            );
            self.emit_event(ReconcileEvent::RecordSkipped {
                name: record.name.clone(),
                record_type: record.record_type,
                zone_id: zone.id.clone(),
            });
            return Ok(outcome(RecordAction::Skipped));
        };

        let update = Self::update_for(&existing, record);
        self.provider
            .update_record(credentials, &zone.id, &existing.id, &update)
            .await?;

        info!(
            "Updated {} {} -> {} in zone {}",
            update.record_type, update.name, update.content, zone.name
        );
        self.emit_event(ReconcileEvent::RecordUpdated {
            name: record.name.clone(),
            record_type: record.record_type,
            zone_id: zone.id.clone(),
            record_id: existing.id.clone(),
            content: record.content.clone(),
        });

        Ok(outcome(RecordAction::Updated {
            record_id: existing.id,
        }))
    }

    /// Build the replacement body: new content, everything else carried over
    fn update_for(existing: &RemoteRecord, desired: &DesiredRecord) -> RecordUpdate {
        RecordUpdate {
            name: existing.name.clone(),
            record_type: existing.record_type.clone(),
            content: desired.content.clone(),
            proxied: existing.proxied.unwrap_or(false),
            comment: existing.comment.clone(),
            ttl: desired.ttl,
        }
    }

    /// Emit a reconcile event without ever blocking or failing the caller
    fn emit_event(&self, event: ReconcileEvent) {
        if let Some(tx) = &self.event_tx {
            if tx.try_send(event).is_err() {
                warn!("Reconcile event channel full or closed, dropping event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(proxied: Option<bool>, comment: Option<&str>) -> RemoteRecord {
        RemoteRecord {
            id: "rec1".to_string(),
            zone_id: Some("zone1".to_string()),
            name: "home.example.com".to_string(),
            record_type: "A".to_string(),
            content: "192.0.2.1".to_string(),
            proxied,
            comment: comment.map(str::to_string),
            ttl: Some(300),
        }
    }

    #[test]
    fn test_update_preserves_flags() {
        let desired = DesiredRecord::new("home.example.com", "198.51.100.9");
        let update = Reconciler::update_for(&remote(Some(true), Some("router")), &desired);

        assert_eq!(update.content, "198.51.100.9");
        assert!(update.proxied);
        assert_eq!(update.comment.as_deref(), Some("router"));
        assert_eq!(update.name, "home.example.com");
        assert_eq!(update.record_type, "A");
        assert_eq!(update.ttl, desired.ttl);
    }

    #[test]
    fn test_missing_proxied_defaults_to_false() {
        let desired = DesiredRecord::new("home.example.com", "198.51.100.9");
        let update = Reconciler::update_for(&remote(None, None), &desired);
        assert!(!update.proxied);
        assert!(update.comment.is_none());
    }

    #[test]
    fn test_report_counts() {
        let entry = |action| RecordOutcome {
            name: "a.example.com".to_string(),
            record_type: RecordType::A,
            zone_id: "z".to_string(),
            zone_name: "example.com".to_string(),
            action,
        };
        let report = ReconcileReport {
            outcomes: vec![
                entry(RecordAction::Updated {
                    record_id: "r1".to_string(),
                }),
                entry(RecordAction::Skipped),
                entry(RecordAction::Skipped),
            ],
        };
        assert_eq!(report.updated(), 1);
        assert_eq!(report.skipped(), 2);
    }
}
