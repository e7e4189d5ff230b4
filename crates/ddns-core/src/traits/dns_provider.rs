// # DNS Provider Trait
//
// Defines the interface the reconciler uses to read and write provider state.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{Credentials, DnsProvider, RecordType};
//
// async fn show(provider: &dyn DnsProvider, creds: &Credentials) -> ddns_core::Result<()> {
//     for zone in provider.list_zones(creds).await? {
//         let records = provider
//             .list_records(creds, &zone.id, "home.example.com", RecordType::A)
//             .await?;
//         println!("{}: {} match(es)", zone.name, records.len());
//     }
//     Ok(())
// }
// ```

use crate::credentials::Credentials;
use crate::record::RecordType;
use async_trait::async_trait;
use std::fmt;

/// Token status as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// Token is valid and usable
    Active,
    /// Token was disabled by its owner
    Disabled,
    /// Token is past its expiry
    Expired,
    /// Any status this crate does not know about
    Other(String),
}

impl TokenStatus {
    /// Parse a provider status string
    pub fn from_status(status: &str) -> Self {
        match status {
            "active" => TokenStatus::Active,
            "disabled" => TokenStatus::Disabled,
            "expired" => TokenStatus::Expired,
            other => TokenStatus::Other(other.to_string()),
        }
    }

    /// Status string as reported by the provider
    pub fn as_str(&self) -> &str {
        match self {
            TokenStatus::Active => "active",
            TokenStatus::Disabled => "disabled",
            TokenStatus::Expired => "expired",
            TokenStatus::Other(status) => status,
        }
    }

    /// Whether the token may be used
    pub fn is_active(&self) -> bool {
        matches!(self, TokenStatus::Active)
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zone visible to the credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteZone {
    /// Provider zone identifier
    pub id: String,
    /// Zone apex name
    pub name: String,
}

/// An existing record at the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Provider record identifier
    pub id: String,
    /// Zone the record belongs to, when the provider reports it
    pub zone_id: Option<String>,
    /// Fully qualified record name
    pub name: String,
    /// Record type as reported by the provider
    pub record_type: String,
    /// Record content (the IP address for A/AAAA)
    pub content: String,
    /// Whether traffic is routed through the provider's edge
    pub proxied: Option<bool>,
    /// Free-form comment attached to the record
    pub comment: Option<String>,
    /// Time-to-live
    pub ttl: Option<u32>,
}

/// Full replacement body for an existing record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    /// Record name, as reported by the provider
    pub name: String,
    /// Record type, as reported by the provider
    pub record_type: String,
    /// New content
    pub content: String,
    /// Proxy flag carried over from the existing record
    pub proxied: bool,
    /// Comment carried over from the existing record
    pub comment: Option<String>,
    /// Time-to-live
    pub ttl: u32,
}

/// Trait for DNS provider implementations
///
/// Implementations are stateless between calls: credentials are passed with
/// every operation, so one instance serves all requests.
///
/// Providers must not retry, cache, or create records. Any transport or API
/// failure is returned as an error and ends the current request.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Ask the provider whether the token is usable
    async fn verify_token(&self, credentials: &Credentials) -> crate::Result<TokenStatus>;

    /// List every zone visible to the credential
    async fn list_zones(&self, credentials: &Credentials) -> crate::Result<Vec<RemoteZone>>;

    /// List records in `zone_id` whose name and type match exactly
    async fn list_records(
        &self,
        credentials: &Credentials,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> crate::Result<Vec<RemoteRecord>>;

    /// Replace an existing record
    async fn update_record(
        &self,
        credentials: &Credentials,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> crate::Result<RemoteRecord>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> crate::Result<Box<dyn DnsProvider>>;
}
