// # ddns-core
//
// Core library for the DDNS update endpoint.
//
// ## Architecture Overview
//
// A caller sends one HTTP request naming hostnames and an IP address; this
// library makes the provider's existing A/AAAA records point at that address:
// - **Credentials**: Decoded from the Basic-Auth style `Authorization` header
// - **Request parsing**: `ip`/`myip` and `hostname` query parameters → `DesiredRecord`s
// - **DnsProvider**: Trait for reading and updating records via provider APIs
// - **Reconciler**: Matches desired records against provider state and updates them
// - **UpdateHandler**: Runs the pipeline and maps errors to HTTP responses
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Stateless**: Zones and records are fetched fresh for every request
// 2. **Update-only**: Missing records are skipped, never created
// 3. **Preserving**: Only `content` changes; proxy flag and comment are kept
// 4. **Library-First**: The HTTP server is a thin wrapper around `UpdateHandler`

pub mod config;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod reconciler;
pub mod record;
pub mod registry;
pub mod request;
pub mod traits;

// Re-export core types for convenience
pub use config::{DdnsConfig, ProviderConfig, ServerConfig};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use handler::{UpdateHandler, UpdateResponse};
pub use reconciler::{ReconcileEvent, ReconcileReport, Reconciler};
pub use record::{DesiredRecord, RecordType};
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, RecordUpdate, RemoteRecord, RemoteZone, TokenStatus};
