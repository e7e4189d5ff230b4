//! Core traits for the DDNS update endpoint
//!
//! - [`DnsProvider`]: Read and update DNS records via provider APIs

pub mod dns_provider;

pub use dns_provider::{
    DnsProvider, DnsProviderFactory, RecordUpdate, RemoteRecord, RemoteZone, TokenStatus,
};
