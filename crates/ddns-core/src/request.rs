//! Update request parsing
//!
//! Turns the query string of an update request into the list of
//! [`DesiredRecord`]s to reconcile. Supported parameters:
//!
//! - `ip` (or `myip` when `ip` is absent): the address to publish, or `auto`
//!   to use the caller's address from the `CF-Connecting-IP` header
//! - `hostname`: comma-separated list of hostnames
//!
//! Hostnames are used verbatim: no trimming, validation or deduplication.

use crate::error::{Error, Result};
use crate::record::DesiredRecord;
use http::HeaderMap;
use tracing::info;

/// Header carrying the caller's observed address
pub const CLIENT_IP_HEADER: &str = "CF-Connecting-IP";

/// Sentinel `ip` value requesting client address detection
pub const AUTO_IP: &str = "auto";

/// Return the first value of `key` in a form-encoded query string
///
/// An empty value counts as absent.
fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Resolve the IP to publish from `ip`/`myip` and the client address header
pub fn resolve_ip(query: &str, headers: &HeaderMap) -> Result<String> {
    let ip = query_param(query, "ip")
        .or_else(|| query_param(query, "myip"))
        .ok_or_else(|| Error::invalid_input("Property 'ip' or 'myip' is required"))?;

    if ip != AUTO_IP {
        return Ok(ip);
    }

    let client_ip = headers
        .get(CLIENT_IP_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            Error::server("Request asked for ip=auto but client IP address cannot be determined")
        })?;

    info!("Resolved ip=auto to client address {}", client_ip);
    Ok(client_ip.to_string())
}

/// Parse an update request into desired records, in hostname order
pub fn parse_update_request(query: &str, headers: &HeaderMap) -> Result<Vec<DesiredRecord>> {
    let ip = resolve_ip(query, headers)?;

    let hostnames = query_param(query, "hostname")
        .ok_or_else(|| Error::invalid_input("Property 'hostname' is required"))?;

    Ok(hostnames
        .split(',')
        .map(|hostname| DesiredRecord::new(hostname, ip.as_str()))
        .collect())
}
