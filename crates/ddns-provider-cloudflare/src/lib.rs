// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare API v4 implementation of
// `ddns_core::DnsProvider`.
//
// - ✅ Credentials passed per call (one provider instance serves every request)
// - ✅ Shared HTTP client with a configurable timeout
// - ✅ Specific error handling for HTTP status codes (401/403, 404, 429, 5xx)
// - ✅ Pagination for zone and record listings
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (a failed call fails the request)
// - ❌ NO caching (zones and records are read fresh every request)
// - ❌ NO record creation
//
// ## Security Requirements
//
// - API tokens NEVER appear in logs or error messages
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Verify Token: GET `/user/tokens/verify`
// - List Zones: GET `/zones`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

mod models;

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::traits::{
    DnsProvider, DnsProviderFactory, RecordUpdate, RemoteRecord, RemoteZone, TokenStatus,
};
use ddns_core::{Credentials, Error, RecordType, Result};
use models::{ApiResponse, CfRecord, CfRecordBody, CfTokenStatus, CfZone};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Provider name used in errors and logs
const PROVIDER: &str = "cloudflare";

/// Page size for zone listings
const ZONES_PER_PAGE: u32 = 50;

/// Page size for record listings
const RECORDS_PER_PAGE: u32 = 100;

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (token check, zone and record lookups)
/// - Log the intended PUT payload
/// - **NOT** actually modify DNS records
#[derive(Debug)]
pub struct CloudflareProvider {
    /// API base URL, without trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_base`: API base URL (normally `https://api.cloudflare.com/client/v4`)
    /// - `timeout`: HTTP timeout applied to every API call
    /// - `dry_run`: If true, perform GET requests but skip PUT updates
    pub fn new(api_base: impl Into<String>, timeout: Duration, dry_run: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Send an authenticated request
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        credentials: &Credentials,
    ) -> Result<reqwest::Response> {
        request
            .bearer_auth(&credentials.token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))
    }

    /// Decode the API envelope of a response
    ///
    /// Non-success HTTP statuses are mapped to errors before the body is
    /// parsed. A 2xx envelope with `success: false` is a provider error.
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<ApiResponse<T>> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(error_for_status(status, &error_text, context));
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            Error::provider(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER,
                format!("{} failed: {}", context, envelope.error_summary()),
            ));
        }

        Ok(envelope)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        credentials: &Credentials,
        context: &str,
    ) -> Result<ApiResponse<T>> {
        let response = self.execute(request, credentials).await?;
        Self::decode(response, context).await
    }

    /// Fetch every page of a listing
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        path: &str,
        filters: &[(&str, &str)],
        per_page: u32,
        context: &str,
    ) -> Result<Vec<T>> {
        let url = self.url(path);
        let per_page = per_page.to_string();
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let page_param = page.to_string();
            let request = self
                .client
                .get(&url)
                .query(filters)
                .query(&[("page", page_param.as_str()), ("per_page", per_page.as_str())]);

            let envelope: ApiResponse<Vec<T>> = self.send(request, credentials, context).await?;
            let total_pages = envelope
                .result_info
                .as_ref()
                .and_then(|info| info.total_pages)
                .unwrap_or(1);

            let result = envelope.result.unwrap_or_default();
            let last_page_empty = result.is_empty();
            items.extend(result);

            if page >= total_pages || last_page_empty {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

/// Map a non-success HTTP status to an error
fn error_for_status(status: StatusCode, error_text: &str, context: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::provider(
            PROVIDER,
            format!(
                "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
                status
            ),
        ),
        404 => Error::provider(PROVIDER, format!("{}: not found. Status: {}", context, status)),
        429 => Error::provider(
            PROVIDER,
            format!("Rate limit exceeded. Please retry later. Status: {}", status),
        ),
        500..=599 => Error::provider(
            PROVIDER,
            format!("Cloudflare server error (transient): {} - {}", status, error_text),
        ),
        _ => Error::provider(
            PROVIDER,
            format!("{} failed: {} - {}", context, status, error_text),
        ),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// ```http
    /// GET /user/tokens/verify
    /// Authorization: Bearer <token>
    /// ```
    ///
    /// A token Cloudflare refuses outright (400/401/403) is reported as
    /// `Unauthenticated` (401 "Invalid API Token"), the same as a token that
    /// is not active. This departs from the general rule that provider
    /// failures are unclassified (generic 500); every other non-success
    /// status still goes through `error_for_status`.
    async fn verify_token(&self, credentials: &Credentials) -> Result<TokenStatus> {
        tracing::debug!("Verifying API token for {}", credentials.email);

        let request = self.client.get(self.url("/user/tokens/verify"));
        let response = self.execute(request, credentials).await?;
        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::info!(
                "Cloudflare rejected token for {}: {}",
                credentials.email,
                response.status()
            );
            return Err(Error::unauthenticated("Invalid API Token"));
        }

        let envelope: ApiResponse<CfTokenStatus> =
            Self::decode(response, "Token verification").await?;

        let status = envelope
            .result
            .map(|token| token.status)
            .ok_or_else(|| Error::provider(PROVIDER, "Invalid response format: missing token status"))?;

        tracing::debug!("Token status: {}", status);
        Ok(TokenStatus::from_status(&status))
    }

    /// ```http
    /// GET /zones?page=1&per_page=50
    /// ```
    async fn list_zones(&self, credentials: &Credentials) -> Result<Vec<RemoteZone>> {
        let zones: Vec<CfZone> = self
            .get_all_pages(credentials, "/zones", &[], ZONES_PER_PAGE, "Zone listing")
            .await?;

        tracing::debug!("Found {} zone(s)", zones.len());
        Ok(zones.into_iter().map(RemoteZone::from).collect())
    }

    /// ```http
    /// GET /zones/:zone_id/dns_records?name=home.example.com&type=A
    /// ```
    async fn list_records(
        &self,
        credentials: &Credentials,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<RemoteRecord>> {
        tracing::debug!(
            "Looking up records: {} (type: {}) in zone {}",
            name,
            record_type,
            zone_id
        );

        let path = format!("/zones/{}/dns_records", zone_id);
        let records: Vec<CfRecord> = self
            .get_all_pages(
                credentials,
                &path,
                &[("name", name), ("type", record_type.as_str())],
                RECORDS_PER_PAGE,
                "Record lookup",
            )
            .await?;

        Ok(records.into_iter().map(RemoteRecord::from).collect())
    }

    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "type": "A",
    ///   "name": "home.example.com",
    ///   "content": "198.51.100.9",
    ///   "ttl": 1,
    ///   "proxied": false,
    ///   "comment": "..."
    /// }
    /// ```
    async fn update_record(
        &self,
        credentials: &Credentials,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<RemoteRecord> {
        let url = self.url(&format!("/zones/{}/dns_records/{}", zone_id, record_id));
        let body = CfRecordBody::from(update);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&body)?
            );
            return Ok(RemoteRecord {
                id: record_id.to_string(),
                zone_id: Some(zone_id.to_string()),
                name: update.name.clone(),
                record_type: update.record_type.clone(),
                content: update.content.clone(),
                proxied: Some(update.proxied),
                comment: update.comment.clone(),
                ttl: Some(update.ttl),
            });
        }

        let request = self.client.put(&url).json(&body);
        let envelope: ApiResponse<CfRecord> =
            self.send(request, credentials, "Record update").await?;

        let record = envelope
            .result
            .ok_or_else(|| Error::provider(PROVIDER, "Invalid response format: missing record"))?;

        tracing::debug!("DNS record updated: {} -> {}", record.name, record.content);
        Ok(record.into())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Cloudflare {
                api_base,
                timeout_secs,
                dry_run,
            } => {
                config.validate()?;

                if *dry_run {
                    tracing::warn!(
                        "Cloudflare provider running in DRY-RUN mode - no changes will be made"
                    );
                }

                Ok(Box::new(CloudflareProvider::new(
                    api_base.clone(),
                    Duration::from_secs(*timeout_secs),
                    *dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for Cloudflare provider")),
        }
    }
}

/// Register the Cloudflare provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// ddns_provider_cloudflare::register(&registry);
/// assert!(registry.has_provider("cloudflare"));
/// ```
pub fn register(registry: &ddns_core::ProviderRegistry) {
    registry.register_provider(PROVIDER, Box::new(CloudflareFactory));
}
