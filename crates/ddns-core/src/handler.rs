//! Update request handling
//!
//! [`UpdateHandler`] runs one update request end to end:
//!
//! 1. decode credentials from the `Authorization` header
//! 2. parse the desired records from the query string
//! 3. reconcile them against the provider
//!
//! and turns the outcome into a status code and plain-text body. This is
//! the only place where errors become HTTP responses; the HTTP server just
//! copies the [`UpdateResponse`] out.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::reconciler::{ReconcileReport, Reconciler};
use crate::request::parse_update_request;
use http::{HeaderMap, StatusCode};
use tracing::{error, info, warn};

/// Body returned for unclassified failures
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Status and plain-text body to send back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpdateResponse {
    /// Successful update
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            body: "OK".to_string(),
        }
    }

    /// Map an error to a response without leaking unclassified detail
    pub fn from_error(err: &Error) -> Self {
        match err.public_message() {
            Some(message) => {
                warn!("Update rejected ({}): {}", err.status_code(), message);
                Self {
                    status: err.status_code(),
                    body: message,
                }
            }
            None => {
                error!("Update failed: {}", err);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: INTERNAL_ERROR_BODY.to_string(),
                }
            }
        }
    }
}

/// Orchestrates credential decoding, request parsing and reconciliation
pub struct UpdateHandler {
    reconciler: Reconciler,
}

impl UpdateHandler {
    /// Create a handler around a reconciler
    pub fn new(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    /// Handle one request given its raw query string and headers
    pub async fn handle(&self, query: Option<&str>, headers: &HeaderMap) -> UpdateResponse {
        match self.try_handle(query.unwrap_or_default(), headers).await {
            Ok(report) => {
                info!(
                    "Update succeeded via {}: {} updated, {} skipped",
                    self.reconciler.provider_name(),
                    report.updated(),
                    report.skipped()
                );
                UpdateResponse::ok()
            }
            Err(err) => UpdateResponse::from_error(&err),
        }
    }

    async fn try_handle(&self, query: &str, headers: &HeaderMap) -> Result<ReconcileReport> {
        let credentials = Credentials::from_headers(headers)?;
        let records = parse_update_request(query, headers)?;
        self.reconciler.reconcile(&credentials, &records).await
    }
}
