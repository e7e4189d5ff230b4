//! Configuration types for the DDNS update endpoint
//!
//! Nothing here is per-request: credentials arrive with each request, so the
//! configuration only describes how to reach the provider and where to
//! listen.
//!
//! The daemon builds these from environment variables and only ever selects
//! [`ProviderConfig::Cloudflare`]. The serde derives and
//! [`ProviderConfig::Custom`] are for library use: an embedding program can
//! load a `DdnsConfig` from its own file format and register further
//! factories on a [`ProviderRegistry`](crate::registry::ProviderRegistry)
//! under the `factory` name.

use serde::{Deserialize, Serialize};

/// Cloudflare API base URL
pub const DEFAULT_CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Main DDNS configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// DNS provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl DdnsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.server.validate()?;
        self.provider.validate()?;
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Capacity of the reconcile event channel
    ///
    /// When full, events are dropped with a warning; requests are never
    /// slowed down by event consumers.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl ServerConfig {
    /// Validate the server configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(crate::Error::config(format!(
                "Invalid listen address: {}",
                self.listen_addr
            )));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config(
                "Event channel capacity must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// API base URL
        #[serde(default = "default_cloudflare_api_base")]
        api_base: String,
        /// HTTP timeout for API requests, in seconds
        #[serde(default = "default_http_timeout_secs")]
        timeout_secs: u64,
        /// Perform reads only and log the writes that would happen
        #[serde(default)]
        dry_run: bool,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare {
                api_base,
                timeout_secs,
                ..
            } => {
                if !api_base.starts_with("https://") && !api_base.starts_with("http://") {
                    return Err(crate::Error::config(format!(
                        "Cloudflare API base must use HTTP or HTTPS scheme. Got: {}",
                        api_base
                    )));
                }
                if !(1..=300).contains(timeout_secs) {
                    return Err(crate::Error::config(format!(
                        "HTTP timeout must be between 1 and 300 seconds. Got: {}",
                        timeout_secs
                    )));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Cloudflare {
            api_base: default_cloudflare_api_base(),
            timeout_secs: default_http_timeout_secs(),
            dry_run: false,
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_event_channel_capacity() -> usize {
    1000
}

fn default_cloudflare_api_base() -> String {
    DEFAULT_CLOUDFLARE_API_BASE.to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DdnsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.type_name(), "cloudflare");
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: DdnsConfig = serde_json::from_str(
            r#"{ "provider": { "type": "cloudflare", "dry_run": true } }"#,
        )
        .unwrap();

        match config.provider {
            ProviderConfig::Cloudflare {
                api_base,
                timeout_secs,
                dry_run,
            } => {
                assert_eq!(api_base, DEFAULT_CLOUDFLARE_API_BASE);
                assert_eq!(timeout_secs, 30);
                assert!(dry_run);
            }
            other => panic!("unexpected provider config: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        let provider = ProviderConfig::Cloudflare {
            api_base: "ftp://example.com".to_string(),
            timeout_secs: 30,
            dry_run: false,
        };
        assert!(provider.validate().is_err());

        let provider = ProviderConfig::Cloudflare {
            api_base: DEFAULT_CLOUDFLARE_API_BASE.to_string(),
            timeout_secs: 0,
            dry_run: false,
        };
        assert!(provider.validate().is_err());

        let server = ServerConfig {
            listen_addr: "not an address".to_string(),
            ..ServerConfig::default()
        };
        assert!(server.validate().is_err());
    }

    #[test]
    fn test_deserialize_custom_provider() {
        let config: DdnsConfig = serde_json::from_str(
            r#"{
                "server": { "listen_addr": "127.0.0.1:9000" },
                "provider": { "type": "custom", "factory": "acme", "config": { "zone": "x" } }
            }"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.provider.type_name(), "acme");
        assert_eq!(config.server.event_channel_capacity, 1000);
    }

    #[test]
    fn test_custom_provider() {
        let provider = ProviderConfig::Custom {
            factory: "mock".to_string(),
            config: serde_json::json!({}),
        };
        assert!(provider.validate().is_ok());
        assert_eq!(provider.type_name(), "mock");
    }
}
