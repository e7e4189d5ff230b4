// # ddnsd - DDNS update endpoint daemon
//
// This is a THIN integration layer: all credential, parsing and
// reconciliation logic lives in ddns-core.
//
// The ddnsd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Registering providers and creating the configured one
// 4. Serving update requests over HTTP until SIGINT/SIGTERM
//
// ## Configuration
//
// All configuration is done via environment variables. Credentials are
// NOT configured here: every request carries its own.
//
// - `DDNS_LISTEN_ADDR`: Socket address to bind (default 0.0.0.0:8080)
// - `DDNS_PROVIDER_TYPE`: Provider type (cloudflare)
// - `DDNS_PROVIDER_API_BASE`: Provider API base URL
// - `DDNS_HTTP_TIMEOUT_SECS`: Provider HTTP timeout (default 30)
// - `DDNS_MODE`: `dry-run` to skip provider writes
// - `DDNS_EVENT_CHANNEL_CAPACITY`: Reconcile event buffer (default 1000)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export DDNS_LISTEN_ADDR=127.0.0.1:8080
// ddnsd
//
// curl -u 'me@example.com:<api token>' \
//   'http://127.0.0.1:8080/?ip=auto&hostname=home.example.com'
// ```

mod app;

use anyhow::Result;
use ddns_core::config::DEFAULT_CLOUDFLARE_API_BASE;
use ddns_core::{DdnsConfig, ProviderConfig, ProviderRegistry, Reconciler, ServerConfig, UpdateHandler};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    listen_addr: String,
    provider_type: String,
    provider_api_base: String,
    http_timeout_secs: u64,
    dry_run: bool,
    event_channel_capacity: usize,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let http_timeout_secs = match lookup("DDNS_HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| {
                anyhow::anyhow!("DDNS_HTTP_TIMEOUT_SECS must be a number. Got: {}", value)
            })?,
            None => 30,
        };

        let event_channel_capacity = match lookup("DDNS_EVENT_CHANNEL_CAPACITY") {
            Some(value) => value.parse().map_err(|_| {
                anyhow::anyhow!("DDNS_EVENT_CHANNEL_CAPACITY must be a number. Got: {}", value)
            })?,
            None => 1000,
        };

        Ok(Self {
            listen_addr: lookup("DDNS_LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            provider_type: lookup("DDNS_PROVIDER_TYPE").unwrap_or_else(|| "cloudflare".to_string()),
            provider_api_base: lookup("DDNS_PROVIDER_API_BASE")
                .unwrap_or_else(|| DEFAULT_CLOUDFLARE_API_BASE.to_string()),
            http_timeout_secs,
            dry_run: lookup("DDNS_MODE").unwrap_or_default().to_lowercase() == "dry-run",
            event_channel_capacity,
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.provider_type.as_str() {
            "cloudflare" => {}
            _ => anyhow::bail!(
                "DDNS_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: cloudflare",
                self.provider_type
            ),
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.to_ddns_config().validate()?;
        Ok(())
    }

    /// Core configuration derived from the environment
    fn to_ddns_config(&self) -> DdnsConfig {
        DdnsConfig {
            server: ServerConfig {
                listen_addr: self.listen_addr.clone(),
                event_channel_capacity: self.event_channel_capacity,
            },
            provider: ProviderConfig::Cloudflare {
                api_base: self.provider_api_base.clone(),
                timeout_secs: self.http_timeout_secs,
                dry_run: self.dry_run,
            },
        }
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon until a shutdown signal arrives
async fn run_daemon(config: Config) -> Result<()> {
    let ddns_config = config.to_ddns_config();

    let registry = ProviderRegistry::new();

    #[cfg(feature = "cloudflare")]
    {
        info!("Registering Cloudflare provider");
        ddns_provider_cloudflare::register(&registry);
    }

    let provider = registry.create_provider(&ddns_config.provider)?;
    info!(
        "Provider: {} (dry-run: {})",
        provider.provider_name(),
        config.dry_run
    );

    let (reconciler, mut events) = Reconciler::with_events(
        Arc::from(provider),
        ddns_config.server.event_channel_capacity,
    );

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!("Reconcile event: {:?}", event);
        }
    });

    let app = app::router(Arc::new(UpdateHandler::new(reconciler)));

    let listener = tokio::net::TcpListener::bind(&ddns_config.server.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match wait_for_shutdown().await {
                Ok(signal) => info!("Received shutdown signal: {}", signal),
                Err(e) => error!("Shutdown error: {}", e),
            }
        })
        .await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.provider_type, "cloudflare");
        assert_eq!(config.provider_api_base, DEFAULT_CLOUDFLARE_API_BASE);
        assert_eq!(config.http_timeout_secs, 30);
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
        assert_eq!(config.tracing_level(), Level::INFO);
    }

    #[test]
    fn test_dry_run_mode() {
        let config = config_from(&[("DDNS_MODE", "DRY-RUN")]).unwrap();
        assert!(config.dry_run);

        match config.to_ddns_config().provider {
            ProviderConfig::Cloudflare { dry_run, .. } => assert!(dry_run),
            other => panic!("unexpected provider config: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("DDNS_HTTP_TIMEOUT_SECS", "soon")]).is_err());

        let config = config_from(&[("DDNS_HTTP_TIMEOUT_SECS", "0")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("DDNS_PROVIDER_TYPE", "route53")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("DDNS_LOG_LEVEL", "loud")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("DDNS_LISTEN_ADDR", "localhost")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_mapping() {
        let config = config_from(&[("DDNS_LOG_LEVEL", "Debug")]).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.tracing_level(), Level::DEBUG);
    }
}
