//! Plugin-based provider registry
//!
//! The registry allows DNS providers to be registered by name at startup,
//! so the daemon picks an adapter from configuration instead of a hardcoded
//! if-else chain.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_core::registry::ProviderRegistry;
//! use ddns_core::config::ProviderConfig;
//!
//! let registry = ProviderRegistry::new();
//! ddns_provider_cloudflare::register(&registry);
//!
//! let provider = registry.create_provider(&ProviderConfig::default())?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsProviderFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Provider registry for plugin-based DNS provider creation
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS provider factories
    providers: RwLock<HashMap<String, Box<dyn DnsProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory under `name`
    pub fn register_provider(&self, name: impl Into<String>, factory: Box<dyn DnsProviderFactory>) {
        let name = name.into();
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        providers.insert(name, factory);
    }

    /// Create a DNS provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: Created provider instance
    /// - `Err(Error)`: If provider type is not registered or creation fails
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        let provider_type = config.type_name();
        let providers = self
            .providers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config)
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        providers.keys().cloned().collect()
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProviderFactory;

    impl DnsProviderFactory for MockProviderFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
            Err(Error::Other("Mock provider not implemented".to_string()))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        // Initially empty
        assert!(!registry.has_provider("mock"));

        registry.register_provider("mock", Box::new(MockProviderFactory));

        assert!(registry.has_provider("mock"));
        assert!(registry.list_providers().contains(&"mock".to_string()));
    }

    #[test]
    fn test_unknown_provider_type() {
        let registry = ProviderRegistry::new();
        let result = registry.create_provider(&ProviderConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_factory_errors_propagate() {
        let registry = ProviderRegistry::new();
        registry.register_provider("mock", Box::new(MockProviderFactory));

        let config = ProviderConfig::Custom {
            factory: "mock".to_string(),
            config: serde_json::json!({}),
        };
        assert!(matches!(
            registry.create_provider(&config),
            Err(Error::Other(_))
        ));
    }
}
