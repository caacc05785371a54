//! Host bootstrap - composition root
//!
//! Wires the configured provider chain, the dependency context and the
//! plugin host into one explicitly constructed value. No hidden singletons:
//! everything process-scoped lives inside the [`HostContext`] returned here.
//!
//! ## Usage
//!
//! ```ignore
//! let config = ConfigLoader::new().load()?;
//! let host_context = init_host(config)?;
//!
//! let module = Module::collect("app");
//! host_context.host().start(&module)?;
//!
//! let timeout: u64 = host_context.context().resolve_key("cfg:timeout=30")?;
//! ```

use std::sync::Arc;

use latch_domain::chain::ProviderChain;
use latch_domain::error::{Error, Result};
use latch_domain::ports::provider::ConfigProvider;
use latch_domain::registry::resolve_config_provider;
use latch_providers::CachedProvider;
use tracing::{debug, info};

use crate::config::HostConfig;
use crate::context::DependencyContext;
use crate::host::PluginHost;

/// Composition root holding the wired host runtime
pub struct HostContext {
    config: Arc<HostConfig>,
    context: Arc<DependencyContext>,
    host: Arc<PluginHost>,
}

impl HostContext {
    /// The configuration this context was wired from
    pub fn config(&self) -> &Arc<HostConfig> {
        &self.config
    }

    /// The dependency resolution context
    pub fn context(&self) -> &Arc<DependencyContext> {
        &self.context
    }

    /// The plugin host
    pub fn host(&self) -> &Arc<PluginHost> {
        &self.host
    }
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("context", &self.context)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

/// Initialize the host runtime from configuration
///
/// Resolves every configured chain provider through the registry, applies
/// the cache decorator when enabled and hands out the composition root.
pub fn init_host(config: HostConfig) -> Result<HostContext> {
    info!("initialising host context");

    let config = Arc::new(config);

    // ========================================================================
    // Assemble the provider chain from configured providers
    // ========================================================================

    let mut chain = ProviderChain::new();
    for settings in &config.providers {
        let provider = resolve_config_provider(settings).map_err(|message| {
            Error::configuration(format!("provider '{}': {message}", settings.provider))
        })?;
        let provider: Arc<dyn ConfigProvider> = if config.cache.enabled {
            Arc::new(CachedProvider::new(provider))
        } else {
            provider
        };
        debug!(
            provider = provider.provider_name(),
            priority = settings.priority,
            "adding provider to chain"
        );
        chain.push(provider, settings.priority);
    }
    info!(
        providers = chain.len(),
        cache = config.cache.enabled,
        "assembled provider chain"
    );

    // ========================================================================
    // Create the dependency context and the plugin host over it
    // ========================================================================

    let context = Arc::new(DependencyContext::new(chain));
    let host = Arc::new(PluginHost::new(context.clone()));

    Ok(HostContext {
        config,
        context,
        host,
    })
}

/// Initialize a host runtime for testing
pub fn init_test_host() -> Result<HostContext> {
    init_host(HostConfig::default())
}
