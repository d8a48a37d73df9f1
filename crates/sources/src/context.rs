//! Per-worker shared context.
//!
//! One `SiteContext` is built at worker start-up and handed by reference to
//! every component that needs site settings. Nothing is looked up through
//! global state.

use model::{AppConfig, Result, SiteConfig, UnaffordablePolicy};

#[derive(Debug, Clone)]
pub struct SiteContext {
    site: SiteConfig,
    lenient_filters: bool,
    on_unaffordable: UnaffordablePolicy,
}

impl SiteContext {
    /// Build the context for `site_name` out of the loaded configuration
    pub fn from_config(config: &AppConfig, site_name: &str) -> Result<Self> {
        let site = config.site(site_name)?.clone();
        Ok(Self {
            site,
            lenient_filters: config.lenient_filters,
            on_unaffordable: config.on_unaffordable,
        })
    }

    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            lenient_filters: false,
            on_unaffordable: UnaffordablePolicy::default(),
        }
    }

    pub fn with_lenient_filters(mut self, lenient: bool) -> Self {
        self.lenient_filters = lenient;
        self
    }

    pub fn with_unaffordable_policy(mut self, policy: UnaffordablePolicy) -> Self {
        self.on_unaffordable = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.site.name
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn lenient_filters(&self) -> bool {
        self.lenient_filters
    }

    pub fn on_unaffordable(&self) -> UnaffordablePolicy {
        self.on_unaffordable
    }
}
