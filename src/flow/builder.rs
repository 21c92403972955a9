use super::path::PathQueue;
use super::{Flow, Registry};
use crate::adapter::{ImmediateAdapter, PresentationAdapter};
use crate::config::FlowOptions;
use crate::logging::NavigationLogger;
use crate::presentation::PresentationConfiguration;
use crate::provider::Provider;
use crate::routing::Routing;
use ahash::AHashMap;
use std::sync::Arc;

/// Assembles a `Flow` from its providers, adapter, options and starting point.
pub struct FlowBuilder<R: Routing> {
    providers: AHashMap<R::DestinationType, Arc<dyn Provider<R>>>,
    fallback_provider: Option<Arc<dyn Provider<R>>>,
    adapter: Option<Box<dyn PresentationAdapter<R>>>,
    options: FlowOptions,
    logger: Option<NavigationLogger>,
    starting: Option<PresentationConfiguration<R>>,
}

impl<R: Routing> FlowBuilder<R> {
    pub fn new() -> Self {
        Self {
            providers: AHashMap::new(),
            fallback_provider: None,
            adapter: None,
            options: FlowOptions::default(),
            logger: None,
            starting: None,
        }
    }

    /// Registers the provider for one destination type. A later registration replaces an earlier one.
    pub fn with_provider(mut self, destination_type: R::DestinationType, provider: impl Provider<R> + 'static) -> Self {
        self.providers.insert(destination_type, Arc::new(provider));
        self
    }

    /// The provider used for every type without a dedicated one.
    pub fn with_fallback_provider(mut self, provider: impl Provider<R> + 'static) -> Self {
        self.fallback_provider = Some(Arc::new(provider));
        self
    }

    pub fn with_adapter(mut self, adapter: impl PresentationAdapter<R> + 'static) -> Self {
        self.adapter = Some(Box::new(adapter));
        self
    }

    pub fn with_options(mut self, options: FlowOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the logger that would otherwise be derived from the options.
    pub fn with_logger(mut self, logger: NavigationLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn start_with(mut self, configuration: PresentationConfiguration<R>) -> Self {
        self.starting = Some(configuration);
        self
    }

    pub fn start_with_path(self, steps: Vec<PresentationConfiguration<R>>) -> Self {
        self.start_with(PresentationConfiguration::path(steps))
    }

    pub fn build(self) -> Flow<R> {
        let logger = self
            .logger
            .unwrap_or_else(|| NavigationLogger::from_options(&self.options.logging));
        Flow {
            registry: Registry::new(),
            active: Vec::new(),
            current: None,
            root: None,
            providers: self.providers,
            fallback_provider: self.fallback_provider,
            adapter: self.adapter.unwrap_or_else(|| Box::new(ImmediateAdapter)),
            options: self.options,
            logger,
            starting: self.starting,
            pending: AHashMap::new(),
            signals: AHashMap::new(),
            path: PathQueue::default(),
            pumping: false,
            sequence: 0,
        }
    }
}

impl<R: Routing> Default for FlowBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
