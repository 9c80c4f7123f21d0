//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::placement::SignaturePlacer;
use crate::processor::DocumentProcessor;
use crate::signature::{HttpFetcher, SignatureGenerator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    generator: SignatureGenerator,
    processor: DocumentProcessor,
}

impl AppState {
    /// Create a new application state around an HTTP fetcher
    pub fn new(config: Config, fetcher: Arc<dyn HttpFetcher>) -> Self {
        let generator = SignatureGenerator::new(fetcher.clone(), config.signature_api.base_url.clone());
        let processor = DocumentProcessor::new(fetcher, SignaturePlacer::new(config.placement));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                generator,
                processor,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the signature generator
    pub fn generator(&self) -> &SignatureGenerator {
        &self.inner.generator
    }

    /// Get the document processor
    pub fn processor(&self) -> &DocumentProcessor {
        &self.inner.processor
    }
}
