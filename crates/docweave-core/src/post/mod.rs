//! Post-processing pipeline
//!
//! Hooks run once, after structural expansion has finished, strictly in
//! registration order. A failing hook is logged and skipped: the document is
//! already committed and generation still completes.

pub mod fetch;
pub mod remote_image;

pub use remote_image::{RemoteImagePostProcessor, REMOTE_IMAGE_KEYWORD};

use crate::error::{DocweaveError, Result};
use crate::placeholder::PlaceholderResolver;
use std::fmt;
use std::sync::Arc;

/// Hook invoked with the finished document `D`
pub trait PostProcessor<D>: Send + Sync {
    /// Name used in log lines and failure reports
    fn name(&self) -> &str;

    fn document_generation_finished(
        &self,
        document: &mut D,
        resolver: &dyn PlaceholderResolver,
    ) -> Result<()>;
}

/// Ordered list of hooks for one document type
pub struct PostProcessing<D> {
    processors: Vec<Arc<dyn PostProcessor<D>>>,
}

impl<D> PostProcessing<D> {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    pub fn add(&mut self, processor: Arc<dyn PostProcessor<D>>) -> &mut Self {
        self.processors.push(processor);
        self
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.processors.iter().map(|p| p.name())
    }

    /// Run every hook in order
    ///
    /// Returns the failures, each already logged, wrapped as
    /// [`DocweaveError::PostProcessingFailed`].
    pub fn run(&self, document: &mut D, resolver: &dyn PlaceholderResolver) -> Vec<DocweaveError> {
        let mut failures = Vec::new();
        for processor in &self.processors {
            tracing::debug!("Running post-processor {}", processor.name());
            if let Err(e) = processor.document_generation_finished(document, resolver) {
                let failure = DocweaveError::PostProcessingFailed {
                    hook: processor.name().to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!("{}", failure);
                failures.push(failure);
            }
        }
        failures
    }
}

impl<D> Default for PostProcessing<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for PostProcessing<D> {
    fn clone(&self) -> Self {
        Self {
            processors: self.processors.clone(),
        }
    }
}

impl<D> fmt::Debug for PostProcessing<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
