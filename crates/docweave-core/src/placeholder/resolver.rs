//! The resolver contract and its simple variants

use super::data::PlaceholderData;
use super::registry::CustomPlaceholderRegistry;
use crate::error::Result;
use crate::locale::Locale;
use std::collections::HashMap;
use std::sync::Arc;

/// Turns a placeholder path into data
///
/// `Ok(None)` is the not-found case and is never fatal. Implementations are
/// shared between the caller and the generation thread.
pub trait PlaceholderResolver: Send + Sync {
    fn resolve(&self, path: &str, locale: &Locale) -> Result<Option<PlaceholderData>>;
}

impl<R: PlaceholderResolver + ?Sized> PlaceholderResolver for Arc<R> {
    fn resolve(&self, path: &str, locale: &Locale) -> Result<Option<PlaceholderData>> {
        (**self).resolve(path, locale)
    }
}

/// Fixed path → data table
#[derive(Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, PlaceholderData>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, data: PlaceholderData) -> Self {
        self.entries.insert(path.to_string(), data);
        self
    }

    pub fn with_scalar(self, path: &str, value: &str) -> Self {
        self.with(path, PlaceholderData::scalar(value))
    }
}

impl PlaceholderResolver for StaticResolver {
    fn resolve(&self, path: &str, _locale: &Locale) -> Result<Option<PlaceholderData>> {
        Ok(self.entries.get(path).cloned())
    }
}

/// Resolves only the names a registry governs
pub struct RegistryResolver {
    registry: Arc<dyn CustomPlaceholderRegistry>,
}

impl RegistryResolver {
    pub fn new(registry: Arc<dyn CustomPlaceholderRegistry>) -> Self {
        Self { registry }
    }
}

impl PlaceholderResolver for RegistryResolver {
    fn resolve(&self, path: &str, _locale: &Locale) -> Result<Option<PlaceholderData>> {
        if self.registry.governs(path) {
            Ok(self.registry.resolve(path))
        } else {
            Ok(None)
        }
    }
}
