//! Custom placeholder registry
//!
//! Consulted before any property access, so a registered name shadows a
//! bean property of the same name.

use super::custom::{CustomPlaceholder, TableOfContents};
use super::data::PlaceholderData;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub trait CustomPlaceholderRegistry: Send + Sync {
    fn governs(&self, name: &str) -> bool;

    fn resolve(&self, name: &str) -> Option<PlaceholderData>;
}

/// Registry that governs nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCustomPlaceholders;

impl CustomPlaceholderRegistry for NoCustomPlaceholders {
    fn governs(&self, _name: &str) -> bool {
        false
    }

    fn resolve(&self, _name: &str) -> Option<PlaceholderData> {
        None
    }
}

pub type PlaceholderFactory = Arc<dyn Fn() -> Arc<dyn CustomPlaceholder> + Send + Sync>;

/// Name → factory registry
///
/// Every resolution asks the factory for a fresh placeholder.
#[derive(Clone, Default)]
pub struct CustomPlaceholderRegistryImpl {
    factories: HashMap<String, PlaceholderFactory>,
}

impl CustomPlaceholderRegistryImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `toc` (table of contents)
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("toc", || TableOfContents);
        registry
    }

    pub fn register<C, F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        C: CustomPlaceholder + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.factories.insert(
            name.to_string(),
            Arc::new(move || Arc::new(factory()) as Arc<dyn CustomPlaceholder>),
        );
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for CustomPlaceholderRegistryImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("CustomPlaceholderRegistryImpl")
            .field("names", &names)
            .finish()
    }
}

impl CustomPlaceholderRegistry for CustomPlaceholderRegistryImpl {
    fn governs(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    fn resolve(&self, name: &str) -> Option<PlaceholderData> {
        self.factories
            .get(name)
            .map(|factory| PlaceholderData::Custom(factory()))
    }
}
