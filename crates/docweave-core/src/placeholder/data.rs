//! Placeholder data model

use super::custom::CustomPlaceholder;
use super::resolver::PlaceholderResolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceholderType {
    Scalar,
    Set,
    Custom,
}

impl fmt::Display for PlaceholderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderType::Scalar => write!(f, "SCALAR"),
            PlaceholderType::Set => write!(f, "SET"),
            PlaceholderType::Custom => write!(f, "CUSTOM"),
        }
    }
}

/// Result of resolving a placeholder path
#[derive(Clone)]
pub enum PlaceholderData {
    /// Already formatted text
    Scalar(String),
    /// Duplicate the owning fragment once per resolver
    Set(PlaceholderSet),
    /// Transform applied to the fragment itself
    Custom(Arc<dyn CustomPlaceholder>),
}

impl PlaceholderData {
    pub fn scalar(value: impl Into<String>) -> Self {
        PlaceholderData::Scalar(value.into())
    }

    pub fn custom<C: CustomPlaceholder + 'static>(placeholder: C) -> Self {
        PlaceholderData::Custom(Arc::new(placeholder))
    }

    pub fn kind(&self) -> PlaceholderType {
        match self {
            PlaceholderData::Scalar(_) => PlaceholderType::Scalar,
            PlaceholderData::Set(_) => PlaceholderType::Set,
            PlaceholderData::Custom(_) => PlaceholderType::Custom,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            PlaceholderData::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&PlaceholderSet> {
        match self {
            PlaceholderData::Set(set) => Some(set),
            _ => None,
        }
    }
}

impl fmt::Debug for PlaceholderData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderData::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            PlaceholderData::Set(set) => f.debug_struct("Set").field("size", &set.size()).finish(),
            PlaceholderData::Custom(c) => f.debug_tuple("Custom").field(&c.name()).finish(),
        }
    }
}

/// Ordered element resolvers of a SET
///
/// The size is the number of resolvers; there is no separate count to drift.
#[derive(Clone, Default)]
pub struct PlaceholderSet {
    resolvers: Vec<Arc<dyn PlaceholderResolver>>,
}

impl PlaceholderSet {
    pub fn new(resolvers: Vec<Arc<dyn PlaceholderResolver>>) -> Self {
        Self { resolvers }
    }

    pub fn single(resolver: Arc<dyn PlaceholderResolver>) -> Self {
        Self {
            resolvers: vec![resolver],
        }
    }

    pub fn size(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Resolver used to continue a dotted path
    pub fn first(&self) -> Option<&Arc<dyn PlaceholderResolver>> {
        self.resolvers.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PlaceholderResolver>> {
        self.resolvers.iter()
    }
}

impl From<PlaceholderSet> for PlaceholderData {
    fn from(set: PlaceholderSet) -> Self {
        PlaceholderData::Set(set)
    }
}
