//! Placeholder resolution
//!
//! - [`PlaceholderResolver`]: the contract the expansion engines depend on
//! - [`ReflectionResolver`]: resolution over a [`Bean`] graph
//! - [`CustomPlaceholderRegistry`]: synthetic names checked before properties
//! - [`PlaceholderData`]: SCALAR / SET / CUSTOM results

pub mod bean;
pub mod custom;
pub mod data;
pub mod json;
pub mod reflection;
pub mod registry;
pub mod resolver;

pub use bean::{Bean, Property};
pub use custom::{CustomPlaceholder, ImagePlaceholder, TableOfContents, WordCursor};
pub use data::{PlaceholderData, PlaceholderSet, PlaceholderType};
pub use json::{DirectiveSchema, JsonBean};
pub use reflection::{ReflectionResolver, SELF_REFERENCE};
pub use registry::{
    CustomPlaceholderRegistry, CustomPlaceholderRegistryImpl, NoCustomPlaceholders,
    PlaceholderFactory,
};
pub use resolver::{PlaceholderResolver, RegistryResolver, StaticResolver};
