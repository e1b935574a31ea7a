// Core modules
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod generation;
pub mod locale;
pub mod placeholder;
pub mod post;
pub mod template;

// Re-export commonly used types
pub use config::DocweaveConfig;
pub use document::{Document, DocumentKind};
pub use error::{DocweaveError, Result};
pub use generation::GenerationHandle;
pub use locale::Locale;
pub use placeholder::{PlaceholderData, PlaceholderResolver, ReflectionResolver};
pub use template::Template;
