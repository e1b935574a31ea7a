//! `docweave.toml` configuration

pub mod consts;
pub mod model;

pub use model::{DocweaveConfig, GenerationConfig, RemoteImageConfig, SheetConfig};
