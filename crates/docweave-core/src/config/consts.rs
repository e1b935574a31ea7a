//! Defaults shared by the configuration and the CLI

/// Generation defaults
pub mod generation {
    /// Locale used when neither the config nor the caller names one
    pub const DEFAULT_LOCALE: &str = "en-US";

    /// Budget of a blocking wait for a generation (60 seconds)
    pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 60_000;

    /// Prefix of artifact file names
    pub const ARTIFACT_PREFIX: &str = "docweave-";
}

/// Streaming spreadsheet output
pub mod sheet {
    /// Rows kept mutable by the streaming writer
    pub const DEFAULT_WINDOW_SIZE: usize = 100;
}

/// Remote image fetching
pub mod remote_images {
    /// Request timeout in seconds
    pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

    /// Largest accepted image (10MB)
    pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
}

pub use generation::{DEFAULT_LOCALE, DEFAULT_WAIT_TIMEOUT_MS};
pub use remote_images::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_IMAGE_BYTES};
pub use sheet::DEFAULT_WINDOW_SIZE;
