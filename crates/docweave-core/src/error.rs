use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocweaveError {
    // Resolution errors
    #[error("ACCESS_FAULT: could not read property '{property}' of {bean}: {reason}")]
    AccessFault {
        bean: String,
        property: String,
        reason: String,
    },

    #[error("PATTERN_INVALID: cannot format with pattern '{pattern}': {reason}")]
    PatternInvalid { pattern: String, reason: String },

    #[error("CURRENCY_UNKNOWN: '{0}' is not an ISO 4217 currency code")]
    CurrencyUnknown(String),

    // Template errors
    #[error("UNSUPPORTED_KIND: template generation is not implemented for '{0}'")]
    UnsupportedKind(String),

    #[error("TEMPLATE_INVALID: {0}")]
    TemplateInvalid(String),

    #[error("TEMPLATE_IO: failed to read template {path:?}: {reason}")]
    TemplateIo {
        path: Option<PathBuf>,
        reason: String,
    },

    // Document model errors
    #[error("ROW_ORDER_VIOLATION: row {requested} requested after row {last} in sheet '{sheet}'")]
    RowOrderViolation {
        sheet: String,
        requested: u32,
        last: u32,
    },

    #[error("ROW_FLUSHED: row {row} in sheet '{sheet}' was already flushed")]
    RowFlushed { sheet: String, row: u32 },

    #[error("ROW_OFFSET_NEGATIVE: template row {row} shifted by {offset} lands before the sheet")]
    RowOffsetNegative { row: u32, offset: i64 },

    #[error("CUSTOM_TRANSFORM_FAILED: {0}")]
    CustomTransformFailed(String),

    // Post-processing errors
    #[error("POST_PROCESSING_FAILED: hook '{hook}' failed: {reason}")]
    PostProcessingFailed { hook: String, reason: String },

    #[error("FETCH_FAILED: {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    // Lifecycle errors
    #[error("TIMEOUT: generation did not complete within {:.3}s", waited.as_secs_f64())]
    Timeout { waited: Duration },

    #[error("GENERATION_FAILED: {0}")]
    GenerationFailed(String),

    #[error("GENERATION_INCOMPLETE: the document is not completed yet")]
    GenerationIncomplete,

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl DocweaveError {
    /// Whether the error ends a generation (everything but post-processing faults and timeouts)
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DocweaveError::PostProcessingFailed { .. }
                | DocweaveError::FetchFailed { .. }
                | DocweaveError::Timeout { .. }
        )
    }
}

impl From<serde_json::Error> for DocweaveError {
    fn from(err: serde_json::Error) -> Self {
        DocweaveError::Generic(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DocweaveError>;
