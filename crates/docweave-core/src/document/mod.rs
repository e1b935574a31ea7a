//! In-memory document model
//!
//! Templates and generated documents are trees of body elements (word) or
//! rows and cells (sheet). Both serialize to JSON; a template file is the
//! JSON form of its document, named `*.docx.json` or `*.xlsx.json`.

pub mod media;
pub mod sheet;
pub mod word;
pub mod writer;

pub use sheet::{CellStyle, CellValue, Sheet, SheetCell, SheetRow, SheetSettings, Workbook};
pub use word::{
    BodyElement, MediaPart, Paragraph, Picture, Run, SimpleField, Style, StyleTable, Table,
    TableCell, TableRow, WordDocument, WordParts,
};
pub use writer::{SheetWriter, StreamingSheetWriter};

use crate::error::{DocweaveError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const WORD_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const SHEET_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Declared kind of a template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Word,
    Sheet,
    /// Anything else; no engine handles it
    Other(String),
}

impl DocumentKind {
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim() {
            WORD_MIME => DocumentKind::Word,
            SHEET_MIME => DocumentKind::Sheet,
            other => DocumentKind::Other(other.to_string()),
        }
    }

    /// Kind from a template file name such as `letter.docx.json`
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".docx.json") || lower.ends_with(".docx") {
            DocumentKind::Word
        } else if lower.ends_with(".xlsx.json") || lower.ends_with(".xlsx") {
            DocumentKind::Sheet
        } else {
            let extension = Path::new(name)
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            DocumentKind::Other(extension)
        }
    }

    pub fn mime(&self) -> &str {
        match self {
            DocumentKind::Word => WORD_MIME,
            DocumentKind::Sheet => SHEET_MIME,
            DocumentKind::Other(other) => other,
        }
    }

    /// Suffix of the artifact file
    pub fn file_suffix(&self) -> &str {
        match self {
            DocumentKind::Word => ".docx.json",
            DocumentKind::Sheet => ".xlsx.json",
            DocumentKind::Other(_) => ".json",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Word => write!(f, "word"),
            DocumentKind::Sheet => write!(f, "sheet"),
            DocumentKind::Other(other) => write!(f, "{}", other),
        }
    }
}

/// A loaded template or a generated document
///
/// Serialized untagged; reading back always goes through [`Document::from_slice`]
/// with the declared kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Word(WordDocument),
    Sheet(Workbook),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Word(_) => DocumentKind::Word,
            Document::Sheet(_) => DocumentKind::Sheet,
        }
    }

    /// Parse the JSON form of a document of the given kind
    pub fn from_slice(kind: &DocumentKind, bytes: &[u8]) -> Result<Self> {
        match kind {
            DocumentKind::Word => Ok(Document::Word(serde_json::from_slice(bytes)?)),
            DocumentKind::Sheet => {
                let workbook: Workbook = serde_json::from_slice(bytes)?;
                workbook.validate()?;
                Ok(Document::Sheet(workbook))
            }
            DocumentKind::Other(other) => Err(DocweaveError::UnsupportedKind(other.clone())),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn as_word(&self) -> Option<&WordDocument> {
        match self {
            Document::Word(doc) => Some(doc),
            Document::Sheet(_) => None,
        }
    }

    pub fn as_sheet(&self) -> Option<&Workbook> {
        match self {
            Document::Sheet(workbook) => Some(workbook),
            Document::Word(_) => None,
        }
    }
}

/// Serde adapter storing bytes as base64 text
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}
