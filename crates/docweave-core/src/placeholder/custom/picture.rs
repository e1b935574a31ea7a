use super::{CustomPlaceholder, WordCursor};
use crate::document::media::embed_image;
use crate::document::word::Paragraph;
use crate::error::{DocweaveError, Result};
use std::path::PathBuf;

/// Embeds a local image file in place of its paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlaceholder {
    path: PathBuf,
    max_width: Option<u32>,
}

impl ImagePlaceholder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_width: None,
        }
    }

    pub fn with_max_width(mut self, max_width: Option<u32>) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl CustomPlaceholder for ImagePlaceholder {
    fn name(&self) -> &str {
        "image"
    }

    fn transform(&self, cursor: &mut WordCursor<'_>) -> Result<()> {
        let bytes = std::fs::read(&self.path).map_err(|e| DocweaveError::TemplateIo {
            path: Some(self.path.clone()),
            reason: e.to_string(),
        })?;
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let run = embed_image(cursor.parts_mut(), &file_name, bytes, self.max_width)?;
        let style = cursor.placeholder().and_then(|p| p.style.clone());
        cursor.insert_before(Paragraph {
            style,
            runs: vec![run],
            field: None,
        });
        cursor.remove_placeholder();
        Ok(())
    }
}
