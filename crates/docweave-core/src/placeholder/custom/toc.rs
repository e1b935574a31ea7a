use super::{CustomPlaceholder, WordCursor};
use crate::document::word::{Paragraph, SimpleField};
use crate::error::Result;

const TOC_INSTRUCTION: &str = "TOC \\h";
const TOC_PLACEHOLDER_TEXT: &str = "Table of contents (Please refresh)";

/// Replaces its paragraph with a table of contents field
///
/// The field is left dirty and the document asks to refresh fields when
/// opened, so the consuming application builds the actual entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableOfContents;

impl CustomPlaceholder for TableOfContents {
    fn name(&self) -> &str {
        "toc"
    }

    fn transform(&self, cursor: &mut WordCursor<'_>) -> Result<()> {
        let style = cursor.placeholder().and_then(|p| p.style.clone());
        let paragraph = Paragraph {
            style,
            runs: Vec::new(),
            field: Some(SimpleField {
                instruction: TOC_INSTRUCTION.to_string(),
                text: TOC_PLACEHOLDER_TEXT.to_string(),
                dirty: true,
            }),
        };

        cursor.insert_before(paragraph);
        cursor.parts_mut().update_fields_on_open = true;
        cursor.remove_placeholder();
        Ok(())
    }
}
