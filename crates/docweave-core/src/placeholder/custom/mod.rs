//! Custom placeholders
//!
//! A custom placeholder owns the paragraph it sits in. The engine hands it a
//! [`WordCursor`] positioned on that paragraph; the transform performs every
//! structural change itself, including removing the placeholder paragraph.

mod picture;
mod toc;

pub use picture::ImagePlaceholder;
pub use toc::TableOfContents;

use crate::document::sheet::SheetCell;
use crate::document::word::{BodyElement, Paragraph, WordParts};
use crate::error::Result;
use std::fmt;

pub trait CustomPlaceholder: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Transform the word-processing paragraph under `cursor`
    fn transform(&self, cursor: &mut WordCursor<'_>) -> Result<()>;

    /// Transform a spreadsheet cell; `false` leaves the token in place
    fn transform_cell(&self, _cell: &mut SheetCell) -> Result<bool> {
        Ok(false)
    }
}

/// A position in a body being expanded
pub struct WordCursor<'a> {
    body: &'a mut Vec<BodyElement>,
    index: usize,
    parts: &'a mut WordParts,
    args: &'a str,
    removed: bool,
}

impl<'a> WordCursor<'a> {
    pub fn new(
        body: &'a mut Vec<BodyElement>,
        index: usize,
        parts: &'a mut WordParts,
        args: &'a str,
    ) -> Self {
        Self {
            body,
            index,
            parts,
            args,
            removed: false,
        }
    }

    /// Arguments following the command keyword, empty for `{{name}}`
    pub fn args(&self) -> &str {
        self.args
    }

    /// The placeholder paragraph, until it is removed
    pub fn placeholder(&self) -> Option<&Paragraph> {
        if self.removed {
            return None;
        }
        self.body.get(self.index).and_then(BodyElement::as_paragraph)
    }

    pub fn placeholder_mut(&mut self) -> Option<&mut Paragraph> {
        if self.removed {
            return None;
        }
        match self.body.get_mut(self.index) {
            Some(BodyElement::Paragraph(p)) => Some(p),
            _ => None,
        }
    }

    /// Insert an element in front of the placeholder
    pub fn insert_before(&mut self, element: impl Into<BodyElement>) {
        self.body.insert(self.index, element.into());
        self.index += 1;
    }

    /// Remove the placeholder paragraph; repeated calls do nothing
    pub fn remove_placeholder(&mut self) {
        if !self.removed && self.index < self.body.len() {
            self.body.remove(self.index);
            self.removed = true;
        }
    }

    pub fn parts(&self) -> &WordParts {
        self.parts
    }

    pub fn parts_mut(&mut self) -> &mut WordParts {
        self.parts
    }
}
