//! Word-processing document model
//!
//! A document is a body of paragraphs and tables plus the parts paragraphs
//! refer to (styles, embedded media, settings). Tables nest bodies inside
//! their cells.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordDocument {
    #[serde(default)]
    pub body: Vec<BodyElement>,
    #[serde(default)]
    pub parts: WordParts,
}

/// Everything a body element can reference by id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordParts {
    #[serde(default)]
    pub styles: StyleTable,
    #[serde(default)]
    pub media: Vec<MediaPart>,
    /// Ask the consuming application to refresh fields (e.g. a TOC) when opened
    #[serde(default)]
    pub update_fields_on_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub based_on: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTable {
    styles: Vec<Style>,
}

impl StyleTable {
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn insert(&mut self, style: Style) {
        if !self.contains(&style.id) {
            self.styles.push(style);
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }
}

impl FromIterator<Style> for StyleTable {
    fn from_iter<T: IntoIterator<Item = Style>>(iter: T) -> Self {
        let mut table = StyleTable::default();
        for style in iter {
            table.insert(style);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPart {
    pub id: String,
    pub file_name: String,
    pub content_type: String,
    #[serde(with = "super::base64_bytes")]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyElement {
    Paragraph(Paragraph),
    Table(Table),
}

impl BodyElement {
    /// Text of a paragraph; tables are opaque at body level
    pub fn text(&self) -> String {
        match self {
            BodyElement::Paragraph(p) => p.text(),
            BodyElement::Table(_) => String::new(),
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            BodyElement::Paragraph(p) => Some(p),
            BodyElement::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            BodyElement::Table(t) => Some(t),
            BodyElement::Paragraph(_) => None,
        }
    }
}

impl From<Paragraph> for BodyElement {
    fn from(p: Paragraph) -> Self {
        BodyElement::Paragraph(p)
    }
}

impl From<Table> for BodyElement {
    fn from(t: Table) -> Self {
        BodyElement::Table(t)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default)]
    pub field: Option<SimpleField>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub picture: Option<Picture>,
}

/// An inline picture referencing a media part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub media_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub description: Option<String>,
}

/// A simple field such as `TOC \h`, shown with placeholder text until refreshed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleField {
    pub instruction: String,
    pub text: String,
    pub dirty: bool,
}

impl Paragraph {
    pub fn new(text: &str) -> Self {
        Self {
            style: None,
            runs: vec![Run::new(text)],
            field: None,
        }
    }

    pub fn with_style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }

    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            style: None,
            runs,
            field: None,
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn has_pictures(&self) -> bool {
        self.runs.iter().any(|r| r.picture.is_some())
    }

    /// Replace the byte span `start..end` of [`Paragraph::text`]
    ///
    /// The replacement takes the formatting of the run the span starts in;
    /// text the span covers in later runs is removed from them.
    pub fn replace_span(&mut self, start: usize, end: usize, replacement: &str) {
        if self.runs.is_empty() {
            self.runs.push(Run::new(replacement));
            return;
        }

        let total: usize = self.runs.iter().map(|r| r.text.len()).sum();
        let start = start.min(total);
        let end = end.clamp(start, total);

        // The run that receives the replacement
        let mut offset = 0;
        let mut target = self.runs.len() - 1;
        for (i, run) in self.runs.iter().enumerate() {
            if start < offset + run.text.len() {
                target = i;
                break;
            }
            offset += run.text.len();
        }

        let mut offset = 0;
        for (i, run) in self.runs.iter_mut().enumerate() {
            let run_start = offset;
            let run_end = offset + run.text.len();
            offset = run_end;

            let lo = start.clamp(run_start, run_end) - run_start;
            let hi = end.clamp(run_start, run_end) - run_start;
            if i == target {
                run.text.replace_range(lo..hi, replacement);
            } else if lo < hi {
                run.text.replace_range(lo..hi, "");
            }
        }
    }

    /// Remove every run, keeping paragraph formatting
    pub fn clear_runs(&mut self) {
        self.runs.clear();
    }
}

impl Run {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            style: None,
            picture: None,
        }
    }

    pub fn styled(text: &str, style: &str) -> Self {
        Self {
            text: text.to_string(),
            style: Some(style.to_string()),
            picture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub body: Vec<BodyElement>,
}

impl TableRow {
    /// Row of single-paragraph cells
    pub fn of_texts(texts: &[&str]) -> Self {
        Self {
            height: None,
            cells: texts.iter().map(|t| TableCell::of_text(t)).collect(),
        }
    }

    /// Text of every top-level cell paragraph, cell by cell
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .flat_map(|c| c.body.iter())
            .map(BodyElement::text)
            .collect()
    }
}

impl TableCell {
    pub fn of_text(text: &str) -> Self {
        Self {
            width: None,
            body: vec![BodyElement::Paragraph(Paragraph::new(text))],
        }
    }

    pub fn text(&self) -> String {
        self.body.iter().map(BodyElement::text).collect()
    }
}

impl WordDocument {
    pub fn new(body: Vec<BodyElement>) -> Self {
        Self {
            body,
            parts: WordParts::default(),
        }
    }

    /// All paragraphs in document order, descending into tables
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        fn collect<'a>(body: &'a [BodyElement], out: &mut Vec<&'a Paragraph>) {
            for element in body {
                match element {
                    BodyElement::Paragraph(p) => out.push(p),
                    BodyElement::Table(t) => {
                        for cell in t.rows.iter().flat_map(|r| r.cells.iter()) {
                            collect(&cell.body, out);
                        }
                    }
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.body, &mut out);
        out
    }

    /// Mutable variant of [`WordDocument::paragraphs`]
    pub fn paragraphs_mut(&mut self) -> Vec<&mut Paragraph> {
        fn collect<'a>(body: &'a mut [BodyElement], out: &mut Vec<&'a mut Paragraph>) {
            for element in body {
                match element {
                    BodyElement::Paragraph(p) => out.push(p),
                    BodyElement::Table(t) => {
                        for cell in t.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
                            collect(&mut cell.body, out);
                        }
                    }
                }
            }
        }

        let mut out = Vec::new();
        collect(&mut self.body, &mut out);
        out
    }

    /// Plain text of the document, one paragraph per line
    pub fn text(&self) -> String {
        self.paragraphs()
            .iter()
            .map(|p| match &p.field {
                Some(field) => field.text.clone(),
                None => p.text(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.body.iter().filter_map(BodyElement::as_table).collect()
    }
}
