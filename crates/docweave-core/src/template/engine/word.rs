//! Word-processing expansion
//!
//! Units are body paragraphs and, inside tables, rows. A token in any
//! paragraph of a row makes the whole row the repeated unit.

use super::blocks::{find_regions, region_opening_at, Region};
use super::text::plan_edits;
use super::{lone_custom, repetition, substitute, Repetition};
use crate::document::word::{BodyElement, Paragraph, Table, TableRow, WordDocument, WordParts};
use crate::error::Result;
use crate::locale::Locale;
use crate::placeholder::{PlaceholderResolver, WordCursor};

pub struct WordEngine<'t> {
    template: &'t WordDocument,
    locale: Locale,
    parts: WordParts,
}

impl<'t> WordEngine<'t> {
    pub fn new(template: &'t WordDocument, locale: Locale) -> Self {
        Self {
            template,
            locale,
            parts: template.parts.clone(),
        }
    }

    pub fn expand(mut self, resolver: &dyn PlaceholderResolver) -> Result<WordDocument> {
        let template = self.template;
        let body = self.expand_body(&template.body, resolver)?;
        Ok(WordDocument {
            body,
            parts: self.parts,
        })
    }

    fn expand_body(
        &mut self,
        units: &[BodyElement],
        resolver: &dyn PlaceholderResolver,
    ) -> Result<Vec<BodyElement>> {
        let segments: Vec<Vec<String>> = units
            .iter()
            .map(|unit| match unit {
                BodyElement::Paragraph(p) => vec![p.text()],
                BodyElement::Table(_) => Vec::new(),
            })
            .collect();
        let regions = find_regions(&segments);

        let mut out = Vec::with_capacity(units.len());
        let mut i = 0;
        while i < units.len() {
            if let Some(region) = region_opening_at(&regions, i) {
                let fragment = strip_body_markers(&units[i..=region.close.unit], region);
                match repetition(&region.path, resolver, &self.locale)? {
                    Repetition::Each(elements) => {
                        for element in &elements {
                            out.extend(self.expand_body(&fragment, element.as_ref())?);
                        }
                    }
                    Repetition::Once => out.extend(self.expand_body(&fragment, resolver)?),
                    Repetition::Removed => {}
                }
                i = region.close.unit + 1;
                continue;
            }

            match &units[i] {
                BodyElement::Paragraph(p) => self.fill_paragraph(p.clone(), &mut out, resolver)?,
                BodyElement::Table(t) => {
                    let table = self.expand_table(t, resolver)?;
                    out.push(BodyElement::Table(table));
                }
            }
            i += 1;
        }

        Ok(out)
    }

    fn expand_table(&mut self, table: &Table, resolver: &dyn PlaceholderResolver) -> Result<Table> {
        Ok(Table {
            style: table.style.clone(),
            rows: self.expand_rows(&table.rows, resolver)?,
        })
    }

    fn expand_rows(
        &mut self,
        rows: &[TableRow],
        resolver: &dyn PlaceholderResolver,
    ) -> Result<Vec<TableRow>> {
        let segments: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row_paragraphs(row).map(Paragraph::text).collect())
            .collect();
        let regions = find_regions(&segments);

        let mut out = Vec::with_capacity(rows.len());
        let mut i = 0;
        while i < rows.len() {
            if let Some(region) = region_opening_at(&regions, i) {
                let fragment = strip_row_markers(&rows[i..=region.close.unit], region);
                match repetition(&region.path, resolver, &self.locale)? {
                    Repetition::Each(elements) => {
                        for element in &elements {
                            out.extend(self.expand_rows(&fragment, element.as_ref())?);
                        }
                    }
                    Repetition::Once => out.extend(self.expand_rows(&fragment, resolver)?),
                    Repetition::Removed => {}
                }
                i = region.close.unit + 1;
                continue;
            }

            let mut row = rows[i].clone();
            for cell in &mut row.cells {
                cell.body = self.expand_body(&cell.body, resolver)?;
            }
            out.push(row);
            i += 1;
        }

        Ok(out)
    }

    fn fill_paragraph(
        &mut self,
        mut paragraph: Paragraph,
        out: &mut Vec<BodyElement>,
        resolver: &dyn PlaceholderResolver,
    ) -> Result<()> {
        let text = paragraph.text();

        if let Some((custom, args)) = lone_custom(&text, resolver, &self.locale)? {
            tracing::debug!("Transforming custom placeholder {}", custom.name());
            out.push(BodyElement::Paragraph(paragraph));
            let index = out.len() - 1;
            let mut cursor = WordCursor::new(out, index, &mut self.parts, &args);
            return custom.transform(&mut cursor).inspect_err(|e| {
                tracing::error!("Custom placeholder {} failed: {}", custom.name(), e)
            });
        }

        let locale = &self.locale;
        let edits = plan_edits(&text, |token| substitute(token, resolver, locale))?;
        for edit in edits.iter().rev() {
            paragraph.replace_span(edit.start, edit.end, &edit.replacement);
        }
        out.push(BodyElement::Paragraph(paragraph));
        Ok(())
    }
}

fn row_paragraphs(row: &TableRow) -> impl Iterator<Item = &Paragraph> {
    row.cells
        .iter()
        .flat_map(|c| c.body.iter())
        .filter_map(BodyElement::as_paragraph)
}

fn row_paragraph_mut(row: &mut TableRow, segment: usize) -> Option<&mut Paragraph> {
    row.cells
        .iter_mut()
        .flat_map(|c| c.body.iter_mut())
        .filter_map(|e| match e {
            BodyElement::Paragraph(p) => Some(p),
            BodyElement::Table(_) => None,
        })
        .nth(segment)
}

fn is_blank(paragraph: &Paragraph) -> bool {
    paragraph.text().trim().is_empty() && !paragraph.has_pictures() && paragraph.field.is_none()
}

/// Clone a region's paragraphs without its markers
///
/// Paragraphs that held nothing but a marker are dropped.
fn strip_body_markers(units: &[BodyElement], region: &Region) -> Vec<BodyElement> {
    let first = region.open.unit;
    let mut fragment = units.to_vec();

    for marker in [region.close, region.open] {
        if let Some(BodyElement::Paragraph(p)) = fragment.get_mut(marker.unit - first) {
            p.replace_span(marker.start, marker.end, "");
        }
    }

    let last = fragment.len() - 1;
    let mut index = 0;
    fragment.retain(|unit| {
        let holds_marker = index == 0 || index == last;
        index += 1;
        !(holds_marker && unit.as_paragraph().is_some_and(is_blank))
    });
    fragment
}

/// Clone a region's rows without its markers
///
/// Rows whose paragraphs are all blank afterwards are dropped when they held
/// a marker.
fn strip_row_markers(rows: &[TableRow], region: &Region) -> Vec<TableRow> {
    let first = region.open.unit;
    let mut fragment = rows.to_vec();

    for marker in [region.close, region.open] {
        if let Some(p) = fragment
            .get_mut(marker.unit - first)
            .and_then(|row| row_paragraph_mut(row, marker.segment))
        {
            p.replace_span(marker.start, marker.end, "");
        }
    }

    let last = fragment.len() - 1;
    let mut index = 0;
    fragment.retain(|row| {
        let holds_marker = index == 0 || index == last;
        index += 1;
        !(holds_marker && row_paragraphs(row).all(is_blank))
    });
    fragment
}
