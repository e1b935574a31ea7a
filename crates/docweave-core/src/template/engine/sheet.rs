//! Spreadsheet expansion
//!
//! Rows are written to an append-only [`SheetWriter`]. Every template row is
//! shifted by the running [`RowOffset`]: repeating a region of `span` rows
//! `n` times moves everything below it by `(n - 1) * span`.

use super::blocks::{find_regions, region_opening_at, Region};
use super::text::{apply, plan_edits, strip};
use super::{lone_custom, repetition, substitute, Repetition};
use crate::document::sheet::{CellValue, SheetCell, SheetRow, Workbook};
use crate::document::writer::SheetWriter;
use crate::error::{DocweaveError, Result};
use crate::locale::Locale;
use crate::placeholder::PlaceholderResolver;

/// Accumulated row shift of one sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowOffset {
    value: i64,
}

impl RowOffset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, delta: i64) {
        self.value += delta;
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Output index of template row `row`
    pub fn target(&self, row: u32) -> Result<u32> {
        u32::try_from(i64::from(row) + self.value).map_err(|_| DocweaveError::RowOffsetNegative {
            row,
            offset: self.value,
        })
    }
}

pub struct SheetEngine<'t, W: SheetWriter> {
    template: &'t Workbook,
    locale: Locale,
    writer: W,
    offset: RowOffset,
}

impl<'t, W: SheetWriter> SheetEngine<'t, W> {
    pub fn new(template: &'t Workbook, locale: Locale, writer: W) -> Self {
        Self {
            template,
            locale,
            writer,
            offset: RowOffset::new(),
        }
    }

    pub fn expand(mut self, resolver: &dyn PlaceholderResolver) -> Result<Workbook> {
        let template = self.template;
        template.validate()?;
        for sheet in &template.sheets {
            self.offset = RowOffset::new();
            self.writer.new_sheet(sheet)?;
            self.expand_rows(&sheet.rows, resolver)?;
            tracing::debug!("Sheet {} finished with row offset {}", sheet.name, self.offset.value());
        }
        self.writer.complete()
    }

    pub(super) fn expand_rows(&mut self, rows: &[SheetRow], resolver: &dyn PlaceholderResolver) -> Result<()> {
        let segments: Vec<Vec<String>> = rows.iter().map(SheetRow::texts).collect();
        let regions = find_regions(&segments);

        let mut i = 0;
        while i < rows.len() {
            let Some(region) = region_opening_at(&regions, i) else {
                self.write_row(&rows[i], resolver)?;
                i += 1;
                continue;
            };

            let last = region.close.unit;
            let span = rows[last]
                .index
                .checked_sub(rows[i].index)
                .map(|gap| i64::from(gap) + 1)
                .ok_or_else(|| {
                    DocweaveError::TemplateInvalid(format!(
                        "region {} closes at row {} before it opens at row {}",
                        region.path, rows[last].index, rows[i].index
                    ))
                })?;
            let fragment = strip_markers(&rows[i..=last], region);

            match repetition(&region.path, resolver, &self.locale)? {
                Repetition::Each(elements) => {
                    if elements.is_empty() {
                        self.offset.add(-span);
                    }
                    for (n, element) in elements.iter().enumerate() {
                        if n > 0 {
                            self.offset.add(span);
                        }
                        self.expand_rows(&fragment, element.as_ref())?;
                    }
                }
                Repetition::Once => self.expand_rows(&fragment, resolver)?,
                Repetition::Removed => self.offset.add(-span),
            }
            i = last + 1;
        }

        Ok(())
    }

    fn write_row(&mut self, row: &SheetRow, resolver: &dyn PlaceholderResolver) -> Result<()> {
        let target = self.offset.target(row.index)?;
        self.writer.new_row(row, target)?;
        for cell in &row.cells {
            let filled = self.fill_cell(cell, resolver)?;
            self.writer.add_cell(&filled, filled.value.clone())?;
        }
        Ok(())
    }

    fn fill_cell(&self, cell: &SheetCell, resolver: &dyn PlaceholderResolver) -> Result<SheetCell> {
        let CellValue::Text(text) = &cell.value else {
            return Ok(cell.clone());
        };

        if let Some((custom, _)) = lone_custom(text, resolver, &self.locale)? {
            let mut filled = cell.clone();
            if !custom.transform_cell(&mut filled)? {
                tracing::warn!(
                    "Custom placeholder {} has no spreadsheet form, left as is",
                    custom.name()
                );
            }
            return Ok(filled);
        }

        let locale = &self.locale;
        let edits = plan_edits(text, |token| substitute(token, resolver, locale))?;
        let mut filled = cell.clone();
        filled.value = CellValue::Text(apply(text, &edits));
        Ok(filled)
    }
}

/// Clone a region's rows with the marker tokens removed
///
/// Cells left empty become blank; the rows themselves stay so the region
/// keeps its span.
fn strip_markers(rows: &[SheetRow], region: &Region) -> Vec<SheetRow> {
    let first = region.open.unit;
    let mut fragment = rows.to_vec();

    for marker in [region.close, region.open] {
        let Some(cell) = fragment
            .get_mut(marker.unit - first)
            .and_then(|row| row.cells.get_mut(marker.segment))
        else {
            continue;
        };
        if let CellValue::Text(text) = &mut cell.value {
            strip(text, marker.start, marker.end);
            if text.trim().is_empty() {
                cell.value = CellValue::Blank;
            }
        }
    }

    fragment
}
