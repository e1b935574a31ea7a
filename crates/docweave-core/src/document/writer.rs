//! Streaming spreadsheet output
//!
//! Rows are appended in strictly increasing order. Only the last
//! `window_size` rows stay mutable; older rows are flushed into the sheet and
//! can no longer be touched.

use super::sheet::{CellStyle, CellValue, Sheet, SheetCell, SheetRow, Workbook};
use crate::error::{DocweaveError, Result};
use std::collections::{BTreeMap, VecDeque};

pub trait SheetWriter {
    /// Start a sheet carrying the template sheet's name and settings
    fn new_sheet(&mut self, template: &Sheet) -> Result<()>;

    /// Start a row at `target` carrying the template row's formatting
    fn new_row(&mut self, template: &SheetRow, target: u32) -> Result<()>;

    /// Add a cell to the current row with the template cell's formatting
    fn add_cell(&mut self, template: &SheetCell, value: CellValue) -> Result<()>;

    /// Flush everything and hand out the workbook
    fn complete(&mut self) -> Result<Workbook>;
}

struct OpenSheet {
    sheet: Sheet,
    template_widths: BTreeMap<u16, f32>,
    window: VecDeque<SheetRow>,
    last_row: Option<u32>,
}

impl OpenSheet {
    fn flush_to(&mut self, keep: usize) {
        while self.window.len() > keep {
            if let Some(row) = self.window.pop_front() {
                tracing::trace!("Flushing row {} of {}", row.index, self.sheet.name);
                self.sheet.rows.push(row);
            }
        }
    }
}

pub struct StreamingSheetWriter {
    template_styles: Vec<CellStyle>,
    window_size: usize,
    workbook: Workbook,
    current: Option<OpenSheet>,
}

impl StreamingSheetWriter {
    pub fn new(template_styles: Vec<CellStyle>, window_size: usize) -> Self {
        let mut workbook = Workbook::default();
        workbook.force_formula_recalculation = true;
        Self {
            template_styles,
            window_size: window_size.max(1),
            workbook,
            current: None,
        }
    }

    fn close_sheet(&mut self) {
        if let Some(mut open) = self.current.take() {
            open.flush_to(0);
            self.workbook.sheets.push(open.sheet);
        }
    }

    fn open_sheet(&mut self) -> Result<&mut OpenSheet> {
        self.current
            .as_mut()
            .ok_or_else(|| DocweaveError::Generic("No sheet started".to_string()))
    }

    fn copy_style(&mut self, id: u32) {
        if self.workbook.style(id).is_some() {
            return;
        }
        if let Some(style) = self.template_styles.iter().find(|s| s.id == id) {
            self.workbook.styles.push(style.clone());
        }
    }
}

#[cfg(test)]
impl StreamingSheetWriter {
    /// A row still inside the window
    pub(crate) fn row_mut(&mut self, index: u32) -> Result<&mut SheetRow> {
        let open = self.open_sheet()?;
        let name = open.sheet.name.clone();
        let flushed = open.sheet.rows.iter().any(|r| r.index == index);

        match open.window.iter_mut().find(|r| r.index == index) {
            Some(row) => Ok(row),
            None if flushed => Err(DocweaveError::RowFlushed { sheet: name, row: index }),
            None => Err(DocweaveError::Generic(format!(
                "Row {} of {} was never written",
                index, name
            ))),
        }
    }
}

impl SheetWriter for StreamingSheetWriter {
    fn new_sheet(&mut self, template: &Sheet) -> Result<()> {
        tracing::info!("Creating new sheet of {}", template.name);
        self.close_sheet();
        self.current = Some(OpenSheet {
            sheet: Sheet {
                name: template.name.clone(),
                settings: template.settings.clone(),
                column_widths: BTreeMap::new(),
                rows: Vec::new(),
            },
            template_widths: template.column_widths.clone(),
            window: VecDeque::new(),
            last_row: None,
        });
        Ok(())
    }

    fn new_row(&mut self, template: &SheetRow, target: u32) -> Result<()> {
        if let Some(style) = template.style {
            self.copy_style(style);
        }
        let window_size = self.window_size;
        let open = self.open_sheet()?;

        if let Some(last) = open.last_row {
            if target <= last {
                return Err(DocweaveError::RowOrderViolation {
                    sheet: open.sheet.name.clone(),
                    requested: target,
                    last,
                });
            }
        }

        tracing::debug!("Creating new row {} from template row {}", target, template.index);
        open.window.push_back(SheetRow {
            index: target,
            height: template.height,
            style: template.style,
            hidden: template.hidden,
            cells: Vec::new(),
        });
        open.last_row = Some(target);
        open.flush_to(window_size);
        Ok(())
    }

    fn add_cell(&mut self, template: &SheetCell, value: CellValue) -> Result<()> {
        self.copy_style(template.style);
        let open = self.open_sheet()?;

        if let Some(width) = open.template_widths.get(&template.column) {
            open.sheet.column_widths.insert(template.column, *width);
        }
        let row = open
            .window
            .back_mut()
            .ok_or_else(|| DocweaveError::Generic("No row started".to_string()))?;
        row.cells.push(SheetCell {
            column: template.column,
            value,
            style: template.style,
            comment: template.comment.clone(),
            hyperlink: template.hyperlink.clone(),
        });
        Ok(())
    }

    fn complete(&mut self) -> Result<Workbook> {
        self.close_sheet();
        let mut workbook = std::mem::take(&mut self.workbook);
        workbook.force_formula_recalculation = true;
        Ok(workbook)
    }
}
