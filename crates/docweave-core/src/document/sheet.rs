//! Spreadsheet document model

use crate::error::{DocweaveError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    #[serde(default)]
    pub styles: Vec<CellStyle>,
    /// Recompute every formula when the workbook is opened
    #[serde(default)]
    pub force_formula_recalculation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub id: u32,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Display and print settings copied verbatim into generated sheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    pub default_column_width: Option<f32>,
    pub default_row_height: Option<f32>,
    pub active_cell: Option<String>,
    pub display_gridlines: bool,
    pub display_formulas: bool,
    pub display_zeros: bool,
    pub right_to_left: bool,
    pub selected: bool,
    pub fit_to_page: bool,
    pub row_breaks: Vec<u32>,
    pub column_breaks: Vec<u16>,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            default_column_width: None,
            default_row_height: None,
            active_cell: None,
            display_gridlines: true,
            display_formulas: false,
            display_zeros: true,
            right_to_left: false,
            selected: false,
            fit_to_page: false,
            row_breaks: Vec::new(),
            column_breaks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub settings: SheetSettings,
    #[serde(default)]
    pub column_widths: BTreeMap<u16, f32>,
    /// Rows in increasing index order; absent indices are empty rows
    #[serde(default)]
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetRow {
    pub index: u32,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub style: Option<u32>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub cells: Vec<SheetCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetCell {
    pub column: u16,
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub style: u32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub hyperlink: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Blank,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Formula source without the leading `=`
    Formula(String),
    Error(String),
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl SheetCell {
    pub fn new(column: u16, value: CellValue) -> Self {
        Self {
            column,
            value,
            style: 0,
            comment: None,
            hyperlink: None,
        }
    }

    pub fn text(column: u16, text: &str) -> Self {
        Self::new(column, CellValue::Text(text.to_string()))
    }
}

impl SheetRow {
    pub fn new(index: u32, cells: Vec<SheetCell>) -> Self {
        Self {
            index,
            height: None,
            style: None,
            hidden: false,
            cells,
        }
    }

    /// Row of text cells starting at column 0
    pub fn of_texts(index: u32, texts: &[&str]) -> Self {
        Self::new(
            index,
            texts
                .iter()
                .enumerate()
                .map(|(column, text)| SheetCell::text(column as u16, text))
                .collect(),
        )
    }

    pub fn cell(&self, column: u16) -> Option<&SheetCell> {
        self.cells.iter().find(|c| c.column == column)
    }

    /// Text of every text cell, in column order
    pub fn texts(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|c| c.value.as_text().unwrap_or_default().to_string())
            .collect()
    }
}

impl Sheet {
    pub fn new(name: &str, rows: Vec<SheetRow>) -> Self {
        Self {
            name: name.to_string(),
            settings: SheetSettings::default(),
            column_widths: BTreeMap::new(),
            rows,
        }
    }

    pub fn row(&self, index: u32) -> Option<&SheetRow> {
        self.rows.iter().find(|r| r.index == index)
    }

    /// Text of the cell at `row`/`column`, if it is a text cell
    pub fn text_at(&self, row: u32, column: u16) -> Option<&str> {
        self.row(row)?.cell(column)?.value.as_text()
    }

    pub fn last_row_index(&self) -> Option<u32> {
        self.rows.last().map(|r| r.index)
    }
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self {
            sheets,
            styles: Vec::new(),
            force_formula_recalculation: false,
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn style(&self, id: u32) -> Option<&CellStyle> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// Rows of every sheet must be listed in strictly increasing index order
    pub fn validate(&self) -> Result<()> {
        for sheet in &self.sheets {
            for pair in sheet.rows.windows(2) {
                if pair[1].index <= pair[0].index {
                    return Err(DocweaveError::TemplateInvalid(format!(
                        "sheet {}: row {} follows row {}",
                        sheet.name, pair[1].index, pair[0].index
                    )));
                }
            }
        }
        Ok(())
    }
}
