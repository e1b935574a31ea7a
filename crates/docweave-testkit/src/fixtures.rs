//! Sample data and template builders
//!
//! The bean graph is a starship captain with a ship, its crew and the
//! planets it visited. Values are chosen so every format directive kind
//! shows up somewhere.

use chrono::{Datelike, Local, NaiveDate};
use docweave_core::document::{
    BodyElement, Paragraph, Sheet, SheetRow, Table, TableRow, WordDocument, Workbook,
};
use docweave_core::error::{DocweaveError, Result};
use docweave_core::format::FormatDirective;
use docweave_core::placeholder::{Bean, Property};
use image::{ImageBuffer, ImageFormat, Rgb};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Captain,
    Commander,
    LieutenantCommander,
    Lieutenant,
    Ensign,
}

impl Rank {
    pub fn name(&self) -> &'static str {
        match self {
            Rank::Captain => "CAPTAIN",
            Rank::Commander => "COMMANDER",
            Rank::LieutenantCommander => "LIEUTENANT_COMMANDER",
            Rank::Lieutenant => "LIEUTENANT",
            Rank::Ensign => "ENSIGN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub name: String,
    pub population: i64,
    /// Share of the surface covered by water
    pub water: f64,
}

impl Bean for Planet {
    fn type_name(&self) -> &str {
        "Planet"
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        Ok(match name {
            "name" => Some(self.name.clone().into()),
            "population" => Some(self.population.into()),
            "water" => Some(self.water.into()),
            _ => None,
        })
    }

    fn directives(&self, field: &str) -> Vec<FormatDirective> {
        match field {
            "water" => vec![FormatDirective::percentage()],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrewMember {
    pub name: String,
    pub rank: Rank,
    pub officer: bool,
}

impl Bean for CrewMember {
    fn type_name(&self) -> &str {
        "CrewMember"
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        Ok(match name {
            "name" => Some(self.name.clone().into()),
            "rank" => Some(Property::Enum(self.rank.name().to_string())),
            "officer" => Some(self.officer.into()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub name: String,
    pub registry: String,
    pub cost: Decimal,
    pub launched: NaiveDate,
    pub crew: Vec<CrewMember>,
    pub services: Vec<String>,
    pub visited: Vec<Planet>,
}

impl Bean for Ship {
    fn type_name(&self) -> &str {
        "Ship"
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        Ok(match name {
            "name" => Some(self.name.clone().into()),
            "registry" => Some(self.registry.clone().into()),
            "cost" => Some(self.cost.into()),
            "launched" => Some(self.launched.into()),
            "crew" => Some(Property::List(
                self.crew.iter().cloned().map(Property::object).collect(),
            )),
            "services" => Some(Property::list(self.services.iter().cloned())),
            "visited" => Some(Property::List(
                self.visited.iter().cloned().map(Property::object).collect(),
            )),
            _ => None,
        })
    }

    fn directives(&self, field: &str) -> Vec<FormatDirective> {
        match field {
            "cost" => vec![FormatDirective::money("USD")],
            "launched" => vec![FormatDirective::date_time("dd.MM.yyyy")],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Captain {
    pub name: String,
    pub rank: Rank,
    pub birthdate: NaiveDate,
    pub ship: Ship,
    /// Path of a portrait, embedded through the image directive
    pub portrait: Option<PathBuf>,
}

impl Captain {
    /// Completed years on `day`
    pub fn age_on(&self, day: NaiveDate) -> i64 {
        let years = i64::from(day.year() - self.birthdate.year());
        if (day.month(), day.day()) < (self.birthdate.month(), self.birthdate.day()) {
            years - 1
        } else {
            years
        }
    }
}

impl Bean for Captain {
    fn type_name(&self) -> &str {
        "Captain"
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        Ok(match name {
            "name" => Some(self.name.clone().into()),
            "rank" => Some(Property::Enum(self.rank.name().to_string())),
            "age" => Some(self.age_on(Local::now().date_naive()).into()),
            "birthdate" => Some(self.birthdate.into()),
            "ship" => Some(Property::object(self.ship.clone())),
            "portrait" => self.portrait.clone().map(Property::Path),
            _ => None,
        })
    }

    fn directives(&self, field: &str) -> Vec<FormatDirective> {
        match field {
            "birthdate" => vec![FormatDirective::date_time("dd.MM.yyyy")],
            "portrait" => vec![FormatDirective::image(Some(100))],
            _ => Vec::new(),
        }
    }
}

/// A bean whose every property read fails
#[derive(Debug, Clone, Default)]
pub struct Unreadable;

impl Bean for Unreadable {
    fn type_name(&self) -> &str {
        "Unreadable"
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        Err(DocweaveError::AccessFault {
            bean: "Unreadable".to_string(),
            property: name.to_string(),
            reason: "accessor malfunction".to_string(),
        })
    }
}

fn crew(name: &str, rank: Rank) -> CrewMember {
    CrewMember {
        name: name.to_string(),
        rank,
        officer: rank != Rank::Ensign,
    }
}

pub fn enterprise() -> Ship {
    Ship {
        name: "USS Enterprise".to_string(),
        registry: "NCC-1701-D".to_string(),
        cost: Decimal::new(125_050, 2),
        launched: NaiveDate::from_ymd_opt(2363, 10, 4).expect("valid date"),
        crew: vec![
            crew("Riker", Rank::Commander),
            crew("Data", Rank::LieutenantCommander),
            crew("Worf", Rank::Lieutenant),
        ],
        services: vec!["Exploration".to_string(), "Diplomacy".to_string()],
        visited: vec![
            Planet {
                name: "Earth".to_string(),
                population: 9_000_000_000,
                water: 0.71,
            },
            Planet {
                name: "Vulcan".to_string(),
                population: 6_000_000_000,
                water: 0.05,
            },
        ],
    }
}

pub fn picard() -> Captain {
    Captain {
        name: "Jean-Luc Picard".to_string(),
        rank: Rank::Captain,
        birthdate: NaiveDate::from_ymd_opt(1948, 9, 23).expect("valid date"),
        ship: enterprise(),
        portrait: None,
    }
}

/// Word template of one plain paragraph per entry
pub fn word_template(paragraphs: &[&str]) -> WordDocument {
    WordDocument::new(
        paragraphs
            .iter()
            .map(|p| BodyElement::Paragraph(Paragraph::new(p)))
            .collect(),
    )
}

/// Table of single-paragraph cells
pub fn word_table(rows: &[&[&str]]) -> BodyElement {
    BodyElement::Table(Table {
        style: None,
        rows: rows.iter().map(|cells| TableRow::of_texts(cells)).collect(),
    })
}

/// Workbook with one sheet of text rows at the given indices
pub fn sheet_template(name: &str, rows: &[(u32, &[&str])]) -> Workbook {
    Workbook::new(vec![Sheet::new(
        name,
        rows.iter()
            .map(|(index, cells)| SheetRow::of_texts(*index, cells))
            .collect(),
    )])
}

/// Write a template document as `dir/file_name`
pub fn write_template<T: Serialize>(dir: &Path, file_name: &str, document: &T) -> PathBuf {
    let path = dir.join(file_name);
    let content = serde_json::to_vec_pretty(document).expect("template serializes");
    std::fs::write(&path, content).expect("Failed to write template");
    path
}

/// PNG image of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb([0, 64, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("PNG encoding succeeds");
    out.into_inner()
}
