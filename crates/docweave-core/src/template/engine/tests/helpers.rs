//! Shared fixtures for engine tests

use crate::document::sheet::{Sheet, SheetRow, Workbook};
use crate::document::word::{BodyElement, Paragraph, WordDocument};
use crate::error::Result;
use crate::format::FormatDirective;
use crate::locale::Locale;
use crate::placeholder::{Bean, Property, ReflectionResolver};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub(super) struct Officer {
    pub name: &'static str,
    pub postings: Vec<&'static str>,
}

impl Bean for Officer {
    fn type_name(&self) -> &str {
        "Officer"
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        Ok(match name {
            "name" => Some(self.name.into()),
            "postings" => Some(Property::list(self.postings.iter().copied())),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub(super) struct Ship {
    pub name: &'static str,
    pub cost: f64,
    pub crew: Vec<Officer>,
}

impl Bean for Ship {
    fn type_name(&self) -> &str {
        "Ship"
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        Ok(match name {
            "name" => Some(self.name.into()),
            "cost" => Some(self.cost.into()),
            "crew" => Some(Property::List(
                self.crew.iter().cloned().map(Property::object).collect(),
            )),
            "launched" => Some(NaiveDate::from_ymd_opt(2363, 10, 4).unwrap().into()),
            "nobody" => Some(Property::List(Vec::new())),
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
pub(super) struct Fleet {
    pub ships: Vec<Ship>,
}

impl Bean for Fleet {
    fn type_name(&self) -> &str {
        "Fleet"
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        Ok(match name {
            "ships" => Some(Property::List(
                self.ships.iter().cloned().map(Property::object).collect(),
            )),
            "admiral" => Some(Property::from("Alynna Nechayev")),
            "flagship" => self.ships.first().cloned().map(Property::object),
            _ => None,
        })
    }
}

pub(super) fn officer(name: &'static str) -> Officer {
    Officer {
        name,
        postings: vec!["Bridge", "Engineering", "Sickbay"],
    }
}

pub(super) fn fleet() -> Fleet {
    Fleet {
        ships: vec![
            Ship {
                name: "Enterprise",
                cost: 12.5,
                crew: vec![officer("Picard"), officer("Riker")],
            },
            Ship {
                name: "Defiant",
                cost: 3.0,
                crew: vec![officer("Sisko")],
            },
        ],
    }
}

/// Two ships with three officers each
pub(super) fn crewed_fleet() -> Fleet {
    Fleet {
        ships: vec![
            Ship {
                name: "Enterprise",
                cost: 12.5,
                crew: vec![officer("Picard"), officer("Riker"), officer("Data")],
            },
            Ship {
                name: "Defiant",
                cost: 3.0,
                crew: vec![officer("Sisko"), officer("Kira"), officer("Worf")],
            },
        ],
    }
}

pub(super) fn resolver() -> ReflectionResolver {
    ReflectionResolver::new(fleet())
}

pub(super) fn en() -> Locale {
    Locale::en_us()
}

pub(super) fn word(paragraphs: &[&str]) -> WordDocument {
    WordDocument::new(
        paragraphs
            .iter()
            .map(|p| BodyElement::Paragraph(Paragraph::new(p)))
            .collect(),
    )
}

pub(super) fn texts(doc: &WordDocument) -> Vec<String> {
    doc.body.iter().map(BodyElement::text).collect()
}

/// Single sheet with one text row per entry, at the given indices
pub(super) fn workbook(rows: &[(u32, &[&str])]) -> Workbook {
    Workbook::new(vec![Sheet::new(
        "Fleet",
        rows.iter()
            .map(|(index, cells)| SheetRow::of_texts(*index, cells))
            .collect(),
    )])
}
