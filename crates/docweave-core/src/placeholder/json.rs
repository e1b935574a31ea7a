//! Beans backed by JSON data
//!
//! JSON carries no field metadata, so directives come from a separate
//! [`DirectiveSchema`] tree that mirrors the data's nesting:
//!
//! ```toml
//! type_name = "Captain"
//!
//! [fields]
//! birthdate = { kind = "date_time", pattern = "dd.MM.yyyy" }
//!
//! [children.ships.fields]
//! cost = { kind = "money", currency_code = "USD" }
//! ```
//!
//! Strings become dates, times or paths only where a directive says so.

use super::bean::{Bean, Property};
use crate::error::{DocweaveError, Result};
use crate::format::FormatDirective;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectiveSchema {
    pub type_name: Option<String>,
    pub fields: HashMap<String, FormatDirective>,
    /// Schemas of nested objects and of list elements, by field
    pub children: HashMap<String, DirectiveSchema>,
}

impl DirectiveSchema {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DocweaveError::ConfigParseError(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_field(mut self, field: &str, directive: FormatDirective) -> Self {
        self.fields.insert(field.to_string(), directive);
        self
    }

    pub fn with_child(mut self, field: &str, schema: DirectiveSchema) -> Self {
        self.children.insert(field.to_string(), schema);
        self
    }

    fn child(&self, field: &str) -> DirectiveSchema {
        self.children.get(field).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct JsonBean {
    value: Value,
    schema: Arc<DirectiveSchema>,
}

impl JsonBean {
    pub fn new(value: Value, schema: DirectiveSchema) -> Self {
        Self {
            value,
            schema: Arc::new(schema),
        }
    }

    pub fn from_serialize<T: Serialize>(value: &T, schema: DirectiveSchema) -> Result<Self> {
        Ok(Self::new(serde_json::to_value(value)?, schema))
    }

    pub fn from_file(path: &Path, schema: DirectiveSchema) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&content)?, schema))
    }

    fn convert(&self, field: &str, value: &Value, schema: &DirectiveSchema) -> Result<Property> {
        let directive = self.schema.fields.get(field);
        Ok(match value {
            Value::Null => Property::Null,
            Value::Bool(b) => Property::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Property::Int(i),
                None => Property::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => match directive {
                Some(FormatDirective::DateTime { .. }) => self.parse_temporal(field, s)?,
                Some(FormatDirective::Image { .. }) => Property::Path(PathBuf::from(s)),
                _ => Property::Text(s.clone()),
            },
            Value::Array(items) => Property::List(
                items
                    .iter()
                    .map(|item| self.convert(field, item, schema))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(_) => Property::object(JsonBean::new(value.clone(), schema.clone())),
        })
    }

    fn parse_temporal(&self, field: &str, text: &str) -> Result<Property> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Property::DateTime(dt));
        }
        if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Ok(Property::Date(d));
        }
        if let Ok(t) = NaiveTime::parse_from_str(text, "%H:%M:%S%.f") {
            return Ok(Property::Time(t));
        }
        if let Ok(t) = NaiveTime::parse_from_str(text, "%H:%M") {
            return Ok(Property::Time(t));
        }
        Err(DocweaveError::AccessFault {
            bean: self.type_name().to_string(),
            property: field.to_string(),
            reason: format!("'{}' is not an ISO date, time or date-time", text),
        })
    }
}

impl Bean for JsonBean {
    fn type_name(&self) -> &str {
        self.schema.type_name.as_deref().unwrap_or("object")
    }

    fn property(&self, name: &str) -> Result<Option<Property>> {
        let Some(value) = self.value.as_object().and_then(|map| map.get(name)) else {
            return Ok(None);
        };
        let child = self.schema.child(name);
        self.convert(name, value, &child).map(Some)
    }

    fn directives(&self, field: &str) -> Vec<FormatDirective> {
        self.schema.fields.get(field).cloned().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn captain() -> JsonBean {
        let schema = DirectiveSchema::from_toml_str(
            r#"
type_name = "Captain"

[fields]
birthdate = { kind = "date_time", pattern = "dd.MM.yyyy" }
portrait = { kind = "image", max_width = 120 }

[children.ships.fields]
launched = { kind = "date_time", pattern = "yyyy" }
"#,
        )
        .unwrap();
        JsonBean::new(
            json!({
                "name": "Jean-Luc Picard",
                "birthdate": "1948-09-23",
                "portrait": "picard.png",
                "age": 72,
                "ships": [{ "name": "Stargazer", "launched": "2333-01-01" }]
            }),
            schema,
        )
    }

    #[test]
    fn test_string_conversion_follows_directives() {
        let bean = captain();
        assert!(matches!(
            bean.property("name").unwrap(),
            Some(Property::Text(ref s)) if s == "Jean-Luc Picard"
        ));
        assert!(matches!(
            bean.property("birthdate").unwrap(),
            Some(Property::Date(d)) if d == NaiveDate::from_ymd_opt(1948, 9, 23).unwrap()
        ));
        assert!(matches!(
            bean.property("portrait").unwrap(),
            Some(Property::Path(_))
        ));
        assert!(matches!(bean.property("age").unwrap(), Some(Property::Int(72))));
        assert!(bean.property("rank").unwrap().is_none());
    }

    #[test]
    fn test_children_carry_their_schema() {
        let bean = captain();
        let Some(Property::List(ships)) = bean.property("ships").unwrap() else {
            panic!("Expected a list of ships");
        };
        let Property::Object(ship) = &ships[0] else {
            panic!("Expected ship object");
        };
        assert!(matches!(
            ship.property("launched").unwrap(),
            Some(Property::Date(_))
        ));
        assert_eq!(
            ship.directives("launched"),
            vec![FormatDirective::date_time("yyyy")]
        );
    }

    #[test]
    fn test_bad_date_is_access_fault() {
        let schema =
            DirectiveSchema::default().with_field("born", FormatDirective::date_time("yyyy"));
        let bean = JsonBean::new(json!({ "born": "stardate 41153.7" }), schema);
        assert!(matches!(
            bean.property("born"),
            Err(DocweaveError::AccessFault { .. })
        ));
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Planet {
            name: String,
            moons: u32,
        }

        let bean = JsonBean::from_serialize(
            &Planet {
                name: "Vulcan".into(),
                moons: 0,
            },
            DirectiveSchema::default(),
        )
        .unwrap();
        assert!(matches!(bean.property("moons").unwrap(), Some(Property::Int(0))));
        assert_eq!(bean.type_name(), "object");
    }
}
