//! Bean graph abstraction
//!
//! A [`Bean`] is any application object that exposes named properties and
//! the format directives declared on its fields. The resolver only ever
//! sees beans through this trait.

use crate::error::Result;
use crate::format::FormatDirective;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub trait Bean: Send + Sync + fmt::Debug {
    /// Name used in log lines and access-fault errors
    fn type_name(&self) -> &str;

    /// Read a property
    ///
    /// `Ok(None)` means the bean has no such property. An `Err` means the
    /// property exists but could not be read and aborts generation.
    fn property(&self, name: &str) -> Result<Option<Property>>;

    /// Format directives declared on `field`
    fn directives(&self, _field: &str) -> Vec<FormatDirective> {
        Vec::new()
    }
}

/// A property value read from a bean
#[derive(Debug, Clone)]
pub enum Property {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    /// Enumerated value, rendered by its name
    Enum(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Path(PathBuf),
    List(Vec<Property>),
    Object(Arc<dyn Bean>),
}

impl Property {
    pub fn object<B: Bean + 'static>(bean: B) -> Self {
        Property::Object(Arc::new(bean))
    }

    pub fn list<T: Into<Property>>(items: impl IntoIterator<Item = T>) -> Self {
        Property::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Property::Null)
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::Text(value.to_string())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::Text(value)
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}

impl From<i64> for Property {
    fn from(value: i64) -> Self {
        Property::Int(value)
    }
}

impl From<i32> for Property {
    fn from(value: i32) -> Self {
        Property::Int(value.into())
    }
}

impl From<u32> for Property {
    fn from(value: u32) -> Self {
        Property::Int(value.into())
    }
}

impl From<f64> for Property {
    fn from(value: f64) -> Self {
        Property::Float(value)
    }
}

impl From<Decimal> for Property {
    fn from(value: Decimal) -> Self {
        Property::Decimal(value)
    }
}

impl From<NaiveDate> for Property {
    fn from(value: NaiveDate) -> Self {
        Property::Date(value)
    }
}

impl From<NaiveTime> for Property {
    fn from(value: NaiveTime) -> Self {
        Property::Time(value)
    }
}

impl From<NaiveDateTime> for Property {
    fn from(value: NaiveDateTime) -> Self {
        Property::DateTime(value)
    }
}

impl From<PathBuf> for Property {
    fn from(value: PathBuf) -> Self {
        Property::Path(value)
    }
}

impl From<Arc<dyn Bean>> for Property {
    fn from(value: Arc<dyn Bean>) -> Self {
        Property::Object(value)
    }
}

impl<T: Into<Property>> From<Vec<T>> for Property {
    fn from(value: Vec<T>) -> Self {
        Property::list(value)
    }
}

impl<T: Into<Property>> From<Option<T>> for Property {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Property::Null)
    }
}
