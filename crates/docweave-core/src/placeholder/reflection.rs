//! Resolver over a bean graph
//!
//! A dotted path is resolved one segment at a time. Each segment is asked of
//! the result of the previous one, so intermediate values are always wrapped
//! in a one-element SET whose resolver continues the chain.

use super::bean::Property;
use super::custom::ImagePlaceholder;
use super::data::{PlaceholderData, PlaceholderSet};
use super::registry::{CustomPlaceholderRegistry, NoCustomPlaceholders};
use super::resolver::PlaceholderResolver;
use super::Bean;
use crate::error::Result;
use crate::format::{
    find_image_directive, find_number_format, find_temporal_format, FormatDirective, Number,
    Temporal,
};
use crate::locale::Locale;
use std::fmt;
use std::sync::Arc;

/// Names the wrapped value itself
pub const SELF_REFERENCE: &str = "this";

#[derive(Clone)]
pub struct ReflectionResolver {
    value: Property,
    registry: Arc<dyn CustomPlaceholderRegistry>,
}

impl ReflectionResolver {
    /// Resolver over `bean` with no custom placeholders
    pub fn new<B: Bean + 'static>(bean: B) -> Self {
        Self::of(Property::object(bean))
    }

    pub fn of(value: Property) -> Self {
        Self::with_registry(value, Arc::new(NoCustomPlaceholders))
    }

    pub fn with_registry(value: Property, registry: Arc<dyn CustomPlaceholderRegistry>) -> Self {
        Self { value, registry }
    }

    pub fn value(&self) -> &Property {
        &self.value
    }

    /// Element resolvers share the registry of their parent
    fn child(&self, value: Property) -> Arc<dyn PlaceholderResolver> {
        Arc::new(Self::with_registry(value, Arc::clone(&self.registry)))
    }

    fn resolve_segment(&self, name: &str, locale: &Locale) -> Result<Option<PlaceholderData>> {
        if self.registry.governs(name) {
            return Ok(self.registry.resolve(name));
        }

        if name == SELF_REFERENCE {
            return self.classify(name, self.value.clone(), &[], locale);
        }

        let Property::Object(bean) = &self.value else {
            tracing::debug!("Did not find placeholder {} on a plain value", name);
            return Ok(None);
        };

        match bean.property(name)? {
            Some(property) => {
                let directives = bean.directives(name);
                self.classify(name, property, &directives, locale)
            }
            None => {
                tracing::debug!("Did not find placeholder {} on {}", name, bean.type_name());
                Ok(None)
            }
        }
    }

    fn classify(
        &self,
        name: &str,
        property: Property,
        directives: &[FormatDirective],
        locale: &Locale,
    ) -> Result<Option<PlaceholderData>> {
        let number = |n: Number| -> Result<Option<PlaceholderData>> {
            let format = find_number_format(directives, name, locale)?;
            Ok(Some(PlaceholderData::Scalar(format.format(n))))
        };
        let temporal = |t: Temporal| -> Result<Option<PlaceholderData>> {
            let format = find_temporal_format(directives, name, locale, &t)?;
            Ok(Some(PlaceholderData::Scalar(format.format(&t)?)))
        };

        match property {
            Property::Null => Ok(None),
            Property::Int(i) => number(Number::Int(i)),
            Property::Float(f) => number(Number::Float(f)),
            Property::Decimal(d) => number(Number::Decimal(d)),
            Property::Bool(b) => Ok(Some(PlaceholderData::Scalar(b.to_string()))),
            Property::Text(s) | Property::Enum(s) => Ok(Some(PlaceholderData::Scalar(s))),
            Property::List(items) => {
                let resolvers = items.into_iter().map(|item| self.child(item)).collect();
                Ok(Some(PlaceholderData::Set(PlaceholderSet::new(resolvers))))
            }
            Property::Date(d) => temporal(Temporal::Date(d)),
            Property::Time(t) => temporal(Temporal::Time(t)),
            Property::DateTime(dt) => temporal(Temporal::DateTime(dt)),
            Property::Path(path) => match find_image_directive(directives) {
                Some(max_width) => Ok(Some(PlaceholderData::custom(
                    ImagePlaceholder::new(path).with_max_width(max_width),
                ))),
                None => Ok(Some(self.wrap(Property::Path(path)))),
            },
            other @ Property::Object(_) => Ok(Some(self.wrap(other))),
        }
    }

    /// One-element SET continuing the chain on `value`
    fn wrap(&self, value: Property) -> PlaceholderData {
        PlaceholderData::Set(PlaceholderSet::single(self.child(value)))
    }
}

impl PlaceholderResolver for ReflectionResolver {
    fn resolve(&self, path: &str, locale: &Locale) -> Result<Option<PlaceholderData>> {
        tracing::debug!("Trying to resolve placeholder {}", path);

        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut result = self.resolve_segment(first, locale)?;

        for segment in segments {
            let next = match result.as_ref().and_then(PlaceholderData::as_set) {
                Some(set) => match set.first() {
                    Some(resolver) => resolver.resolve(segment, locale)?,
                    None => None,
                },
                None => None,
            };
            if next.is_none() {
                tracing::debug!("Did not find segment {} of placeholder {}", segment, path);
                return Ok(None);
            }
            result = next;
        }

        Ok(result)
    }
}

impl fmt::Debug for ReflectionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionResolver")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocweaveError;
    use crate::placeholder::data::PlaceholderType;
    use crate::placeholder::registry::CustomPlaceholderRegistryImpl;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    #[derive(Debug, Clone)]
    struct Crew {
        name: &'static str,
        rank: &'static str,
    }

    impl Bean for Crew {
        fn type_name(&self) -> &str {
            "Crew"
        }

        fn property(&self, name: &str) -> Result<Option<Property>> {
            Ok(match name {
                "name" => Some(self.name.into()),
                "rank" => Some(Property::Enum(self.rank.to_string())),
                "me" => Some(Property::object(self.clone())),
                _ => None,
            })
        }
    }

    #[derive(Debug)]
    struct Ship {
        fields: HashMap<&'static str, Property>,
    }

    impl Bean for Ship {
        fn type_name(&self) -> &str {
            "Ship"
        }

        fn property(&self, name: &str) -> Result<Option<Property>> {
            if name == "warpCore" {
                return Err(DocweaveError::AccessFault {
                    bean: "Ship".into(),
                    property: name.into(),
                    reason: "core breach".into(),
                });
            }
            Ok(self.fields.get(name).cloned())
        }

        fn directives(&self, field: &str) -> Vec<FormatDirective> {
            match field {
                "cost" => vec![FormatDirective::money("USD")],
                "commissioned" => vec![FormatDirective::date_time("dd.MM.yyyy")],
                _ => Vec::new(),
            }
        }
    }

    fn enterprise() -> ReflectionResolver {
        let crew = vec![
            Property::object(Crew {
                name: "Jean-Luc Picard",
                rank: "CAPTAIN",
            }),
            Property::object(Crew {
                name: "William Riker",
                rank: "COMMANDER",
            }),
        ];
        let fields = HashMap::from([
            ("name", Property::from("USS Enterprise")),
            ("crew", Property::List(crew)),
            ("cost", Property::Float(12.5)),
            ("decks", Property::Int(42)),
            (
                "commissioned",
                Property::Date(NaiveDate::from_ymd_opt(2363, 10, 4).unwrap()),
            ),
            ("registry", Property::Null),
        ]);
        ReflectionResolver::new(Ship { fields })
    }

    fn scalar(resolver: &ReflectionResolver, path: &str) -> Option<String> {
        resolver
            .resolve(path, &Locale::en_us())
            .unwrap()
            .and_then(|d| d.as_scalar().map(str::to_string))
    }

    #[test]
    fn test_scalar_properties() {
        let resolver = enterprise();
        assert_eq!(scalar(&resolver, "name").as_deref(), Some("USS Enterprise"));
        assert_eq!(scalar(&resolver, "decks").as_deref(), Some("42"));
        assert_eq!(scalar(&resolver, "cost").as_deref(), Some("$12.50"));
        assert_eq!(scalar(&resolver, "commissioned").as_deref(), Some("04.10.2363"));
    }

    #[test]
    fn test_collection_becomes_set() {
        let data = enterprise()
            .resolve("crew", &Locale::en_us())
            .unwrap()
            .unwrap();
        assert_eq!(data.kind(), PlaceholderType::Set);
        let set = data.as_set().unwrap();
        assert_eq!(set.size(), 2);

        let names: Vec<String> = set
            .iter()
            .map(|r| {
                r.resolve("name", &Locale::en_us())
                    .unwrap()
                    .unwrap()
                    .as_scalar()
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(names, vec!["Jean-Luc Picard", "William Riker"]);
    }

    #[test]
    fn test_dotted_path_follows_first_element() {
        let resolver = enterprise();
        assert_eq!(
            scalar(&resolver, "crew.name").as_deref(),
            Some("Jean-Luc Picard")
        );
        assert_eq!(scalar(&resolver, "crew.rank").as_deref(), Some("CAPTAIN"));
    }

    #[test]
    fn test_missing_paths_are_none() {
        let resolver = enterprise();
        assert!(scalar(&resolver, "captain").is_none());
        assert!(scalar(&resolver, "crew.species").is_none());
        assert!(scalar(&resolver, "unknown.name").is_none());
        assert!(scalar(&resolver, "registry").is_none());
        assert!(scalar(&resolver, "name.length").is_none());
    }

    #[test]
    fn test_self_reference_terminates() {
        let resolver = enterprise();
        let data = resolver.resolve("this", &Locale::en_us()).unwrap().unwrap();
        assert_eq!(data.as_set().unwrap().size(), 1);
        assert_eq!(
            scalar(&resolver, "this.this.this.name").as_deref(),
            Some("USS Enterprise")
        );
        assert_eq!(
            scalar(&resolver, "crew.me.me.name").as_deref(),
            Some("Jean-Luc Picard")
        );
    }

    #[test]
    fn test_this_on_plain_value() {
        let resolver = ReflectionResolver::of(Property::from("Data"));
        assert_eq!(scalar(&resolver, "this").as_deref(), Some("Data"));
        assert!(scalar(&resolver, "name").is_none());
    }

    #[test]
    fn test_access_fault_is_an_error() {
        let result = enterprise().resolve("warpCore", &Locale::en_us());
        assert!(matches!(result, Err(DocweaveError::AccessFault { .. })));
    }

    #[test]
    fn test_registry_shadows_properties() {
        let mut registry = CustomPlaceholderRegistryImpl::with_builtins();
        registry.register("name", || crate::placeholder::custom::TableOfContents);
        let resolver = ReflectionResolver::with_registry(
            enterprise().value().clone(),
            Arc::new(registry),
        );
        let data = resolver.resolve("name", &Locale::en_us()).unwrap().unwrap();
        assert_eq!(data.kind(), PlaceholderType::Custom);

        // Element resolvers inherit the registry
        let data = resolver.resolve("crew.toc", &Locale::en_us()).unwrap().unwrap();
        assert_eq!(data.kind(), PlaceholderType::Custom);
    }

    #[test]
    fn test_image_directive_yields_custom() {
        #[derive(Debug)]
        struct Profile;

        impl Bean for Profile {
            fn type_name(&self) -> &str {
                "Profile"
            }

            fn property(&self, name: &str) -> Result<Option<Property>> {
                Ok(match name {
                    "photo" | "resume" => Some(Property::Path("picard.png".into())),
                    _ => None,
                })
            }

            fn directives(&self, field: &str) -> Vec<FormatDirective> {
                match field {
                    "photo" => vec![FormatDirective::image(Some(100))],
                    _ => Vec::new(),
                }
            }
        }

        let resolver = ReflectionResolver::new(Profile);
        let photo = resolver.resolve("photo", &Locale::en_us()).unwrap().unwrap();
        assert_eq!(photo.kind(), PlaceholderType::Custom);
        let resume = resolver.resolve("resume", &Locale::en_us()).unwrap().unwrap();
        assert_eq!(resume.kind(), PlaceholderType::Set);
    }
}
