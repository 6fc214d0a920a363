//! Features: the typed slots of an entity type
//!
//! A [`Feature`] describes one attribute, child element, simple-content value,
//! choice group or wildcard of a complex type, together with its cardinality,
//! default and unsettable flag.

use crate::error::SchemaError;
use crate::model::Value;
use crate::namespaces::QName;
use crate::schema::enums::{EnumerationType, SchemaEnum};
use std::fmt;

/// Primitive value kinds carried by attributes and simple elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `xs:string` and derived token types
    String,
    /// `xs:anyURI`
    AnyUri,
    /// `xs:boolean`
    Boolean,
    /// `xs:decimal` / `xs:double`
    Decimal,
    /// `xs:integer` and its positive/non-negative restrictions
    Integer,
    /// `gml:TimeDurationType`
    Duration,
    /// `gml:TimePositionUnion` (date, dateTime, year, ...)
    TimePosition,
    /// whitespace-separated list of doubles (`gml:doubleList`)
    DecimalList,
    /// whitespace-separated list of integers (`gml:integerList`)
    IntegerList,
    /// whitespace-separated list of names (`gml:NameList`)
    NameList,
}

impl PrimitiveKind {
    /// Short label used in diagnostics and registry dumps
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::AnyUri => "anyURI",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Duration => "duration",
            PrimitiveKind::TimePosition => "timePosition",
            PrimitiveKind::DecimalList => "decimalList",
            PrimitiveKind::IntegerList => "integerList",
            PrimitiveKind::NameList => "nameList",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a feature's values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureType {
    /// A primitive value
    Primitive(PrimitiveKind),
    /// A literal of an enumeration
    Enumeration(EnumerationType),
    /// A contained entity of this type (or a subtype)
    Entity(QName),
    /// A choice group holding the entries of its member features
    Group,
    /// Wildcard content kept verbatim
    Any,
}

impl FeatureType {
    /// `xs:string`
    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    /// `xs:anyURI`
    pub fn any_uri() -> Self {
        Self::Primitive(PrimitiveKind::AnyUri)
    }

    /// `xs:boolean`
    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    /// Values of the typed enumeration `T`
    pub fn enumeration<T: SchemaEnum>() -> Self {
        Self::Enumeration(T::ENUMERATION)
    }

    /// Contained entity of the named type
    pub fn entity(type_name: QName) -> Self {
        Self::Entity(type_name)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Primitive(kind) => write!(f, "{}", kind),
            FeatureType::Enumeration(e) => write!(f, "enumeration {}", e.name()),
            FeatureType::Entity(name) => write!(f, "entity {}", name.local_name),
            FeatureType::Group => f.write_str("group"),
            FeatureType::Any => f.write_str("any"),
        }
    }
}

/// How a feature is bound to XML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlKind {
    /// An attribute of the element
    Attribute,
    /// A child element
    Element,
    /// The element's own character content
    SimpleContent,
    /// A repeating choice whose members are other element features
    Group,
    /// Arbitrary child content
    Wildcard,
}

impl XmlKind {
    /// Short label used in registry dumps
    pub fn as_str(&self) -> &'static str {
        match self {
            XmlKind::Attribute => "attribute",
            XmlKind::Element => "element",
            XmlKind::SimpleContent => "simpleContent",
            XmlKind::Group => "group",
            XmlKind::Wildcard => "any",
        }
    }
}

/// Occurrence bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occurs {
    /// Minimum number of occurrences
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Exactly once (1, 1)
    pub fn once() -> Self {
        Self::new(1, Some(1))
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self::new(0, Some(1))
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self::new(0, None)
    }

    /// One or more (1, unbounded)
    pub fn one_or_more() -> Self {
        Self::new(1, None)
    }

    /// Whether the feature must be populated
    pub fn is_required(&self) -> bool {
        self.min > 0
    }

    /// Whether the feature holds a list
    pub fn is_multiple(&self) -> bool {
        self.max != Some(1)
    }

    /// Whether `count` occurrences exceed the upper bound
    pub fn is_exceeded_by(&self, count: usize) -> bool {
        self.max.map_or(false, |max| count > max as usize)
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

/// A named, typed slot on an entity type
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    name: String,
    kind: XmlKind,
    xml_name: QName,
    ty: FeatureType,
    occurs: Occurs,
    default: Option<&'static str>,
    default_value: Option<Value>,
    unsettable: bool,
    group: Option<String>,
}

impl Feature {
    fn new(name: impl Into<String>, kind: XmlKind, xml_name: QName, ty: FeatureType) -> Self {
        Self {
            name: name.into(),
            kind,
            xml_name,
            ty,
            occurs: Occurs::optional(),
            default: None,
            default_value: None,
            unsettable: false,
            group: None,
        }
    }

    /// An unqualified attribute named `name`
    pub fn attribute(name: &str, ty: FeatureType) -> Self {
        Self::new(name, XmlKind::Attribute, QName::local(name), ty)
    }

    /// A child element; the feature takes the element's local name
    pub fn element(xml_name: QName, ty: FeatureType) -> Self {
        Self::new(xml_name.local_name.clone(), XmlKind::Element, xml_name, ty)
    }

    /// The element's character content
    pub fn simple_content(name: &str, ty: FeatureType) -> Self {
        Self::new(name, XmlKind::SimpleContent, QName::local(name), ty)
    }

    /// A repeating choice group
    pub fn group(name: &str) -> Self {
        Self::new(name, XmlKind::Group, QName::local(name), FeatureType::Group)
            .occurs(0, None)
    }

    /// Wildcard content; occurrences count the captured child elements
    pub fn wildcard(name: &str) -> Self {
        Self::new(name, XmlKind::Wildcard, QName::local(name), FeatureType::Any)
            .occurs(0, None)
    }

    /// Rename the feature (the XML binding is unchanged)
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Put an attribute into a namespace
    pub fn qualified(mut self, namespace: &str) -> Self {
        self.xml_name.namespace = Some(namespace.to_string());
        self
    }

    /// Set explicit occurrence bounds
    pub fn occurs(mut self, min: u32, max: Option<u32>) -> Self {
        self.occurs = Occurs::new(min, max);
        self
    }

    /// Exactly once
    pub fn required(mut self) -> Self {
        self.occurs.min = 1;
        self
    }

    /// Unbounded list, keeping the lower bound
    pub fn many(mut self) -> Self {
        self.occurs.max = None;
        self
    }

    /// Declared default literal
    pub fn default(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    /// Track explicit assignment separately from the default
    pub fn unsettable(mut self) -> Self {
        self.unsettable = true;
        self
    }

    /// Make this element a member of the named group
    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Feature name, unique within the effective type
    pub fn name(&self) -> &str {
        &self.name
    }

    /// XML binding kind
    pub fn kind(&self) -> XmlKind {
        self.kind
    }

    /// Element or attribute name on the wire
    pub fn xml_name(&self) -> &QName {
        &self.xml_name
    }

    /// Declared value type
    pub fn ty(&self) -> &FeatureType {
        &self.ty
    }

    /// Occurrence bounds
    pub fn occurrence(&self) -> Occurs {
        self.occurs
    }

    /// Declared default literal
    pub fn default_literal(&self) -> Option<&'static str> {
        self.default
    }

    /// Default converted to a value
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Whether explicit assignment is tracked separately from the default
    pub fn is_unsettable(&self) -> bool {
        self.unsettable
    }

    /// Group this element belongs to
    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Whether the feature must be populated before writing
    pub fn is_required(&self) -> bool {
        self.occurs.is_required()
    }

    /// Whether the feature holds a list of values
    pub fn is_many(&self) -> bool {
        self.occurs.is_multiple()
    }

    /// Whether the feature holds contained entities
    pub fn is_containment(&self) -> bool {
        matches!(self.ty, FeatureType::Entity(_))
    }

    /// Whether the feature may be left empty because its default fills in
    pub fn is_satisfied_by_default(&self) -> bool {
        self.default_value.is_some()
    }

    /// Convert a lexical value according to the declared type
    pub fn parse_lexical(&self, text: &str) -> Result<Value, SchemaError> {
        match &self.ty {
            FeatureType::Primitive(kind) => {
                Value::parse_primitive(*kind, text).map_err(|reason| SchemaError::InvalidValue {
                    feature: self.name.clone(),
                    value: text.to_string(),
                    reason,
                })
            }
            FeatureType::Enumeration(enumeration) => enumeration
                .by_literal(text.trim())
                .map(Value::Enum)
                .ok_or_else(|| SchemaError::InvalidEnumLiteral {
                    enumeration: enumeration.name().to_string(),
                    literal: text.to_string(),
                }),
            other => Err(SchemaError::TypeMismatch {
                feature: self.name.clone(),
                expected: other.to_string(),
                found: "text".to_string(),
            }),
        }
    }

    /// Check that a value conforms to the declared type
    pub fn check_value(&self, value: &Value) -> Result<(), SchemaError> {
        if value.conforms_to(&self.ty) {
            Ok(())
        } else {
            Err(SchemaError::TypeMismatch {
                feature: self.name.clone(),
                expected: self.ty.to_string(),
                found: value.type_label(),
            })
        }
    }

    /// Convert the default literal once the feature is registered
    pub(crate) fn resolve_default(&mut self) -> Result<(), SchemaError> {
        if let Some(literal) = self.default {
            let value = self.parse_lexical(literal).map_err(|e| {
                SchemaError::SchemaDefinition(format!("bad default for '{}': {}", self.name, e))
            })?;
            self.default_value = Some(value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::InterpolationMethod;
    use crate::namespaces::{WCS_NAMESPACE, XLINK_NAMESPACE};

    #[test]
    fn test_occurs() {
        assert!(Occurs::once().is_required());
        assert!(!Occurs::once().is_multiple());
        assert!(Occurs::one_or_more().is_multiple());
        assert!(Occurs::new(0, Some(2)).is_exceeded_by(3));
        assert!(!Occurs::zero_or_more().is_exceeded_by(1000));
        assert_eq!(Occurs::one_or_more().to_string(), "1..*");
    }

    #[test]
    fn test_builder() {
        let f = Feature::attribute("href", FeatureType::any_uri()).qualified(XLINK_NAMESPACE);
        assert_eq!(f.name(), "href");
        assert_eq!(f.xml_name(), &QName::xlink("href"));
        assert_eq!(f.kind(), XmlKind::Attribute);
        assert!(!f.is_required());

        let f = Feature::element(QName::wcs("keyword"), FeatureType::string())
            .required()
            .many();
        assert_eq!(f.occurrence(), Occurs::one_or_more());
        assert!(f.is_many());
    }

    #[test]
    fn test_default_resolution() {
        let mut f = Feature::element(
            QName::namespaced(WCS_NAMESPACE, "interpolationMethod"),
            FeatureType::enumeration::<InterpolationMethod>(),
        )
        .default("nearest neighbor")
        .unsettable();
        f.resolve_default().unwrap();
        assert_eq!(
            f.default_value(),
            Some(&Value::from(InterpolationMethod::NearestNeighbor))
        );

        let mut bad = Feature::attribute("atomic", FeatureType::boolean()).default("maybe");
        assert!(matches!(
            bad.resolve_default(),
            Err(SchemaError::SchemaDefinition(_))
        ));
    }

    #[test]
    fn test_parse_lexical_errors() {
        let f = Feature::attribute("closure", FeatureType::enumeration::<InterpolationMethod>());
        assert_eq!(
            f.parse_lexical("bogus"),
            Err(SchemaError::InvalidEnumLiteral {
                enumeration: "InterpolationMethodType".to_string(),
                literal: "bogus".to_string(),
            })
        );

        let f = Feature::attribute("atomic", FeatureType::boolean());
        assert!(matches!(
            f.parse_lexical("yes"),
            Err(SchemaError::InvalidValue { .. })
        ));
        assert_eq!(f.parse_lexical("1"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_check_value() {
        let f = Feature::element(QName::wcs("output"), FeatureType::entity(QName::wcs("OutputType")));
        let err = f.check_value(&Value::Text("x".to_string())).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
    }
}
