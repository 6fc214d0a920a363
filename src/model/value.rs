//! Feature values and the unsettable tri-state
//!
//! A [`Value`] is what a feature slot holds: a primitive converted from its
//! lexical form, an enumeration literal or an owned child [`Entity`].

use crate::model::entity::Entity;
use crate::names::is_valid_duration;
use crate::schema::{EnumValue, FeatureType, PrimitiveKind, SchemaEnum};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use url::Url;

/// Assignment state of a single-valued feature
///
/// `Unset` reads as the feature's default. `Set(v)` is an explicit assignment
/// and stays distinguishable from `Unset` even when `v` equals the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State<T> {
    /// Never assigned; readers see the declared default
    Unset,
    /// Explicitly assigned
    Set(T),
}

impl<T> State<T> {
    /// Whether a value was explicitly assigned
    pub fn is_set(&self) -> bool {
        matches!(self, State::Set(_))
    }

    /// The assigned value
    pub fn get(&self) -> Option<&T> {
        match self {
            State::Set(v) => Some(v),
            State::Unset => None,
        }
    }

    /// The assigned value, mutably
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            State::Set(v) => Some(v),
            State::Unset => None,
        }
    }

    /// Remove the assigned value, leaving the state unset
    pub fn take(&mut self) -> Option<T> {
        match std::mem::take(self) {
            State::Set(v) => Some(v),
            State::Unset => None,
        }
    }

    /// The assigned value, or `default` when unset
    pub fn or<'a>(&'a self, default: Option<&'a T>) -> Option<&'a T> {
        self.get().or(default)
    }
}

impl<T> Default for State<T> {
    fn default() -> Self {
        State::Unset
    }
}

impl<T> From<Option<T>> for State<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(State::Unset, State::Set)
    }
}

/// A feature value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String-like primitives (string, anyURI, duration, time position)
    Text(String),
    /// `xs:boolean`
    Bool(bool),
    /// `xs:decimal` / `xs:double`
    Decimal(Decimal),
    /// `xs:integer`
    Integer(i64),
    /// Enumeration literal
    Enum(EnumValue),
    /// List of decimals
    DecimalList(Vec<Decimal>),
    /// List of integers
    IntegerList(Vec<i64>),
    /// List of names
    Names(Vec<String>),
    /// Contained child entity
    Entity(Box<Entity>),
}

impl Value {
    /// Convert a lexical value to the given primitive kind
    pub fn parse_primitive(kind: PrimitiveKind, text: &str) -> Result<Value, String> {
        let trimmed = text.trim();
        match kind {
            PrimitiveKind::String => Ok(Value::Text(text.to_string())),
            PrimitiveKind::AnyUri | PrimitiveKind::TimePosition => {
                Ok(Value::Text(trimmed.to_string()))
            }
            PrimitiveKind::Duration => {
                if is_valid_duration(trimmed) {
                    Ok(Value::Text(trimmed.to_string()))
                } else {
                    Err("not a duration".to_string())
                }
            }
            PrimitiveKind::Boolean => match trimmed {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err("expected 'true', 'false', '1' or '0'".to_string()),
            },
            PrimitiveKind::Decimal => parse_decimal(trimmed).map(Value::Decimal),
            PrimitiveKind::Integer => parse_integer(trimmed).map(Value::Integer),
            PrimitiveKind::DecimalList => trimmed
                .split_whitespace()
                .map(parse_decimal)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::DecimalList),
            PrimitiveKind::IntegerList => trimmed
                .split_whitespace()
                .map(parse_integer)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::IntegerList),
            PrimitiveKind::NameList => Ok(Value::Names(
                trimmed.split_whitespace().map(str::to_string).collect(),
            )),
        }
    }

    /// Lexical form for attributes and simple content; `None` for entities
    pub fn to_lexical(&self) -> Option<String> {
        Some(match self {
            Value::Text(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Enum(e) => e.literal().to_string(),
            Value::DecimalList(items) => join(items),
            Value::IntegerList(items) => join(items),
            Value::Names(items) => items.join(" "),
            Value::Entity(_) => return None,
        })
    }

    /// Whether the value may be held by a feature of the declared type
    pub fn conforms_to(&self, ty: &FeatureType) -> bool {
        match (ty, self) {
            (FeatureType::Primitive(kind), value) => match (kind, value) {
                (
                    PrimitiveKind::String
                    | PrimitiveKind::AnyUri
                    | PrimitiveKind::Duration
                    | PrimitiveKind::TimePosition,
                    Value::Text(_),
                ) => true,
                (PrimitiveKind::Boolean, Value::Bool(_)) => true,
                (PrimitiveKind::Decimal, Value::Decimal(_)) => true,
                (PrimitiveKind::Integer, Value::Integer(_)) => true,
                (PrimitiveKind::DecimalList, Value::DecimalList(_)) => true,
                (PrimitiveKind::IntegerList, Value::IntegerList(_)) => true,
                (PrimitiveKind::NameList, Value::Names(_)) => true,
                _ => false,
            },
            (FeatureType::Enumeration(e), Value::Enum(v)) => v.enumeration() == e.name(),
            (FeatureType::Entity(name), Value::Entity(entity)) => entity.is_a(name),
            _ => false,
        }
    }

    /// Short description of the value's type, for diagnostics
    pub fn type_label(&self) -> String {
        match self {
            Value::Text(_) => "text".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Decimal(_) => "decimal".to_string(),
            Value::Integer(_) => "integer".to_string(),
            Value::Enum(e) => format!("enumeration {}", e.enumeration()),
            Value::DecimalList(_) => "decimalList".to_string(),
            Value::IntegerList(_) => "integerList".to_string(),
            Value::Names(_) => "nameList".to_string(),
            Value::Entity(e) => format!("entity {}", e.type_name()),
        }
    }

    /// Text content, for string-like values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Decimal content
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Integer content
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Enumeration literal
    pub fn as_enum(&self) -> Option<EnumValue> {
        match self {
            Value::Enum(e) => Some(*e),
            _ => None,
        }
    }

    /// Typed enumeration literal
    pub fn as_typed_enum<T: SchemaEnum>(&self) -> Option<T> {
        self.as_enum().and_then(|e| e.to_typed())
    }

    /// Child entity
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Child entity, mutably
    pub fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Unwrap the child entity
    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Value::Entity(e) => Some(*e),
            _ => None,
        }
    }

    /// Interpret a time position as a UTC instant
    ///
    /// Accepts RFC 3339 date-times, zone-less date-times (taken as UTC) and
    /// plain dates (midnight UTC). Years, year-months and indeterminate
    /// positions yield `None`.
    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        let text = self.as_str()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.and_utc());
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Interpret a URI value as an absolute URL
    pub fn as_url(&self) -> Option<Url> {
        Url::parse(self.as_str()?.trim()).ok()
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, String> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| e.to_string())
}

fn parse_integer(text: &str) -> Result<i64, String> {
    i64::from_str(text).map_err(|e| e.to_string())
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Value::Enum(value)
    }
}

impl From<Entity> for Value {
    fn from(value: Entity) -> Self {
        Value::Entity(Box::new(value))
    }
}
