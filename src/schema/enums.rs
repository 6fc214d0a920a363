//! Enumeration descriptors
//!
//! Every schema enumeration is a closed, ordered set of [`EnumLiteral`]s. The
//! untyped [`EnumerationType`] descriptor is what the registry and the codec
//! work with; the typed Rust enums in [`crate::enums`] implement
//! [`SchemaEnum`] on top of the same literal tables, so a typed value and the
//! untyped [`EnumValue`] read from a document always agree.

use std::fmt;
use std::hash::{Hash, Hasher};

/// One literal of an enumeration: integer value, symbolic name and wire text
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct EnumLiteral {
    /// Integer value, equal to the declaration position
    pub value: i32,
    /// Symbolic name
    pub name: &'static str,
    /// Literal as it appears in XML
    pub literal: &'static str,
}

/// Descriptor of a schema enumeration
#[derive(Debug, Clone, Copy)]
pub struct EnumerationType {
    namespace: &'static str,
    name: &'static str,
    literals: &'static [EnumLiteral],
}

impl EnumerationType {
    /// Create a descriptor over a static literal table
    pub const fn new(
        namespace: &'static str,
        name: &'static str,
        literals: &'static [EnumLiteral],
    ) -> Self {
        Self {
            namespace,
            name,
            literals,
        }
    }

    /// Schema name of the enumeration, e.g. `InterpolationMethodType`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Namespace the enumeration is declared in
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// The literal table in declaration order
    pub fn literals(&self) -> &'static [EnumLiteral] {
        self.literals
    }

    /// All values in declaration order
    pub fn values(&self) -> impl Iterator<Item = EnumValue> + '_ {
        self.literals.iter().map(|literal| EnumValue {
            enumeration: self.name,
            literal,
        })
    }

    /// Look up a value by its XML literal
    pub fn by_literal(&self, text: &str) -> Option<EnumValue> {
        self.find(|l| l.literal == text)
    }

    /// Look up a value by its symbolic name
    pub fn by_name(&self, name: &str) -> Option<EnumValue> {
        self.find(|l| l.name == name)
    }

    /// Look up a value by its integer value
    pub fn by_value(&self, value: i32) -> Option<EnumValue> {
        self.find(|l| l.value == value)
    }

    fn find(&self, predicate: impl Fn(&EnumLiteral) -> bool) -> Option<EnumValue> {
        self.literals
            .iter()
            .find(|l| predicate(l))
            .map(|literal| EnumValue {
                enumeration: self.name,
                literal,
            })
    }
}

impl PartialEq for EnumerationType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }
}

impl Eq for EnumerationType {}

/// A value of some enumeration, independent of the typed Rust enum
#[derive(Clone, Copy)]
pub struct EnumValue {
    enumeration: &'static str,
    literal: &'static EnumLiteral,
}

impl EnumValue {
    /// Name of the enumeration this value belongs to
    pub fn enumeration(&self) -> &'static str {
        self.enumeration
    }

    /// XML literal
    pub fn literal(&self) -> &'static str {
        self.literal.literal
    }

    /// Symbolic name
    pub fn name(&self) -> &'static str {
        self.literal.name
    }

    /// Integer value
    pub fn value(&self) -> i32 {
        self.literal.value
    }

    /// Convert to the typed enum, if this value belongs to it
    pub fn to_typed<T: SchemaEnum>(&self) -> Option<T> {
        if self.enumeration == T::ENUMERATION.name() {
            T::by_value(self.value())
        } else {
            None
        }
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.enumeration == other.enumeration && self.literal.value == other.literal.value
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.enumeration.hash(state);
        self.literal.value.hash(state);
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.enumeration, self.literal.name)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal.literal)
    }
}

/// A typed Rust enum mirroring a schema enumeration
pub trait SchemaEnum: Copy + Eq + std::hash::Hash + fmt::Debug + 'static {
    /// The untyped descriptor sharing this enum's literal table
    const ENUMERATION: EnumerationType;

    /// Integer value of this literal
    fn value(self) -> i32;

    /// Look up a value by its integer value
    fn by_value(value: i32) -> Option<Self>;

    /// Look up a value by its XML literal
    fn by_literal(text: &str) -> Option<Self> {
        Self::ENUMERATION
            .by_literal(text)
            .and_then(|v| Self::by_value(v.value()))
    }

    /// Look up a value by its symbolic name
    fn by_name(name: &str) -> Option<Self> {
        Self::ENUMERATION
            .by_name(name)
            .and_then(|v| Self::by_value(v.value()))
    }

    /// All values in declaration order
    fn values() -> Vec<Self> {
        Self::ENUMERATION
            .literals()
            .iter()
            .filter_map(|l| Self::by_value(l.value))
            .collect()
    }

    /// The untyped value
    fn to_enum_value(self) -> EnumValue {
        let literals = Self::ENUMERATION.literals();
        let literal = literals
            .iter()
            .find(|l| l.value == self.value())
            .unwrap_or(&literals[0]);
        EnumValue {
            enumeration: Self::ENUMERATION.name(),
            literal,
        }
    }

    /// XML literal
    fn literal(self) -> &'static str {
        self.to_enum_value().literal()
    }

    /// Symbolic name
    fn name(self) -> &'static str {
        self.to_enum_value().name()
    }
}

/// Declare a typed enum over a schema enumeration's literal table
///
/// Variants must be listed in declaration order; their integer values are the
/// positions in that order.
#[macro_export]
macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $ty:ident in $ns:expr, $schema_name:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, $name:literal => $literal:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $ty {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $ty {
            const LITERALS: &'static [$crate::schema::EnumLiteral] = &[
                $( $crate::schema::EnumLiteral { value: $value, name: $name, literal: $literal }, )+
            ];
        }

        impl $crate::schema::SchemaEnum for $ty {
            const ENUMERATION: $crate::schema::EnumerationType =
                $crate::schema::EnumerationType::new($ns, $schema_name, Self::LITERALS);

            fn value(self) -> i32 {
                self as i32
            }

            fn by_value(value: i32) -> Option<Self> {
                match value {
                    $( $value => Some($ty::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$ty> for $crate::model::Value {
            fn from(value: $ty) -> Self {
                $crate::model::Value::Enum($crate::schema::SchemaEnum::to_enum_value(value))
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::schema::SchemaEnum::literal(*self))
            }
        }
    };
}
