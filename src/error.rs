//! Error types for wcs10
//!
//! [`SchemaError`] is the schema-level taxonomy shared by the registry, the
//! model and the codec. [`Error`] is the crate-wide error returned by the
//! fallible entry points; it wraps schema errors together with XML syntax and
//! I/O failures.

use std::fmt;
use thiserror::Error;

/// Result type alias using the wcs10 [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wcs10 operations
#[derive(Error, Debug)]
pub enum Error {
    /// Schema error raised by an API call (registry lookup, model mutation)
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Fatal problem found while reading a document
    #[error("invalid document: {0}")]
    Invalid(Diagnostic),

    /// The model failed write validation; nothing was emitted
    #[error("model cannot be serialized: {}", summarize(.0))]
    Unserializable(Vec<Diagnostic>),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML syntax error reported by the event source or the writer
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The schema error behind this error, if there is one
    ///
    /// For [`Error::Unserializable`] this is the first reported problem.
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Error::Schema(e) => Some(e),
            Error::Invalid(d) => Some(&d.error),
            Error::Unserializable(all) => all.first().map(|d| &d.error),
            _ => None,
        }
    }

    /// All diagnostics carried by this error
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Invalid(d) => std::slice::from_ref(d),
            Error::Unserializable(all) => all,
            _ => &[],
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::Xml(e.to_string())
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "no diagnostics".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

/// Schema-level error taxonomy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No entity type with this name is registered
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// No enumeration with this name is registered
    #[error("unknown enumeration '{0}'")]
    UnknownEnumeration(String),

    /// The type has no feature with this name
    #[error("type '{type_name}' has no feature '{feature}'")]
    UnknownFeature {
        /// Entity type name
        type_name: String,
        /// Requested feature name
        feature: String,
    },

    /// The document's root element is not a known global element
    #[error("unknown root element '{0}'")]
    UnknownRootElement(String),

    /// The value does not conform to the feature's declared type
    #[error("type mismatch on '{feature}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Feature (or global element) receiving the value
        feature: String,
        /// Declared type
        expected: String,
        /// Type of the offered value
        found: String,
    },

    /// The literal is not one of the enumeration's values
    #[error("'{literal}' is not a literal of {enumeration}")]
    InvalidEnumLiteral {
        /// Enumeration name
        enumeration: String,
        /// Offending literal
        literal: String,
    },

    /// A required feature holds no value
    #[error("{type_name} is missing required feature '{feature}'")]
    MissingRequiredFeature {
        /// Entity type name
        type_name: String,
        /// Missing feature
        feature: String,
    },

    /// A list feature holds more values than its upper bound allows
    #[error("{type_name}.{feature} holds {count} values, at most {max} allowed")]
    TooManyValues {
        /// Entity type name
        type_name: String,
        /// Feature name
        feature: String,
        /// Number of values present
        count: usize,
        /// Upper bound
        max: u32,
    },

    /// Element nesting exceeded the configured maximum
    #[error("element depth {depth} exceeds maximum {max}")]
    DepthExceeded {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Attempt to instantiate an abstract type
    #[error("type '{0}' is abstract")]
    AbstractType(String),

    /// A lexical value could not be converted to the feature's primitive kind
    #[error("invalid value '{value}' for '{feature}': {reason}")]
    InvalidValue {
        /// Feature name
        feature: String,
        /// Offending lexical value
        value: String,
        /// Conversion failure
        reason: String,
    },

    /// Element not allowed in this content model
    #[error("unexpected element '{0}'")]
    UnexpectedElement(String),

    /// Attribute not declared on this type
    #[error("unexpected attribute '{0}'")]
    UnexpectedAttribute(String),

    /// Character data in element-only content
    #[error("unexpected text '{0}'")]
    UnexpectedText(String),

    /// Namespace prefix used without a declaration
    #[error("namespace prefix '{0}' is not bound")]
    UnboundPrefix(String),

    /// Invalid XML name
    #[error("invalid name '{0}'")]
    InvalidName(String),

    /// The document has no root element
    #[error("document has no root element")]
    EmptyDocument,

    /// The registry tables are inconsistent
    #[error("schema definition error: {0}")]
    SchemaDefinition(String),
}

/// A schema error located in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong
    pub error: SchemaError,
    /// Slash-separated element path, `/` for the document itself
    pub path: String,
}

impl Diagnostic {
    /// Create a diagnostic at the document level
    pub fn new(error: SchemaError) -> Self {
        Self {
            error,
            path: "/".to_string(),
        }
    }

    /// Set the path where the problem was found
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

impl std::error::Error for Diagnostic {}
