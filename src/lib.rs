//! # wcs10
//!
//! Typed XML data binding for the OGC Web Coverage Service 1.0 schema.
//!
//! The crate reads WCS 1.0 documents (capabilities, coverage descriptions and
//! the GetCapabilities / DescribeCoverage / GetCoverage requests) into a
//! model of typed entities and writes such a model back out as XML.
//!
//! ## Features
//!
//! - Schema type registry covering WCS 1.0 and the GML / XLink types it uses
//! - Typed enumerations (`InterpolationMethod`, `Closure`, ...)
//! - Generic entities with explicit set/unset state and schema defaults
//! - Document root holding exactly one global element
//! - Strict, lax and skip read modes with located diagnostics
//! - Validation before every write
//! - Protection against deeply nested or oversized documents
//!
//! ## Example
//!
//! ```rust
//! use wcs10::codec::Codec;
//! use wcs10::model::{Factory, WcsElement};
//!
//! let factory = Factory::wcs10()?;
//! let mut request = factory.create_get_capabilities_type();
//! request.set("updateSequence", "42")?;
//!
//! let mut document = factory.create_document_root();
//! document.set(WcsElement::GetCapabilities, request)?;
//!
//! let codec = Codec::wcs10()?;
//! let xml = codec.write_document(&document)?;
//! assert!(xml.contains("updateSequence=\"42\""));
//!
//! let parsed = codec.read_str(&xml)?;
//! let read = parsed.document.root_entity().unwrap();
//! assert_eq!(read.get_str("updateSequence"), Some("42"));
//! assert!(!read.is_set("version"));
//! # Ok::<(), wcs10::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and namespaces
pub mod names;
pub mod namespaces;

// XML events and opaque content
pub mod documents;

// Schema type registry
pub mod enums;
pub mod schema;

// Model and codec
pub mod codec;
pub mod model;

// Tooling
pub mod inspect;

// Re-exports for convenience
pub use codec::{Codec, CodecConfig, Parsed, ReadMode};
pub use error::{Diagnostic, Error, Result, SchemaError};
pub use model::{DocumentRoot, Entity, Factory, Value, WcsElement};
pub use namespaces::QName;
pub use schema::Registry;

/// Version of the wcs10 library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
