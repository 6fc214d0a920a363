//! Schema Type Registry
//!
//! The registry is the static catalog every other component works from: the
//! resolved entity types with their effective feature lists, the
//! enumerations, and the global elements that may root a document.
//!
//! ```rust
//! use wcs10::schema::Registry;
//!
//! let registry = Registry::wcs10().unwrap();
//! let offering = registry.type_of("CoverageOfferingType").unwrap();
//! assert!(offering.feature("domainSet").unwrap().1.is_required());
//! ```

pub mod enums;
pub mod features;
pub mod registry;
pub mod types;

pub(crate) mod gml;
pub(crate) mod wcs;
pub(crate) mod xlink;

pub use enums::{EnumLiteral, EnumValue, EnumerationType, SchemaEnum};
pub use features::{Feature, FeatureType, Occurs, PrimitiveKind, XmlKind};
pub use registry::{GlobalElement, Registry, RegistryBuilder};
pub use types::{ContentKind, EntityType, TypeDecl};
