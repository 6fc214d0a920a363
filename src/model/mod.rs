//! Model entities
//!
//! Entities are generic over the registry: an [`Entity`] stores one slot per
//! feature of its [`EntityType`](crate::schema::EntityType) and every
//! accessor goes through the feature name. [`Factory`] gives typed
//! constructors, [`DocumentRoot`] holds the single root element of a
//! document, and [`WcsElement`] names the global elements.

pub mod document_root;
pub mod elements;
pub mod entity;
pub mod factory;
pub mod value;

pub use document_root::{DocumentRoot, RootState};
pub use elements::WcsElement;
pub use entity::{Entity, ExtendedProperties, GroupEntry};
pub use factory::Factory;
pub use value::{State, Value};
