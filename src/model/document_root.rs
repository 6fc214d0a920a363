//! The document root
//!
//! A document has exactly one root element. [`DocumentRoot`] holds at most
//! one occupant, so setting a root element always replaces the previous one,
//! and carries the serialization hints read from (or written to) the root
//! element: namespace prefix bindings and `xsi:schemaLocation` pairs.

use crate::documents::MixedContent;
use crate::error::SchemaError;
use crate::model::elements::WcsElement;
use crate::model::entity::Entity;
use crate::model::value::Value;
use crate::namespaces::QName;
use crate::schema::Registry;
use indexmap::IndexMap;
use tracing::debug;

/// Which global element, if any, roots the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootState<'a> {
    /// No root element yet
    Empty,
    /// The document is rooted at this element
    Occupied(&'a QName),
}

/// Top-level substitution point of a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentRoot {
    occupant: Option<(QName, Value)>,
    xmlns_prefix_map: IndexMap<String, String>,
    schema_location: IndexMap<String, String>,
    mixed: Vec<MixedContent>,
}

impl DocumentRoot {
    /// An empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Current occupancy
    pub fn state(&self) -> RootState<'_> {
        match &self.occupant {
            Some((name, _)) => RootState::Occupied(name),
            None => RootState::Empty,
        }
    }

    /// Make `element` the root, replacing any previous occupant
    ///
    /// Returns the previous occupant. Fails with
    /// [`SchemaError::UnknownRootElement`] when `element` is not a global
    /// element of the registry and with [`SchemaError::TypeMismatch`] when the
    /// value does not fit the element's type.
    pub fn set_root(
        &mut self,
        registry: &Registry,
        element: QName,
        value: impl Into<Value>,
    ) -> Result<Option<(QName, Value)>, SchemaError> {
        let value = value.into();
        let global = registry
            .global_element(&element)
            .ok_or_else(|| SchemaError::UnknownRootElement(element.to_string()))?;
        global.check_value(&value)?;
        debug!(root = %element, "document root resolved");
        Ok(self.occupant.replace((element, value)))
    }

    /// Make a WCS global element the root, replacing any previous occupant
    pub fn set(&mut self, element: WcsElement, value: impl Into<Value>) -> Result<(), SchemaError> {
        let value = value.into();
        let ty = element.value_type();
        if !value.conforms_to(&ty) {
            return Err(SchemaError::TypeMismatch {
                feature: element.local_name().to_string(),
                expected: ty.to_string(),
                found: value.type_label(),
            });
        }
        self.occupant = Some((element.qname(), value));
        Ok(())
    }

    /// The root entity, when the document is rooted at `element`
    pub fn get(&self, element: WcsElement) -> Option<&Entity> {
        self.get_value(&element.qname()).and_then(Value::as_entity)
    }

    /// The root value, when the document is rooted at `element`
    pub fn get_value(&self, element: &QName) -> Option<&Value> {
        match &self.occupant {
            Some((name, value)) if name == element => Some(value),
            _ => None,
        }
    }

    /// Name of the root element
    pub fn root_element(&self) -> Option<&QName> {
        self.occupant.as_ref().map(|(name, _)| name)
    }

    /// The root element as a typed WCS element
    pub fn wcs_element(&self) -> Option<WcsElement> {
        self.root_element().and_then(WcsElement::from_qname)
    }

    /// Value held by the root element
    pub fn root_value(&self) -> Option<&Value> {
        self.occupant.as_ref().map(|(_, value)| value)
    }

    /// Entity held by the root element
    pub fn root_entity(&self) -> Option<&Entity> {
        self.root_value().and_then(Value::as_entity)
    }

    /// Entity held by the root element, mutably
    pub fn root_entity_mut(&mut self) -> Option<&mut Entity> {
        self.occupant
            .as_mut()
            .and_then(|(_, value)| value.as_entity_mut())
    }

    /// Remove and return the occupant
    pub fn take_root(&mut self) -> Option<(QName, Value)> {
        self.occupant.take()
    }

    /// Remove the occupant, keeping prefixes and schema locations
    pub fn clear(&mut self) {
        self.occupant = None;
    }

    /// Prefix bindings, in declaration order (`""` is the default namespace)
    pub fn xmlns_prefix_map(&self) -> &IndexMap<String, String> {
        &self.xmlns_prefix_map
    }

    /// Bind a prefix on the root element
    pub fn declare_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.xmlns_prefix_map.insert(prefix.into(), namespace.into());
    }

    /// `xsi:schemaLocation` pairs: namespace to schema URL
    pub fn schema_location(&self) -> &IndexMap<String, String> {
        &self.schema_location
    }

    /// Add an `xsi:schemaLocation` pair
    pub fn add_schema_location(&mut self, namespace: impl Into<String>, location: impl Into<String>) {
        self.schema_location.insert(namespace.into(), location.into());
    }

    /// Content outside the root element (comments)
    pub fn mixed(&self) -> &Vec<MixedContent> {
        &self.mixed
    }

    /// Content outside the root element, mutably
    pub fn mixed_mut(&mut self) -> &mut Vec<MixedContent> {
        &mut self.mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Factory;

    #[test]
    fn test_exclusive_occupancy() {
        let factory = Factory::wcs10().unwrap();
        let mut root = factory.create_document_root();
        assert_eq!(root.state(), RootState::Empty);

        root.set(WcsElement::GetCoverage, factory.create_get_coverage_type())
            .unwrap();
        let mut capabilities = factory.create_get_capabilities_type();
        capabilities.set("updateSequence", "42").unwrap();
        root.set(WcsElement::GetCapabilities, capabilities).unwrap();

        assert!(root.get(WcsElement::GetCoverage).is_none());
        assert_eq!(
            root.get(WcsElement::GetCapabilities)
                .and_then(|e| e.get_str("updateSequence")),
            Some("42")
        );
        assert_eq!(root.wcs_element(), Some(WcsElement::GetCapabilities));
    }

    #[test]
    fn test_set_checks_element_type() {
        let factory = Factory::wcs10().unwrap();
        let mut root = DocumentRoot::new();
        let err = root
            .set(WcsElement::GetCoverage, factory.create_output_type())
            .unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
        assert_eq!(root.state(), RootState::Empty);

        root.set(WcsElement::Name, "dem").unwrap();
        assert_eq!(root.root_value(), Some(&Value::from("dem")));
    }

    #[test]
    fn test_set_root_unknown_element() {
        let factory = Factory::wcs10().unwrap();
        let mut root = DocumentRoot::new();
        let err = root
            .set_root(
                factory.registry(),
                QName::wcs("NotAnElement"),
                factory.create_get_coverage_type(),
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownRootElement(_)));

        let previous = root
            .set_root(
                factory.registry(),
                QName::wcs("GetCoverage"),
                factory.create_get_coverage_type(),
            )
            .unwrap();
        assert!(previous.is_none());
        let previous = root
            .set_root(factory.registry(), WcsElement::Name.qname(), "x")
            .unwrap();
        assert_eq!(previous.map(|(q, _)| q), Some(QName::wcs("GetCoverage")));
    }

    #[test]
    fn test_hints_survive_clear() {
        let mut root = DocumentRoot::new();
        root.declare_prefix("wcs", crate::namespaces::WCS_NAMESPACE);
        root.add_schema_location(
            crate::namespaces::WCS_NAMESPACE,
            "http://schemas.opengis.net/wcs/1.0.0/getCoverage.xsd",
        );
        root.set(WcsElement::Name, "x").unwrap();
        root.clear();
        assert_eq!(root.state(), RootState::Empty);
        assert_eq!(root.xmlns_prefix_map().len(), 1);
        assert_eq!(root.schema_location().len(), 1);
    }
}
