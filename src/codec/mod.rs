//! Reading and writing WCS 1.0 documents
//!
//! [`Codec`] pairs a registry with a [`CodecConfig`]. Reads produce a
//! [`Parsed`] document together with whatever diagnostics the read mode
//! collected; writes validate the whole tree before emitting a byte.
//!
//! ```
//! use wcs10::codec::Codec;
//!
//! let codec = Codec::wcs10().unwrap();
//! let parsed = codec
//!     .read_str(r#"<wcs:GetCapabilities xmlns:wcs="http://www.opengis.net/wcs"/>"#)
//!     .unwrap();
//! let request = parsed.document.root_entity().unwrap();
//! assert_eq!(request.get_str("service"), Some("WCS"));
//! assert!(!request.is_set("service"));
//! ```

pub mod config;
pub(crate) mod context;
pub(crate) mod reader;
pub(crate) mod writer;

pub use config::{CodecConfig, ReadMode};

use crate::documents::{EventSource, QuickXmlSource, XmlEvent};
use crate::error::{Diagnostic, Error, Result, SchemaError};
use crate::model::{DocumentRoot, Entity};
use crate::namespaces::QName;
use crate::schema::Registry;
use context::ReadContext;
use reader::Unmarshaller;
use std::sync::Arc;
use tracing::debug;
use writer::Marshaller;

/// Result of a successful read
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The document that was read
    pub document: DocumentRoot,
    /// Problems collected in lax mode (always empty in strict and skip modes)
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    /// Whether the read found no problems
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Reads and writes documents against a registry
#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<Registry>,
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with the default configuration
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    /// Create a codec with an explicit configuration
    pub fn with_config(registry: Arc<Registry>, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    /// Codec over the process-wide WCS 1.0 registry
    pub fn wcs10() -> Result<Self> {
        Ok(Self::new(Registry::wcs10()?))
    }

    /// The registry
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: CodecConfig) {
        self.config = config;
    }

    /// Read a document from a string
    pub fn read_str(&self, xml: &str) -> Result<Parsed> {
        self.read_bytes(xml.as_bytes())
    }

    /// Read a document from bytes
    pub fn read_bytes(&self, xml: &[u8]) -> Result<Parsed> {
        self.config.limits().check_xml_size(xml.len())?;
        self.read_events(QuickXmlSource::new(xml))
    }

    /// Read a document from a file
    pub fn read_file(&self, path: impl AsRef<std::path::Path>) -> Result<Parsed> {
        let bytes = std::fs::read(path.as_ref())?;
        self.read_bytes(&bytes)
    }

    /// Read a document from any event source
    pub fn read_events<S: EventSource>(&self, source: S) -> Result<Parsed> {
        let context = ReadContext::new(&self.config);
        let (document, context) = Unmarshaller::new(&self.registry, source, context).read_document()?;
        let diagnostics = context.into_diagnostics();
        debug!(
            root = ?document.root_element().map(ToString::to_string),
            mode = %self.config.mode(),
            diagnostics = diagnostics.len(),
            "document read"
        );
        Ok(Parsed {
            document,
            diagnostics,
        })
    }

    /// Read a prepared event list
    pub fn read_event_list(&self, events: Vec<XmlEvent>) -> Result<Parsed> {
        self.read_events(events.into_iter())
    }

    /// Serialize a document
    ///
    /// Fails with [`SchemaError::EmptyDocument`] when no root is set and with
    /// [`Error::Unserializable`] listing every violation found in the tree.
    ///
    /// Unset required attributes with a default (`service="WCS"`) are written
    /// with that default. Reading the output back marks them as set; every
    /// other feature keeps its set/unset state.
    pub fn write_document(&self, document: &DocumentRoot) -> Result<String> {
        let (name, value) = match (document.root_element(), document.root_value()) {
            (Some(name), Some(value)) => (name, value),
            _ => return Err(Error::Schema(SchemaError::EmptyDocument)),
        };
        Marshaller::new(&self.registry, &self.config).write_document(document, name, value)
    }

    /// Serialize a single entity as element `name`
    pub fn write_entity(&self, entity: &Entity, name: &QName) -> Result<String> {
        Marshaller::new(&self.registry, &self.config).write_fragment(name, entity)
    }

    /// Serialize a document to a file
    pub fn write_file(&self, document: &DocumentRoot, path: impl AsRef<std::path::Path>) -> Result<()> {
        let xml = self.write_document(document)?;
        std::fs::write(path.as_ref(), xml)?;
        Ok(())
    }
}

/// Prefixed name for diagnostics paths, Clark notation for unknown namespaces
pub(crate) fn display_name(registry: &Registry, name: &QName) -> String {
    match name.namespace() {
        None => name.local_name.clone(),
        Some(ns) => match registry.prefix_for(ns) {
            Some(prefix) => format!("{}:{}", prefix, name.local_name),
            None => name.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::StartTag;
    use crate::namespaces::WCS_NAMESPACE;

    #[test]
    fn test_display_name() {
        let registry = Registry::wcs10().unwrap();
        assert_eq!(display_name(&registry, &QName::wcs("output")), "wcs:output");
        assert_eq!(display_name(&registry, &QName::local("foo")), "foo");
        assert_eq!(
            display_name(&registry, &QName::namespaced("urn:x", "foo")),
            "{urn:x}foo"
        );
    }

    #[test]
    fn test_read_event_list() {
        let codec = Codec::wcs10().unwrap();
        let events = vec![
            XmlEvent::Start(
                StartTag::new("GetCapabilities")
                    .with_attribute("xmlns", WCS_NAMESPACE)
                    .with_attribute("version", "1.0.0"),
            ),
            XmlEvent::End,
        ];
        let parsed = codec.read_event_list(events).unwrap();
        let request = parsed.document.root_entity().unwrap();
        assert!(request.is_set("version"));
        assert_eq!(parsed.document.xmlns_prefix_map().get(""), Some(&WCS_NAMESPACE.to_string()));
    }

    #[test]
    fn test_required_default_reads_back_as_set() {
        let codec = Codec::wcs10().unwrap();
        let factory = crate::model::Factory::wcs10().unwrap();
        let mut document = DocumentRoot::new();
        document
            .set(crate::model::WcsElement::GetCapabilities, factory.create_get_capabilities_type())
            .unwrap();
        let request = document.root_entity().unwrap();
        assert!(!request.is_set("service"));
        assert!(!request.is_set("version"));

        let parsed = codec.read_str(&codec.write_document(&document).unwrap()).unwrap();
        let request = parsed.document.root_entity().unwrap();
        assert!(request.is_set("service"));
        assert!(!request.is_set("version"));
    }

    #[test]
    fn test_write_empty_document() {
        let codec = Codec::wcs10().unwrap();
        let err = codec.write_document(&DocumentRoot::new()).unwrap_err();
        assert_eq!(err.schema_error(), Some(&SchemaError::EmptyDocument));
    }
}
