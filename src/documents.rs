//! XML event source and opaque element trees
//!
//! The codec consumes documents as a stream of [`XmlEvent`]s pulled from an
//! [`EventSource`]. [`QuickXmlSource`] is the quick-xml backed implementation.
//!
//! Content the schema does not interpret (wildcards, document-level comments)
//! is kept as [`MixedContent`] items whose elements are [`AnyElement`] trees.

use crate::error::{Error, Result};
use crate::namespaces::QName;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A start tag with its raw (prefixed) names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Raw element name as written, e.g. `wcs:GetCoverage`
    pub name: String,
    /// Raw attributes in document order, namespace declarations included
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    /// Create a start tag without attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

/// A single event pulled from an XML source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Element start; self-closing elements are followed by an [`XmlEvent::End`]
    Start(StartTag),
    /// Element end
    End,
    /// Unescaped character data (CDATA sections included)
    Text(String),
    /// Comment body
    Comment(String),
    /// End of input
    Eof,
}

/// Pull-based source of XML events
pub trait EventSource {
    /// Produce the next event
    fn next_event(&mut self) -> Result<XmlEvent>;
}

/// Replays a prepared list of events, then reports [`XmlEvent::Eof`]
impl EventSource for std::vec::IntoIter<XmlEvent> {
    fn next_event(&mut self) -> Result<XmlEvent> {
        Ok(self.next().unwrap_or(XmlEvent::Eof))
    }
}

/// [`EventSource`] over an in-memory document, backed by quick-xml
pub struct QuickXmlSource<'a> {
    reader: Reader<&'a [u8]>,
    buf: Vec<u8>,
    pending_end: bool,
}

impl<'a> QuickXmlSource<'a> {
    /// Create a source reading from bytes
    ///
    /// Text is reported untrimmed; the consumer decides which whitespace is
    /// insignificant.
    pub fn new(xml: &'a [u8]) -> Self {
        let reader = Reader::from_reader(xml);
        Self {
            reader,
            buf: Vec::new(),
            pending_end: false,
        }
    }

    /// Create a source reading from a string
    pub fn from_string(xml: &'a str) -> Self {
        Self::new(xml.as_bytes())
    }
}

impl EventSource for QuickXmlSource<'_> {
    fn next_event(&mut self) -> Result<XmlEvent> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(XmlEvent::End);
        }

        loop {
            self.buf.clear();
            let event = self.reader.read_event_into(&mut self.buf).map_err(|e| {
                Error::Xml(format!(
                    "Error parsing XML at position {}: {}",
                    self.reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(e) => return Ok(XmlEvent::Start(parse_start(&e)?)),
                Event::Empty(e) => {
                    let tag = parse_start(&e)?;
                    self.pending_end = true;
                    return Ok(XmlEvent::Start(tag));
                }
                Event::End(_) => return Ok(XmlEvent::End),
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?
                        .into_owned();
                    if !text.is_empty() {
                        return Ok(XmlEvent::Text(text));
                    }
                }
                Event::CData(e) => {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| Error::Xml(format!("Invalid CDATA section: {}", e)))?;
                    return Ok(XmlEvent::Text(text.to_string()));
                }
                Event::Comment(e) => {
                    return Ok(XmlEvent::Comment(String::from_utf8_lossy(&e).into_owned()));
                }
                Event::Eof => return Ok(XmlEvent::Eof),
                // declarations, processing instructions and doctypes carry no model content
                _ => {}
            }
        }
    }
}

fn parse_start(start: &BytesStart) -> Result<StartTag> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())
        .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
        .to_string();

    let mut tag = StartTag::new(name);
    for attr_result in start.attributes() {
        let attr =
            attr_result.map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

        let attr_name = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
            .to_string();

        let attr_value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
            .into_owned();

        tag.attributes.push((attr_name, attr_value));
    }
    Ok(tag)
}

/// One item of mixed or wildcard content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixedContent {
    /// Character data
    Text(String),
    /// An element kept verbatim
    Element(AnyElement),
    /// A comment
    Comment(String),
}

/// Element captured without schema interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyElement {
    /// Element qualified name
    pub qname: QName,
    /// Attributes in document order
    pub attributes: IndexMap<QName, String>,
    /// Child content in document order
    pub content: Vec<MixedContent>,
}

impl AnyElement {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: IndexMap::new(),
            content: Vec::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Set an attribute
    pub fn with_attribute(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value.into());
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: AnyElement) -> Self {
        self.content.push(MixedContent::Element(child));
        self
    }

    /// Append text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content.push(MixedContent::Text(text.into()));
        self
    }

    /// Get an attribute value by local name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(qname, _)| qname.local_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order
    pub fn children(&self) -> impl Iterator<Item = &AnyElement> {
        self.content.iter().filter_map(|item| match item {
            MixedContent::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Find child elements by local name
    pub fn find_children(&self, local_name: &str) -> Vec<&AnyElement> {
        self.children()
            .filter(|e| e.local_name() == local_name)
            .collect()
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|item| match item {
                MixedContent::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every namespace used by this element, its attributes and descendants
    pub fn namespaces(&self) -> Vec<&str> {
        let mut found = Vec::new();
        self.collect_namespaces(&mut found);
        found
    }

    fn collect_namespaces<'a>(&'a self, found: &mut Vec<&'a str>) {
        let names = std::iter::once(&self.qname).chain(self.attributes.keys());
        for ns in names.filter_map(QName::namespace) {
            if !found.contains(&ns) {
                found.push(ns);
            }
        }
        for child in self.children() {
            child.collect_namespaces(found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(xml: &str) -> Vec<XmlEvent> {
        let mut source = QuickXmlSource::from_string(xml);
        let mut events = Vec::new();
        loop {
            let event = source.next_event().unwrap();
            if event == XmlEvent::Eof {
                break;
            }
            events.push(event);
        }
        events
    }

    #[test]
    fn test_empty_element_yields_start_and_end() {
        let events = drain(r#"<wcs:GetCapabilities service="WCS"/>"#);
        assert_eq!(
            events,
            vec![
                XmlEvent::Start(
                    StartTag::new("wcs:GetCapabilities").with_attribute("service", "WCS")
                ),
                XmlEvent::End,
            ]
        );
    }

    #[test]
    fn test_text_comment_and_cdata() {
        let events = drain("<a><!-- note --><b>x &amp; y</b><c><![CDATA[<raw>]]></c></a>");
        assert!(events.contains(&XmlEvent::Comment(" note ".to_string())));
        assert!(events.contains(&XmlEvent::Text("x & y".to_string())));
        assert!(events.contains(&XmlEvent::Text("<raw>".to_string())));
    }

    #[test]
    fn test_text_keeps_surrounding_whitespace() {
        let events = drain("<a>\n  <b>  dem 30m </b>\n</a>");
        assert_eq!(
            events,
            vec![
                XmlEvent::Start(StartTag::new("a")),
                XmlEvent::Text("\n  ".to_string()),
                XmlEvent::Start(StartTag::new("b")),
                XmlEvent::Text("  dem 30m ".to_string()),
                XmlEvent::End,
                XmlEvent::Text("\n".to_string()),
                XmlEvent::End,
            ]
        );
    }

    #[test]
    fn test_malformed_input() {
        let mut source = QuickXmlSource::from_string("<a><b></a>");
        let mut result = Ok(XmlEvent::End);
        for _ in 0..4 {
            result = source.next_event();
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_replayed_events() {
        let mut source = vec![XmlEvent::Text("t".to_string())].into_iter();
        assert_eq!(source.next_event().unwrap(), XmlEvent::Text("t".to_string()));
        assert_eq!(source.next_event().unwrap(), XmlEvent::Eof);
    }

    #[test]
    fn test_any_element_queries() {
        let element = AnyElement::new(QName::namespaced("urn:vendor", "Extra"))
            .with_attribute(QName::local("level"), "2")
            .with_child(
                AnyElement::new(QName::namespaced("urn:other", "Item"))
                    .with_attribute(QName::xlink("href"), "http://x")
                    .with_text("one"),
            )
            .with_text("tail");

        assert_eq!(element.get_attribute("level"), Some("2"));
        assert_eq!(element.find_children("Item").len(), 1);
        assert_eq!(element.text(), "tail");
        assert_eq!(
            element.namespaces(),
            vec![
                "urn:vendor",
                "urn:other",
                crate::namespaces::XLINK_NAMESPACE
            ]
        );
    }
}
