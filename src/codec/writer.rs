//! Marshaller: entities to XML text
//!
//! Writing validates first and emits nothing when any diagnostic is found.
//! Attributes follow declaration order; child elements follow feature order,
//! with choice groups in the order their entries were added. Extended
//! properties never reach the output. Wildcard content is written verbatim,
//! without indentation, so its text reads back unchanged.

use crate::codec::config::CodecConfig;
use crate::documents::{AnyElement, MixedContent};
use crate::error::{Error, Result};
use crate::model::entity::Slot;
use crate::model::{DocumentRoot, Entity, Value};
use crate::namespaces::{well_known_prefix, QName, XSI_NAMESPACE};
use crate::schema::{Feature, Registry, XmlKind};
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

/// Writes one document
pub(crate) struct Marshaller<'r> {
    registry: &'r Registry,
    writer: Writer<Vec<u8>>,
    xml_declaration: bool,
    /// prefix -> namespace, in declaration order
    bindings: IndexMap<String, String>,
}

impl<'r> Marshaller<'r> {
    pub(crate) fn new(registry: &'r Registry, config: &CodecConfig) -> Self {
        let writer = match config.indent() {
            Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
            None => Writer::new(Vec::new()),
        };
        Self {
            registry,
            writer,
            xml_declaration: config.xml_declaration(),
            bindings: IndexMap::new(),
        }
    }

    /// Write the root element of a document with its comments and hints
    pub(crate) fn write_document(mut self, document: &DocumentRoot, name: &QName, value: &Value) -> Result<String> {
        check_writable(value)?;
        for (prefix, namespace) in document.xmlns_prefix_map() {
            self.bindings.insert(prefix.clone(), namespace.clone());
        }

        let mut used = UsedNamespaces::default();
        used.note(name, false);
        if let Value::Entity(entity) = value {
            used.collect(entity);
        }
        if !document.schema_location().is_empty() {
            used.note(&QName::namespaced(XSI_NAMESPACE, "schemaLocation"), true);
        }
        self.bind_namespaces(used);

        self.write_declaration()?;
        for item in document.mixed() {
            if let MixedContent::Comment(comment) = item {
                self.writer
                    .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
            }
        }

        let mut start = self.root_start(name);
        if !document.schema_location().is_empty() {
            let pairs: Vec<String> = document
                .schema_location()
                .iter()
                .map(|(namespace, location)| format!("{} {}", namespace, location))
                .collect();
            let attribute = self.attribute_name(&QName::namespaced(XSI_NAMESPACE, "schemaLocation"));
            start.push_attribute((attribute.as_str(), pairs.join(" ").as_str()));
        }

        self.write_element(start, value)?;
        debug!(root = %name, "document written");
        self.finish()
    }

    /// Write a detached entity under an arbitrary element name
    pub(crate) fn write_fragment(mut self, name: &QName, entity: &Entity) -> Result<String> {
        let value = Value::Entity(Box::new(entity.clone()));
        check_writable(&value)?;

        let mut used = UsedNamespaces::default();
        used.note(name, false);
        used.collect(entity);
        self.bind_namespaces(used);

        self.write_declaration()?;
        let start = self.root_start(name);
        self.write_element(start, &value)?;
        debug!(element = %name, "fragment written");
        self.finish()
    }

    /// Start tag of the outermost element, carrying every namespace declaration
    fn root_start(&self, name: &QName) -> BytesStart<'static> {
        let mut start = BytesStart::new(self.element_name(name));
        for (prefix, namespace) in &self.bindings {
            let attribute = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{}", prefix)
            };
            start.push_attribute((attribute.as_str(), namespace.as_str()));
        }
        start
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| Error::Xml(e.to_string()))
    }

    fn write_declaration(&mut self) -> Result<()> {
        if self.xml_declaration {
            self.writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        Ok(())
    }

    /// Bind every used namespace; attribute namespaces need a non-empty prefix
    fn bind_namespaces(&mut self, used: UsedNamespaces) {
        let mut generated = 0;
        for (namespace, in_attribute) in used.0 {
            let is_default = self.bindings.get("") == Some(&namespace);
            if self.prefixed(&namespace).is_some() || (is_default && !in_attribute) {
                continue;
            }
            let preferred = self
                .registry
                .prefix_for(&namespace)
                .or_else(|| well_known_prefix(&namespace))
                .filter(|p| !self.bindings.contains_key(*p))
                .map(str::to_string);
            let prefix = match preferred {
                Some(prefix) => prefix,
                None => loop {
                    generated += 1;
                    let candidate = format!("ns{}", generated);
                    if !self.bindings.contains_key(&candidate) {
                        break candidate;
                    }
                },
            };
            self.bindings.insert(prefix, namespace);
        }
    }

    fn prefixed(&self, namespace: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(prefix, ns)| !prefix.is_empty() && ns.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    fn element_name(&self, name: &QName) -> String {
        match name.namespace() {
            None => name.local_name.clone(),
            Some(ns) if self.bindings.get("").map(String::as_str) == Some(ns) => {
                name.local_name.clone()
            }
            Some(ns) => self.qualify(ns, &name.local_name),
        }
    }

    fn attribute_name(&self, name: &QName) -> String {
        match name.namespace() {
            None => name.local_name.clone(),
            Some(ns) => self.qualify(ns, &name.local_name),
        }
    }

    fn qualify(&self, namespace: &str, local_name: &str) -> String {
        match self.prefixed(namespace) {
            Some(prefix) => format!("{}:{}", prefix, local_name),
            None => local_name.to_string(),
        }
    }

    fn write_value(&mut self, name: &QName, value: &Value) -> Result<()> {
        let start = BytesStart::new(self.element_name(name));
        self.write_element(start, value)
    }

    fn write_element(&mut self, mut start: BytesStart<'_>, value: &Value) -> Result<()> {
        let entity = match value {
            Value::Entity(entity) => entity,
            simple => {
                let text = simple.to_lexical().unwrap_or_default();
                let end = start.to_end().into_owned();
                self.writer.write_event(Event::Start(start))?;
                self.writer.write_event(Event::Text(BytesText::new(&text)))?;
                self.writer.write_event(Event::End(end))?;
                return Ok(());
            }
        };

        let ty = entity.entity_type();
        for (index, feature) in ty.features().iter().enumerate() {
            if feature.kind() != XmlKind::Attribute {
                continue;
            }
            if let Some(text) = single_lexical(entity, index, feature) {
                let attribute = self.attribute_name(feature.xml_name());
                start.push_attribute((attribute.as_str(), text.as_str()));
            }
        }

        if !has_content(entity) {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        let end = start.to_end().into_owned();
        self.writer.write_event(Event::Start(start))?;
        for (index, feature) in ty.features().iter().enumerate() {
            match (feature.kind(), entity.slot(index)) {
                (XmlKind::SimpleContent, _) => {
                    if let Some(text) = single_lexical(entity, index, feature) {
                        self.writer.write_event(Event::Text(BytesText::new(&text)))?;
                    }
                }
                (XmlKind::Element, Slot::One(state)) => {
                    if let Some(value) = state.get() {
                        self.write_value(feature.xml_name(), value)?;
                    }
                }
                (XmlKind::Element, Slot::Many(values)) => {
                    for value in values {
                        self.write_value(feature.xml_name(), value)?;
                    }
                }
                (XmlKind::Group, Slot::Group(entries)) => {
                    for entry in entries {
                        if let Some((_, member)) = ty.feature(&entry.member) {
                            self.write_value(member.xml_name(), &entry.value)?;
                        }
                    }
                }
                (XmlKind::Wildcard, Slot::Mixed(items)) => self.write_mixed(items)?,
                _ => {}
            }
        }
        self.writer.write_event(Event::End(end))?;
        Ok(())
    }

    /// Wildcard content goes out as written, never indented: indentation
    /// inside it would read back as extra text
    fn write_mixed(&mut self, items: &[MixedContent]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let mut verbatim = Writer::new(Vec::new());
        for item in items {
            self.write_item(&mut verbatim, item)?;
        }
        let raw = String::from_utf8(verbatim.into_inner()).map_err(|e| Error::Xml(e.to_string()))?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(raw)))?;
        Ok(())
    }

    fn write_item(&self, out: &mut Writer<Vec<u8>>, item: &MixedContent) -> Result<()> {
        match item {
            MixedContent::Text(text) => out.write_event(Event::Text(BytesText::new(text)))?,
            MixedContent::Comment(comment) => {
                out.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?
            }
            MixedContent::Element(element) => self.write_any(out, element)?,
        }
        Ok(())
    }

    fn write_any(&self, out: &mut Writer<Vec<u8>>, element: &AnyElement) -> Result<()> {
        let name = self.element_name(&element.qname);
        let mut start = BytesStart::new(name.clone());
        for (attribute, value) in &element.attributes {
            let attribute = self.attribute_name(attribute);
            start.push_attribute((attribute.as_str(), value.as_str()));
        }
        if element.content.is_empty() {
            out.write_event(Event::Empty(start))?;
        } else {
            out.write_event(Event::Start(start))?;
            for item in &element.content {
                self.write_item(out, item)?;
            }
            out.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }
}

/// Reject entity trees that fail validation, reporting every problem
fn check_writable(value: &Value) -> Result<()> {
    if let Value::Entity(entity) = value {
        let diagnostics = entity.validate();
        if !diagnostics.is_empty() {
            return Err(Error::Unserializable(diagnostics));
        }
    }
    Ok(())
}

/// Lexical value of a single-valued feature; required features fall back to their default
fn single_lexical(entity: &Entity, index: usize, feature: &Feature) -> Option<String> {
    let Slot::One(state) = entity.slot(index) else {
        return None;
    };
    let value = match state.get() {
        Some(value) => Some(value),
        None if feature.is_required() => feature.default_value(),
        None => None,
    };
    value.and_then(Value::to_lexical)
}

fn has_content(entity: &Entity) -> bool {
    let ty = entity.entity_type();
    ty.features().iter().enumerate().any(|(index, feature)| {
        match (feature.kind(), entity.slot(index)) {
            (XmlKind::Attribute, _) => false,
            (XmlKind::SimpleContent, _) => single_lexical(entity, index, feature).is_some(),
            (_, Slot::One(state)) => state.is_set(),
            (_, Slot::Many(values)) => !values.is_empty(),
            (_, Slot::Group(entries)) => !entries.is_empty(),
            (_, Slot::Mixed(items)) => !items.is_empty(),
            (_, Slot::Member) => false,
        }
    })
}

/// Namespaces a tree uses, flagged when an attribute name needs them
#[derive(Default)]
struct UsedNamespaces(IndexMap<String, bool>);

impl UsedNamespaces {
    fn note(&mut self, name: &QName, attribute: bool) {
        if let Some(ns) = name.namespace() {
            *self.0.entry(ns.to_string()).or_insert(false) |= attribute;
        }
    }

    fn collect(&mut self, entity: &Entity) {
        let ty = entity.entity_type();
        for (index, feature) in ty.features().iter().enumerate() {
            let values: Vec<&Value> = match entity.slot(index) {
                Slot::One(state) => {
                    if feature.kind() == XmlKind::Attribute
                        && (state.is_set() || feature.is_required())
                    {
                        self.note(feature.xml_name(), true);
                    }
                    state.get().into_iter().collect()
                }
                Slot::Many(values) => values.iter().collect(),
                Slot::Group(entries) => {
                    for entry in entries {
                        if let Some((_, member)) = ty.feature(&entry.member) {
                            self.note(member.xml_name(), false);
                        }
                        if let Value::Entity(child) = &entry.value {
                            self.collect(child);
                        }
                    }
                    Vec::new()
                }
                Slot::Mixed(items) => {
                    self.collect_mixed(items);
                    Vec::new()
                }
                Slot::Member => Vec::new(),
            };

            if feature.kind() == XmlKind::Element && !values.is_empty() {
                self.note(feature.xml_name(), false);
            }
            for value in values {
                if let Value::Entity(child) = value {
                    self.collect(child);
                }
            }
        }
    }

    fn collect_mixed(&mut self, items: &[MixedContent]) {
        for item in items {
            if let MixedContent::Element(element) = item {
                self.note(&element.qname, false);
                for attribute in element.attributes.keys() {
                    self.note(attribute, true);
                }
                self.collect_mixed(&element.content);
            }
        }
    }
}
