//! Unmarshaller: XML events to entities
//!
//! A recursive descent over the event stream. Every start tag is resolved
//! against the element bindings of the entity being filled; attributes go
//! through the attribute bindings, character data through the simple-content
//! binding. Presence is what marks a feature as set, so an attribute written
//! with its default literal is still read as explicitly set.
//!
//! Whitespace-only text between the children of element-only content is
//! insignificant. Simple content and wildcard content keep their text exactly.

use crate::codec::context::ReadContext;
use crate::codec::display_name;
use crate::documents::{AnyElement, EventSource, MixedContent, StartTag, XmlEvent};
use crate::error::{Error, Result, SchemaError};
use crate::model::{DocumentRoot, Entity, Value};
use crate::namespaces::{declared_prefix, NamespaceScopes, QName, XSI_NAMESPACE};
use crate::schema::{EntityType, Feature, FeatureType, Registry, XmlKind};
use std::sync::Arc;
use tracing::trace;

/// Reads one document from an event source
pub(crate) struct Unmarshaller<'r, S> {
    registry: &'r Registry,
    source: S,
    scopes: NamespaceScopes,
    context: ReadContext,
}

impl<'r, S: EventSource> Unmarshaller<'r, S> {
    pub(crate) fn new(registry: &'r Registry, source: S, context: ReadContext) -> Self {
        Self {
            registry,
            source,
            scopes: NamespaceScopes::new(),
            context,
        }
    }

    /// Read the whole document
    pub(crate) fn read_document(mut self) -> Result<(DocumentRoot, ReadContext)> {
        let mut document = DocumentRoot::new();
        let mut seen_root = false;

        loop {
            match self.source.next_event()? {
                XmlEvent::Start(tag) => {
                    if seen_root {
                        return Err(Error::Xml(format!(
                            "unexpected element '{}' after the root element",
                            tag.name
                        )));
                    }
                    self.read_root(tag, &mut document)?;
                    seen_root = true;
                }
                XmlEvent::Comment(comment) => {
                    document.mixed_mut().push(MixedContent::Comment(comment));
                }
                XmlEvent::Text(text) => {
                    if !text.trim().is_empty() {
                        self.context
                            .raise_or_collect(SchemaError::UnexpectedText(text))?;
                    }
                }
                XmlEvent::End => {
                    return Err(Error::Xml("unbalanced end tag".to_string()));
                }
                XmlEvent::Eof => break,
            }
        }

        if !seen_root {
            return Err(self.context.fatal(SchemaError::EmptyDocument));
        }
        Ok((document, self.context))
    }

    fn read_root(&mut self, tag: StartTag, document: &mut DocumentRoot) -> Result<()> {
        let declarations = self.open_scope(&tag)?;
        for (prefix, namespace) in declarations {
            document.declare_prefix(prefix, namespace);
        }

        let name = self
            .scopes
            .resolve_element(&tag.name)
            .map_err(|e| self.context.fatal(e))?;
        let global = self
            .registry
            .global_element(&name)
            .ok_or_else(|| self.context.fatal(SchemaError::UnknownRootElement(tag.name.clone())))?;
        let element_type = global.ty().clone();

        self.context.enter(display_name(self.registry, &name))?;
        trace!(element = %tag.name, "reading root element");

        for (raw, value) in &tag.attributes {
            if declared_prefix(raw).is_some() {
                continue;
            }
            let attribute = self
                .scopes
                .resolve_attribute(raw)
                .map_err(|e| self.context.fatal(e))?;
            if attribute == QName::namespaced(XSI_NAMESPACE, "schemaLocation") {
                let mut tokens = value.split_whitespace();
                while let (Some(namespace), Some(location)) = (tokens.next(), tokens.next()) {
                    document.add_schema_location(namespace, location);
                }
            }
        }

        let value = match &element_type {
            FeatureType::Entity(type_name) => {
                let ty = self
                    .registry
                    .concrete_type(type_name)
                    .map_err(|e| self.context.fatal(e))?;
                self.read_entity(ty, &tag)?.into()
            }
            other => {
                let binding = Feature::element(name.clone(), other.clone());
                match self.read_simple(&binding)? {
                    Some(value) => value,
                    None => return Err(self.context.fatal(SchemaError::EmptyDocument)),
                }
            }
        };

        document
            .set_root(self.registry, name, value)
            .map_err(|e| self.context.fatal(e))?;
        self.context.exit();
        self.scopes.pop_scope();
        Ok(())
    }

    /// Push the namespace scope of a start tag, returning its declarations
    fn open_scope(&mut self, tag: &StartTag) -> Result<Vec<(String, String)>> {
        self.context.limits().check_attributes(tag.attributes.len())?;
        let declarations: Vec<(String, String)> = tag
            .attributes
            .iter()
            .filter_map(|(raw, value)| {
                declared_prefix(raw).map(|prefix| (prefix.to_string(), value.clone()))
            })
            .collect();
        self.scopes.push_scope(declarations.clone());
        self.context
            .limits()
            .check_namespaces(self.scopes.binding_count())?;
        Ok(declarations)
    }

    /// Fill a fresh entity from the start tag just consumed and its content
    fn read_entity(&mut self, ty: Arc<EntityType>, tag: &StartTag) -> Result<Entity> {
        let mut entity = Entity::new(Arc::clone(&ty));
        self.read_attributes(&ty, tag, &mut entity)?;

        let mut text = String::new();
        loop {
            match self.source.next_event()? {
                XmlEvent::Start(child) => self.read_child(&ty, child, &mut entity)?,
                XmlEvent::Text(chunk) => {
                    if ty.simple_content().is_some() {
                        text.push_str(&chunk);
                    } else if let Some(items) = wildcard_content(&ty, &mut entity) {
                        push_text(items, chunk);
                    } else if !chunk.trim().is_empty() {
                        self.context
                            .raise_or_collect(SchemaError::UnexpectedText(chunk))?;
                    }
                }
                XmlEvent::Comment(comment) => {
                    if let Some(items) = wildcard_content(&ty, &mut entity) {
                        items.push(MixedContent::Comment(comment));
                    }
                }
                XmlEvent::End => break,
                XmlEvent::Eof => return Err(unexpected_eof()),
            }
        }

        if let Some(feature) = ty.simple_content().and_then(|i| ty.feature_at(i)) {
            if !text.is_empty() {
                match feature.parse_lexical(&text) {
                    Ok(value) => self.assign(&mut entity, feature, value)?,
                    Err(e) => self.context.raise_or_collect(e)?,
                }
            }
        }

        for diagnostic in entity.check_cardinality(&self.context.path()) {
            self.context.report(diagnostic)?;
        }
        Ok(entity)
    }

    fn read_attributes(&mut self, ty: &EntityType, tag: &StartTag, entity: &mut Entity) -> Result<()> {
        for (raw, lexical) in &tag.attributes {
            if declared_prefix(raw).is_some() {
                continue;
            }
            let name = self
                .scopes
                .resolve_attribute(raw)
                .map_err(|e| self.context.fatal(e))?;
            let index = ty.attribute(&name).or_else(|| match name.namespace {
                None => ty.attribute_by_local_name(&name.local_name),
                Some(_) => None,
            });

            match index.and_then(|i| ty.feature_at(i)) {
                Some(feature) => match feature.parse_lexical(lexical) {
                    Ok(value) => self.assign(entity, feature, value)?,
                    Err(e) => self.context.raise_or_collect(e)?,
                },
                None if name.namespace.is_none()
                    || name.namespace.as_deref() == ty.qname().namespace() =>
                {
                    self.context
                        .raise_or_collect(SchemaError::UnexpectedAttribute(raw.clone()))?;
                }
                // attributes in foreign namespaces (xsi:*, vendor extensions) are ignored
                None => {}
            }
        }
        Ok(())
    }

    fn read_child(&mut self, ty: &EntityType, tag: StartTag, entity: &mut Entity) -> Result<()> {
        self.open_scope(&tag)?;
        let name = self
            .scopes
            .resolve_element(&tag.name)
            .map_err(|e| self.context.fatal(e))?;
        self.context.enter(display_name(self.registry, &name))?;
        trace!(element = %tag.name, path = %self.context.path(), "entering element");

        let binding = ty
            .element(&name)
            .and_then(|i| ty.feature_at(i))
            .filter(|f| f.kind() == XmlKind::Element);

        match binding {
            Some(feature) => {
                let value = match feature.ty() {
                    FeatureType::Entity(type_name) => {
                        let child_type = self
                            .registry
                            .concrete_type(type_name)
                            .map_err(|e| self.context.fatal(e))?;
                        Some(self.read_entity(child_type, &tag)?.into())
                    }
                    _ => self.read_simple(feature)?,
                };
                if let Some(value) = value {
                    self.assign(entity, feature, value)?;
                }
            }
            None if ty.wildcard().is_some() => {
                let element = self.read_any(name, &tag)?;
                if let Some(items) = wildcard_content(ty, entity) {
                    items.push(MixedContent::Element(element));
                }
            }
            None => {
                self.context
                    .raise_or_collect(SchemaError::UnexpectedElement(tag.name.clone()))?;
                self.skip_subtree()?;
            }
        }

        self.context.exit();
        self.scopes.pop_scope();
        Ok(())
    }

    /// Store a converted value: append for lists and group members, replace otherwise
    fn assign(&mut self, entity: &mut Entity, feature: &Feature, value: Value) -> Result<()> {
        let result = if feature.is_many() || feature.group_name().is_some() {
            entity.push(feature.name(), value)
        } else {
            if entity.is_set(feature.name()) {
                self.context.raise_or_collect(SchemaError::TooManyValues {
                    type_name: entity.type_name().to_string(),
                    feature: feature.name().to_string(),
                    count: 2,
                    max: feature.occurrence().max.unwrap_or(1),
                })?;
            }
            entity.set(feature.name(), value)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) => self.context.raise_or_collect(e),
        }
    }

    /// Read character content of a simple element; nested elements are skipped
    fn read_simple(&mut self, feature: &Feature) -> Result<Option<Value>> {
        let mut text = String::new();
        loop {
            match self.source.next_event()? {
                XmlEvent::Text(chunk) => text.push_str(&chunk),
                XmlEvent::Comment(_) => {}
                XmlEvent::Start(tag) => {
                    self.context
                        .raise_or_collect(SchemaError::UnexpectedElement(tag.name))?;
                    self.skip_subtree()?;
                }
                XmlEvent::End => break,
                XmlEvent::Eof => return Err(unexpected_eof()),
            }
        }
        match feature.parse_lexical(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.context.raise_or_collect(e)?;
                Ok(None)
            }
        }
    }

    /// Capture an element and its content without interpretation
    fn read_any(&mut self, name: QName, tag: &StartTag) -> Result<AnyElement> {
        let mut element = AnyElement::new(name);
        for (raw, value) in &tag.attributes {
            if declared_prefix(raw).is_some() {
                continue;
            }
            let attribute = self
                .scopes
                .resolve_attribute(raw)
                .map_err(|e| self.context.fatal(e))?;
            element.attributes.insert(attribute, value.clone());
        }

        loop {
            match self.source.next_event()? {
                XmlEvent::Start(child) => {
                    self.open_scope(&child)?;
                    let child_name = self
                        .scopes
                        .resolve_element(&child.name)
                        .map_err(|e| self.context.fatal(e))?;
                    self.context.enter(display_name(self.registry, &child_name))?;
                    let captured = self.read_any(child_name, &child)?;
                    element.content.push(MixedContent::Element(captured));
                    self.context.exit();
                    self.scopes.pop_scope();
                }
                XmlEvent::Text(text) => push_text(&mut element.content, text),
                XmlEvent::Comment(text) => element.content.push(MixedContent::Comment(text)),
                XmlEvent::End => return Ok(element),
                XmlEvent::Eof => return Err(unexpected_eof()),
            }
        }
    }

    /// Discard everything up to the end tag of the current element
    fn skip_subtree(&mut self) -> Result<()> {
        let mut nested = 0usize;
        loop {
            match self.source.next_event()? {
                XmlEvent::Start(_) => {
                    nested += 1;
                    self.context
                        .limits()
                        .check_xml_depth(self.context.depth() + nested)
                        .map_err(|e| self.context.fatal(e))?;
                }
                XmlEvent::End if nested == 0 => return Ok(()),
                XmlEvent::End => nested -= 1,
                XmlEvent::Eof => return Err(unexpected_eof()),
                XmlEvent::Text(_) | XmlEvent::Comment(_) => {}
            }
        }
    }
}

fn wildcard_content<'e>(ty: &EntityType, entity: &'e mut Entity) -> Option<&'e mut Vec<MixedContent>> {
    let feature = ty.wildcard().and_then(|i| ty.feature_at(i))?;
    entity.mixed_mut(feature.name())
}

/// Append character data, joining it to a preceding text item (text split by CDATA)
fn push_text(items: &mut Vec<MixedContent>, text: String) {
    match items.last_mut() {
        Some(MixedContent::Text(previous)) => previous.push_str(&text),
        _ => items.push(MixedContent::Text(text)),
    }
}

fn unexpected_eof() -> Error {
    Error::Xml("unexpected end of document".to_string())
}
