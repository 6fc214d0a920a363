//! Entity instances
//!
//! An [`Entity`] holds one slot per effective feature of its
//! [`EntityType`]. Contained children are owned values, so the containment
//! graph is a tree by construction: attaching a child moves it, and a child
//! can only be reattached elsewhere after it has been taken out of its
//! current parent (see [`Entity::take`] and [`Entity::transfer`]).
//!
//! Mutation only checks value types. Cardinality and required features are
//! checked by [`Entity::validate`], which the writer runs before emitting
//! anything.

use crate::documents::MixedContent;
use crate::error::{Diagnostic, SchemaError};
use crate::model::value::{State, Value};
use crate::namespaces::QName;
use crate::schema::{EntityType, Feature, SchemaEnum, XmlKind};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::sync::Arc;

/// One entry of a choice group: the member feature it was bound to and its value
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    /// Name of the member feature
    pub member: String,
    /// The member's value
    pub value: Value,
}

impl GroupEntry {
    /// Create an entry
    pub fn new(member: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            member: member.into(),
            value: value.into(),
        }
    }
}

/// Storage for one feature
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    One(State<Value>),
    Many(Vec<Value>),
    Group(Vec<GroupEntry>),
    // group members store their values in the group slot
    Member,
    Mixed(Vec<MixedContent>),
}

impl Slot {
    fn for_feature(feature: &Feature) -> Self {
        match feature.kind() {
            XmlKind::Group => Slot::Group(Vec::new()),
            XmlKind::Wildcard => Slot::Mixed(Vec::new()),
            _ if feature.group_name().is_some() => Slot::Member,
            _ if feature.is_many() => Slot::Many(Vec::new()),
            _ => Slot::One(State::Unset),
        }
    }
}

/// Out-of-band data attached to request entities, never serialized
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedProperties {
    base_url: Option<String>,
    properties: IndexMap<String, serde_json::Value>,
}

impl ExtendedProperties {
    /// Base URL the request was received on
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Set the base URL
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = Some(url.into());
    }

    /// Client-attached properties
    pub fn properties(&self) -> &IndexMap<String, serde_json::Value> {
        &self.properties
    }

    /// Client-attached properties, mutably
    pub fn properties_mut(&mut self) -> &mut IndexMap<String, serde_json::Value> {
        &mut self.properties
    }

    /// Whether nothing has been attached
    pub fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.properties.is_empty()
    }
}

/// An instance of an entity type
#[derive(Debug, Clone)]
pub struct Entity {
    ty: Arc<EntityType>,
    slots: Vec<Slot>,
    extended: Option<ExtendedProperties>,
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.ty.qname() == other.ty.qname()
            && self.slots == other.slots
            && self.extended == other.extended
    }
}

impl Entity {
    /// Create an empty instance: single features unset, lists empty
    pub fn new(ty: Arc<EntityType>) -> Self {
        let slots = ty.features().iter().map(Slot::for_feature).collect();
        let extended = ty.is_extensible().then(ExtendedProperties::default);
        Self {
            ty,
            slots,
            extended,
        }
    }

    /// The entity's type
    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.ty
    }

    /// Local name of the entity's type
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// Whether the entity's type is `name` or derives from it
    pub fn is_a(&self, name: &QName) -> bool {
        self.ty.is_a(name)
    }

    pub(crate) fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    /// Current value of a single-valued feature
    ///
    /// An unset feature with a declared default reads as the default; use
    /// [`Entity::is_set`] to tell the two apart.
    pub fn get(&self, feature: &str) -> Option<&Value> {
        let (index, f) = self.ty.feature(feature)?;
        match &self.slots[index] {
            Slot::One(state) => state.or(f.default_value()),
            _ => None,
        }
    }

    /// Whether the feature holds an explicitly assigned value (or any list entry)
    ///
    /// An unset required attribute with a default is written with that
    /// default, so after a write and read it reports as set.
    pub fn is_set(&self, feature: &str) -> bool {
        let Some((index, f)) = self.ty.feature(feature) else {
            return false;
        };
        match &self.slots[index] {
            Slot::One(state) => state.is_set(),
            Slot::Many(values) => !values.is_empty(),
            Slot::Group(entries) => !entries.is_empty(),
            Slot::Member => self.member_count(f) > 0,
            Slot::Mixed(items) => !items.is_empty(),
        }
    }

    /// Assign a single-valued feature
    ///
    /// Values of the wrong type are rejected with
    /// [`SchemaError::TypeMismatch`]. A contained entity is moved in.
    pub fn set(&mut self, feature: &str, value: impl Into<Value>) -> Result<(), SchemaError> {
        let value = value.into();
        let ty = Arc::clone(&self.ty);
        let (index, f) = lookup(&ty, feature)?;
        f.check_value(&value)?;
        match &mut self.slots[index] {
            Slot::One(state) => {
                *state = State::Set(value);
                Ok(())
            }
            _ => Err(list_error(&ty, f, "single value (use push)")),
        }
    }

    /// Append to a list feature or a group member
    pub fn push(&mut self, feature: &str, value: impl Into<Value>) -> Result<(), SchemaError> {
        let value = value.into();
        let ty = Arc::clone(&self.ty);
        let (index, f) = lookup(&ty, feature)?;
        f.check_value(&value)?;
        let group = f.group_name().and_then(|g| ty.feature(g)).map(|(i, _)| i);

        let target = match (&self.slots[index], group) {
            (Slot::Many(_), _) => index,
            (Slot::Member, Some(group)) => group,
            _ => return Err(list_error(&ty, f, "list value (use set)")),
        };
        match &mut self.slots[target] {
            Slot::Many(values) => values.push(value),
            Slot::Group(entries) => entries.push(GroupEntry {
                member: f.name().to_string(),
                value,
            }),
            _ => {}
        }
        Ok(())
    }

    /// Return a feature to its initial state
    ///
    /// Single features become unset (reading as their default again), lists,
    /// groups and wildcards are emptied, group members lose their entries.
    pub fn unset(&mut self, feature: &str) -> Result<(), SchemaError> {
        let ty = Arc::clone(&self.ty);
        let (index, f) = lookup(&ty, feature)?;

        if matches!(self.slots[index], Slot::Member) {
            let group = f.group_name().and_then(|g| ty.feature(g)).map(|(i, _)| i);
            if let Some(Slot::Group(entries)) = group.map(|g| &mut self.slots[g]) {
                entries.retain(|e| e.member != f.name());
            }
            return Ok(());
        }
        match &mut self.slots[index] {
            Slot::One(state) => *state = State::Unset,
            Slot::Many(values) => values.clear(),
            Slot::Group(entries) => entries.clear(),
            Slot::Mixed(items) => items.clear(),
            Slot::Member => {}
        }
        Ok(())
    }

    /// Detach and return the value of a single-valued feature
    pub fn take(&mut self, feature: &str) -> Option<Value> {
        let (index, _) = self.ty.feature(feature)?;
        match &mut self.slots[index] {
            Slot::One(state) => state.take(),
            _ => None,
        }
    }

    /// Move a contained value from one parent's feature to another's
    ///
    /// The target is checked before anything is detached, so a failed
    /// transfer leaves both parents untouched.
    pub fn transfer(
        source: &mut Entity,
        source_feature: &str,
        target: &mut Entity,
        target_feature: &str,
    ) -> Result<(), SchemaError> {
        let target_ty = Arc::clone(&target.ty);
        let (_, target_f) = lookup(&target_ty, target_feature)?;
        let value = source
            .get_set(source_feature)?
            .ok_or_else(|| SchemaError::MissingRequiredFeature {
                type_name: source.type_name().to_string(),
                feature: source_feature.to_string(),
            })?;
        target_f.check_value(value)?;

        if let Some(value) = source.take(source_feature) {
            if target_f.is_many() {
                target.push(target_feature, value)?;
            } else {
                target.set(target_feature, value)?;
            }
        }
        Ok(())
    }

    fn get_set(&self, feature: &str) -> Result<Option<&Value>, SchemaError> {
        let (index, f) = lookup(&self.ty, feature)?;
        match &self.slots[index] {
            Slot::One(state) => Ok(state.get()),
            _ => Err(list_error(&self.ty, f, "single value")),
        }
    }

    /// Every value of a feature in order: a set single value, list entries,
    /// a member's group entries, or all entries of a group
    pub fn values(&self, feature: &str) -> Vec<&Value> {
        let Some((index, f)) = self.ty.feature(feature) else {
            return Vec::new();
        };
        match &self.slots[index] {
            Slot::One(state) => state.get().into_iter().collect(),
            Slot::Many(values) => values.iter().collect(),
            Slot::Group(entries) => entries.iter().map(|e| &e.value).collect(),
            Slot::Member => self
                .group_entries_of(f)
                .map(|e| &e.value)
                .collect(),
            Slot::Mixed(_) => Vec::new(),
        }
    }

    fn group_entries_of<'a>(&'a self, member: &'a Feature) -> impl Iterator<Item = &'a GroupEntry> {
        let entries = member
            .group_name()
            .and_then(|g| self.ty.feature(g))
            .and_then(|(i, _)| match &self.slots[i] {
                Slot::Group(entries) => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or(&[]);
        entries.iter().filter(move |e| e.member == member.name())
    }

    fn member_count(&self, member: &Feature) -> usize {
        self.group_entries_of(member).count()
    }

    /// Live list of a multi-valued feature
    pub fn list(&self, feature: &str) -> Option<&Vec<Value>> {
        let (index, _) = self.ty.feature(feature)?;
        match &self.slots[index] {
            Slot::Many(values) => Some(values),
            _ => None,
        }
    }

    /// Live mutable list of a multi-valued feature
    ///
    /// Values inserted here are type-checked when the entity is validated.
    pub fn list_mut(&mut self, feature: &str) -> Option<&mut Vec<Value>> {
        let (index, _) = self.ty.feature(feature)?;
        match &mut self.slots[index] {
            Slot::Many(values) => Some(values),
            _ => None,
        }
    }

    /// Entries of a choice group
    pub fn group(&self, feature: &str) -> Option<&Vec<GroupEntry>> {
        let (index, _) = self.ty.feature(feature)?;
        match &self.slots[index] {
            Slot::Group(entries) => Some(entries),
            _ => None,
        }
    }

    /// Entries of a choice group, mutably
    pub fn group_mut(&mut self, feature: &str) -> Option<&mut Vec<GroupEntry>> {
        let (index, _) = self.ty.feature(feature)?;
        match &mut self.slots[index] {
            Slot::Group(entries) => Some(entries),
            _ => None,
        }
    }

    /// Wildcard content
    pub fn mixed(&self, feature: &str) -> Option<&Vec<MixedContent>> {
        let (index, _) = self.ty.feature(feature)?;
        match &self.slots[index] {
            Slot::Mixed(items) => Some(items),
            _ => None,
        }
    }

    /// Wildcard content, mutably
    pub fn mixed_mut(&mut self, feature: &str) -> Option<&mut Vec<MixedContent>> {
        let (index, _) = self.ty.feature(feature)?;
        match &mut self.slots[index] {
            Slot::Mixed(items) => Some(items),
            _ => None,
        }
    }

    /// String value of a feature (default included)
    pub fn get_str(&self, feature: &str) -> Option<&str> {
        self.get(feature).and_then(Value::as_str)
    }

    /// Boolean value of a feature (default included)
    pub fn get_bool(&self, feature: &str) -> Option<bool> {
        self.get(feature).and_then(Value::as_bool)
    }

    /// Decimal value of a feature
    pub fn get_decimal(&self, feature: &str) -> Option<Decimal> {
        self.get(feature).and_then(Value::as_decimal)
    }

    /// Integer value of a feature
    pub fn get_integer(&self, feature: &str) -> Option<i64> {
        self.get(feature).and_then(Value::as_integer)
    }

    /// Typed enumeration value of a feature (default included)
    pub fn get_enum<T: SchemaEnum>(&self, feature: &str) -> Option<T> {
        self.get(feature).and_then(Value::as_typed_enum)
    }

    /// Contained child of a single-valued feature
    pub fn child(&self, feature: &str) -> Option<&Entity> {
        self.get(feature).and_then(Value::as_entity)
    }

    /// Contained child of a single-valued feature, mutably
    pub fn child_mut(&mut self, feature: &str) -> Option<&mut Entity> {
        let (index, _) = self.ty.feature(feature)?;
        match &mut self.slots[index] {
            Slot::One(state) => state.get_mut().and_then(Value::as_entity_mut),
            _ => None,
        }
    }

    /// Contained children of any feature, in order
    pub fn children(&self, feature: &str) -> Vec<&Entity> {
        self.values(feature)
            .into_iter()
            .filter_map(Value::as_entity)
            .collect()
    }

    /// Extended properties, for request types
    pub fn extended_properties(&self) -> Option<&ExtendedProperties> {
        self.extended.as_ref()
    }

    /// Extended properties, mutably
    pub fn extended_properties_mut(&mut self) -> Option<&mut ExtendedProperties> {
        self.extended.as_mut()
    }

    /// Base URL from the extended properties
    pub fn base_url(&self) -> Option<&str> {
        self.extended.as_ref().and_then(ExtendedProperties::base_url)
    }

    /// Set the base URL; fails on types without extended properties
    pub fn set_base_url(&mut self, url: impl Into<String>) -> Result<(), SchemaError> {
        match self.extended.as_mut() {
            Some(extended) => {
                extended.set_base_url(url);
                Ok(())
            }
            None => Err(SchemaError::UnknownFeature {
                type_name: self.ty.name().to_string(),
                feature: "baseUrl".to_string(),
            }),
        }
    }

    /// Check the whole subtree for everything a write would reject
    ///
    /// Paths in the returned diagnostics start at `/` + the type name.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut problems = Vec::new();
        self.validate_into(&format!("/{}", self.type_name()), true, &mut problems);
        problems
    }

    /// Check this entity's own cardinality constraints (children not visited)
    pub fn check_cardinality(&self, path: &str) -> Vec<Diagnostic> {
        let mut problems = Vec::new();
        self.validate_into(path, false, &mut problems);
        problems
    }

    pub(crate) fn validate_into(&self, path: &str, deep: bool, out: &mut Vec<Diagnostic>) {
        for (index, feature) in self.ty.features().iter().enumerate() {
            let feature_path = format!("{}/{}", path, feature.name());
            let count = match &self.slots[index] {
                Slot::One(state) => {
                    if deep {
                        if let Some(value) = state.get() {
                            self.check_nested(feature, value, &feature_path, out);
                        }
                    }
                    usize::from(state.is_set() || feature.is_satisfied_by_default())
                }
                Slot::Many(values) => {
                    if deep {
                        for (i, value) in values.iter().enumerate() {
                            let item_path = format!("{}[{}]", feature_path, i + 1);
                            self.check_nested(feature, value, &item_path, out);
                        }
                    }
                    values.len()
                }
                Slot::Group(entries) => {
                    if deep {
                        self.check_group(entries, &feature_path, out);
                    }
                    entries.len()
                }
                // members are bounded by their group
                Slot::Member => continue,
                Slot::Mixed(items) => items
                    .iter()
                    .filter(|item| matches!(item, MixedContent::Element(_)))
                    .count(),
            };

            if count < feature.occurrence().min as usize {
                out.push(
                    Diagnostic::new(SchemaError::MissingRequiredFeature {
                        type_name: self.ty.name().to_string(),
                        feature: feature.name().to_string(),
                    })
                    .with_path(path),
                );
            } else if feature.occurrence().is_exceeded_by(count) {
                out.push(
                    Diagnostic::new(SchemaError::TooManyValues {
                        type_name: self.ty.name().to_string(),
                        feature: feature.name().to_string(),
                        count,
                        max: feature.occurrence().max.unwrap_or(u32::MAX),
                    })
                    .with_path(path),
                );
            }
        }
    }

    fn check_group(&self, entries: &[GroupEntry], path: &str, out: &mut Vec<Diagnostic>) {
        for (i, entry) in entries.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i + 1);
            match self.ty.feature(&entry.member) {
                Some((_, member)) if member.group_name().is_some() => {
                    self.check_nested(member, &entry.value, &item_path, out)
                }
                _ => out.push(
                    Diagnostic::new(SchemaError::UnknownFeature {
                        type_name: self.ty.name().to_string(),
                        feature: entry.member.clone(),
                    })
                    .with_path(item_path),
                ),
            }
        }
    }

    fn check_nested(&self, feature: &Feature, value: &Value, path: &str, out: &mut Vec<Diagnostic>) {
        if let Err(e) = feature.check_value(value) {
            out.push(Diagnostic::new(e).with_path(path));
            return;
        }
        if let Value::Entity(child) = value {
            child.validate_into(path, true, out);
        }
    }
}

fn lookup<'t>(ty: &'t EntityType, name: &str) -> Result<(usize, &'t Feature), SchemaError> {
    ty.feature(name).ok_or_else(|| SchemaError::UnknownFeature {
        type_name: ty.name().to_string(),
        feature: name.to_string(),
    })
}

fn list_error(ty: &EntityType, feature: &Feature, expected: &str) -> SchemaError {
    SchemaError::TypeMismatch {
        feature: feature.name().to_string(),
        expected: expected.to_string(),
        found: format!("{} feature of {}", feature.occurrence(), ty.name()),
    }
}
