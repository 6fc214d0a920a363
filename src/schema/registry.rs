//! The schema type registry
//!
//! A [`Registry`] is an immutable catalog of entity types, enumerations and
//! global elements, built once from declaration tables by a
//! [`RegistryBuilder`]. [`Registry::wcs10`] returns the process-wide WCS 1.0
//! instance; it is built on first use under a one-time-init guard and shared
//! afterwards without locking. Codecs take the registry explicitly, so custom
//! registries can be built and injected just as well.

use crate::error::SchemaError;
use crate::model::Value;
use crate::names::split_qname;
use crate::namespaces::QName;
use crate::schema::enums::EnumerationType;
use crate::schema::features::FeatureType;
use crate::schema::types::{EntityType, TypeDecl};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

static WCS10: OnceCell<Arc<Registry>> = OnceCell::new();

/// A global element declaration: a candidate document root
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalElement {
    name: QName,
    ty: FeatureType,
    affiliation: Option<QName>,
}

impl GlobalElement {
    /// Declare a global element of the given type
    pub fn new(name: QName, ty: FeatureType) -> Self {
        Self {
            name,
            ty,
            affiliation: None,
        }
    }

    /// Declare the substitution group head this element belongs to
    pub fn affiliation(mut self, head: QName) -> Self {
        self.affiliation = Some(head);
        self
    }

    /// Element name
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Declared value type
    pub fn ty(&self) -> &FeatureType {
        &self.ty
    }

    /// Substitution group head
    pub fn substitution_group(&self) -> Option<&QName> {
        self.affiliation.as_ref()
    }

    /// Check that a value may occupy this element
    pub fn check_value(&self, value: &Value) -> Result<(), SchemaError> {
        if value.conforms_to(&self.ty) {
            Ok(())
        } else {
            Err(SchemaError::TypeMismatch {
                feature: self.name.local_name.clone(),
                expected: self.ty.to_string(),
                found: value.type_label(),
            })
        }
    }
}

/// Collects declarations and resolves them into a [`Registry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    target_namespace: Option<String>,
    prefixes: Vec<(String, String)>,
    types: Vec<TypeDecl>,
    enums: Vec<EnumerationType>,
    globals: Vec<GlobalElement>,
}

impl RegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace that unprefixed type names resolve to
    pub fn target_namespace(&mut self, namespace: &str) -> &mut Self {
        self.target_namespace = Some(namespace.to_string());
        self
    }

    /// Register a conventional prefix
    pub fn prefix(&mut self, prefix: &str, namespace: &str) -> &mut Self {
        self.prefixes.push((prefix.to_string(), namespace.to_string()));
        self
    }

    /// Add a type declaration
    pub fn add_type(&mut self, decl: TypeDecl) -> &mut Self {
        self.types.push(decl);
        self
    }

    /// Add an enumeration (enumerations used by features are added implicitly)
    pub fn add_enum(&mut self, enumeration: EnumerationType) -> &mut Self {
        self.enums.push(enumeration);
        self
    }

    /// Add a global element
    pub fn add_global(&mut self, element: GlobalElement) -> &mut Self {
        self.globals.push(element);
        self
    }

    /// Resolve every declaration
    ///
    /// Fails when a supertype or a referenced type is missing, when
    /// inheritance is cyclic, or when a default does not convert.
    pub fn build(self) -> Result<Registry, SchemaError> {
        let mut pending: IndexMap<QName, TypeDecl> = IndexMap::new();
        for decl in self.types {
            let name = decl.name().clone();
            if pending.insert(name.clone(), decl).is_some() {
                return Err(SchemaError::SchemaDefinition(format!(
                    "type {} declared twice",
                    name
                )));
            }
        }

        let order: Vec<QName> = pending.keys().cloned().collect();
        let mut resolved: IndexMap<QName, Arc<EntityType>> = IndexMap::new();
        for name in &order {
            resolve_type(name, &mut pending, &mut resolved, &mut Vec::new())?;
        }
        // keep declaration order rather than resolution order
        let types: IndexMap<QName, Arc<EntityType>> = order
            .iter()
            .filter_map(|name| resolved.get(name).map(|ty| (name.clone(), Arc::clone(ty))))
            .collect();

        let mut enums: IndexMap<&'static str, EnumerationType> = IndexMap::new();
        for enumeration in self.enums {
            enums.insert(enumeration.name(), enumeration);
        }

        for ty in types.values() {
            for feature in ty.own_features() {
                match feature.ty() {
                    FeatureType::Entity(target) if !types.contains_key(target) => {
                        return Err(SchemaError::SchemaDefinition(format!(
                            "{}.{} references unknown type {}",
                            ty.name(),
                            feature.name(),
                            target
                        )));
                    }
                    FeatureType::Enumeration(e) => {
                        enums.entry(e.name()).or_insert(*e);
                    }
                    _ => {}
                }
            }
        }

        let mut globals = IndexMap::new();
        for element in self.globals {
            match element.ty() {
                FeatureType::Entity(target) if !types.contains_key(target) => {
                    return Err(SchemaError::SchemaDefinition(format!(
                        "global element {} references unknown type {}",
                        element.name(),
                        target
                    )));
                }
                FeatureType::Enumeration(e) => {
                    enums.entry(e.name()).or_insert(*e);
                }
                _ => {}
            }
            globals.insert(element.name().clone(), element);
        }

        Ok(Registry {
            target_namespace: self.target_namespace,
            prefixes: self.prefixes,
            types,
            enums,
            globals,
        })
    }
}

fn resolve_type(
    name: &QName,
    pending: &mut IndexMap<QName, TypeDecl>,
    done: &mut IndexMap<QName, Arc<EntityType>>,
    visiting: &mut Vec<QName>,
) -> Result<Arc<EntityType>, SchemaError> {
    if let Some(ty) = done.get(name) {
        return Ok(Arc::clone(ty));
    }
    if visiting.contains(name) {
        return Err(SchemaError::SchemaDefinition(format!(
            "cyclic inheritance through {}",
            name
        )));
    }
    let decl = pending
        .shift_remove(name)
        .ok_or_else(|| SchemaError::UnknownType(name.to_string()))?;

    visiting.push(name.clone());
    let supertype = match &decl.supertype {
        Some(sup) => Some(resolve_type(sup, pending, done, visiting)?),
        None => None,
    };
    visiting.pop();

    let ty = Arc::new(EntityType::resolve(decl, supertype.as_deref())?);
    done.insert(name.clone(), Arc::clone(&ty));
    Ok(ty)
}

/// Immutable catalog of entity types, enumerations and global elements
#[derive(Debug)]
pub struct Registry {
    target_namespace: Option<String>,
    prefixes: Vec<(String, String)>,
    types: IndexMap<QName, Arc<EntityType>>,
    enums: IndexMap<&'static str, EnumerationType>,
    globals: IndexMap<QName, GlobalElement>,
}

impl Registry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The process-wide WCS 1.0 registry, built on first use
    pub fn wcs10() -> Result<Arc<Registry>, SchemaError> {
        WCS10
            .get_or_try_init(|| {
                let registry = crate::schema::wcs::build()?;
                debug!(
                    types = registry.types.len(),
                    enumerations = registry.enums.len(),
                    global_elements = registry.globals.len(),
                    "built WCS 1.0 registry"
                );
                Ok(Arc::new(registry))
            })
            .map(Arc::clone)
    }

    /// Look up a type by name
    ///
    /// Accepts `GetCoverageType` (target namespace), `gml:EnvelopeType`
    /// (registered prefix) or Clark notation.
    pub fn type_of(&self, name: &str) -> Option<&Arc<EntityType>> {
        self.types.get(&self.qualify(name)?)
    }

    /// Look up a type by qualified name
    pub fn type_by_qname(&self, name: &QName) -> Option<&Arc<EntityType>> {
        self.types.get(name)
    }

    /// Look up a type, failing with [`SchemaError::UnknownType`]
    pub fn require_type(&self, name: &str) -> Result<&Arc<EntityType>, SchemaError> {
        self.type_of(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    /// Look up a type that can be instantiated
    pub fn concrete_type(&self, name: &QName) -> Result<Arc<EntityType>, SchemaError> {
        let ty = self
            .types
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))?;
        if ty.is_abstract() {
            return Err(SchemaError::AbstractType(ty.name().to_string()));
        }
        Ok(Arc::clone(ty))
    }

    /// Look up an enumeration by name
    pub fn enum_of(&self, name: &str) -> Option<&EnumerationType> {
        let (_, local) = split_qname(name);
        self.enums.get(local)
    }

    /// Look up a global element
    pub fn global_element(&self, name: &QName) -> Option<&GlobalElement> {
        self.globals.get(name)
    }

    /// The first global element whose declared type is exactly `type_name`
    pub fn global_element_for_type(&self, type_name: &QName) -> Option<&GlobalElement> {
        self.globals
            .values()
            .find(|g| matches!(g.ty(), FeatureType::Entity(t) if t == type_name))
    }

    /// All types in declaration order
    pub fn types(&self) -> impl Iterator<Item = &Arc<EntityType>> {
        self.types.values()
    }

    /// All enumerations
    pub fn enumerations(&self) -> impl Iterator<Item = &EnumerationType> {
        self.enums.values()
    }

    /// All global elements in declaration order
    pub fn global_elements(&self) -> impl Iterator<Item = &GlobalElement> {
        self.globals.values()
    }

    /// Conventional prefixes
    pub fn prefixes(&self) -> &[(String, String)] {
        &self.prefixes
    }

    /// Conventional prefix for a namespace
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, uri)| uri == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Namespace unprefixed type names resolve to
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Direct and indirect subtypes of a type
    pub fn subtypes_of<'a>(&'a self, name: &'a QName) -> impl Iterator<Item = &'a Arc<EntityType>> {
        self.types
            .values()
            .filter(move |ty| ty.qname() != name && ty.is_a(name))
    }

    fn qualify(&self, name: &str) -> Option<QName> {
        if name.starts_with('{') {
            return Some(QName::from_clark(name));
        }
        match split_qname(name) {
            (Some(prefix), local) => self
                .prefixes
                .iter()
                .find(|(p, _)| p == prefix)
                .map(|(_, uri)| QName::namespaced(uri.as_str(), local)),
            (None, local) => Some(QName::new(self.target_namespace.clone(), local)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Closure;
    use crate::schema::features::Feature;
    use crate::schema::SchemaEnum;

    fn small() -> RegistryBuilder {
        let mut builder = Registry::builder();
        builder
            .target_namespace("urn:test")
            .prefix("t", "urn:test")
            .add_type(
                TypeDecl::new(QName::namespaced("urn:test", "ChildType")).extends(QName::namespaced(
                    "urn:test",
                    "BaseType",
                )),
            )
            .add_type(
                TypeDecl::new(QName::namespaced("urn:test", "BaseType"))
                    .abstract_type()
                    .feature(
                        Feature::attribute("closure", FeatureType::enumeration::<Closure>())
                            .default("closed"),
                    ),
            )
            .add_global(GlobalElement::new(
                QName::namespaced("urn:test", "Child"),
                FeatureType::entity(QName::namespaced("urn:test", "ChildType")),
            ));
        builder
    }

    #[test]
    fn test_forward_supertype_reference() {
        let registry = small().build().unwrap();
        let child = registry.type_of("ChildType").unwrap();
        assert_eq!(child.features().len(), 1);
        assert!(registry.type_of("t:BaseType").unwrap().is_abstract());
        assert!(registry.type_of("{urn:test}ChildType").is_some());
        assert!(registry.type_of("x:ChildType").is_none());

        let names: Vec<_> = registry.types().map(|t| t.name()).collect();
        assert_eq!(names, vec!["ChildType", "BaseType"]);
    }

    #[test]
    fn test_enumerations_collected_from_features() {
        let registry = small().build().unwrap();
        assert_eq!(
            registry.enum_of("ClosureType"),
            Some(&Closure::ENUMERATION)
        );
        assert!(registry.enum_of("NoSuchType").is_none());
    }

    #[test]
    fn test_missing_supertype() {
        let mut builder = Registry::builder();
        builder.add_type(
            TypeDecl::new(QName::local("Orphan")).extends(QName::local("Missing")),
        );
        assert_eq!(
            builder.build().unwrap_err(),
            SchemaError::UnknownType("Missing".to_string())
        );
    }

    #[test]
    fn test_cyclic_inheritance() {
        let mut builder = Registry::builder();
        builder
            .add_type(TypeDecl::new(QName::local("A")).extends(QName::local("B")))
            .add_type(TypeDecl::new(QName::local("B")).extends(QName::local("A")));
        assert!(matches!(
            builder.build(),
            Err(SchemaError::SchemaDefinition(_))
        ));
    }

    #[test]
    fn test_concrete_type() {
        let registry = small().build().unwrap();
        let base = QName::namespaced("urn:test", "BaseType");
        assert_eq!(
            registry.concrete_type(&base).unwrap_err(),
            SchemaError::AbstractType("BaseType".to_string())
        );
        assert_eq!(registry.subtypes_of(&base).count(), 1);
        assert!(registry
            .global_element_for_type(&QName::namespaced("urn:test", "ChildType"))
            .is_some());
    }
}
