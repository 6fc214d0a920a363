//! Entity type descriptors
//!
//! An [`EntityType`] is the resolved form of a [`TypeDecl`]: its feature list
//! is the supertype's effective features, in order, followed by its own, and
//! the lookup indexes the codec needs are computed once when the registry is
//! built.

use crate::error::SchemaError;
use crate::namespaces::QName;
use crate::schema::features::{Feature, FeatureType, XmlKind};
use std::collections::HashMap;
use std::fmt;

/// Kind of content an element of this type carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// No content, attributes only
    Empty,
    /// Character data only
    Simple,
    /// Child elements only
    ElementOnly,
    /// Child elements interspersed with character data
    Mixed,
}

impl ContentKind {
    /// Short label used in registry dumps
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Empty => "empty",
            ContentKind::Simple => "simple",
            ContentKind::ElementOnly => "elementOnly",
            ContentKind::Mixed => "mixed",
        }
    }
}

/// Declaration of a complex type, as written in the schema tables
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub(crate) name: QName,
    pub(crate) supertype: Option<QName>,
    pub(crate) is_abstract: bool,
    pub(crate) content: Option<ContentKind>,
    pub(crate) features: Vec<Feature>,
    pub(crate) extensible: bool,
}

impl TypeDecl {
    /// Start declaring a type
    pub fn new(name: QName) -> Self {
        Self {
            name,
            supertype: None,
            is_abstract: false,
            content: None,
            features: Vec::new(),
            extensible: false,
        }
    }

    /// Derive by extension from `supertype`
    pub fn extends(mut self, supertype: QName) -> Self {
        self.supertype = Some(supertype);
        self
    }

    /// Mark as abstract
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Set the content kind (inherited from the supertype otherwise)
    pub fn content(mut self, content: ContentKind) -> Self {
        self.content = Some(content);
        self
    }

    /// Append a feature
    pub fn feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Append several features
    pub fn features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    /// Instances carry out-of-band extended properties
    pub fn extensible(mut self) -> Self {
        self.extensible = true;
        self
    }

    /// Declared name
    pub fn name(&self) -> &QName {
        &self.name
    }
}

/// A resolved complex type
#[derive(Debug)]
pub struct EntityType {
    name: QName,
    supertype: Option<QName>,
    ancestors: Vec<QName>,
    is_abstract: bool,
    content: ContentKind,
    features: Vec<Feature>,
    own_start: usize,
    extensible: bool,
    by_name: HashMap<String, usize>,
    attributes: HashMap<QName, usize>,
    elements: HashMap<QName, usize>,
    simple_content: Option<usize>,
    wildcard: Option<usize>,
}

impl EntityType {
    /// Resolve a declaration against its already resolved supertype
    pub(crate) fn resolve(
        decl: TypeDecl,
        supertype: Option<&EntityType>,
    ) -> Result<Self, SchemaError> {
        let mut own = decl.features;
        for feature in &mut own {
            feature.resolve_default()?;
        }

        let (mut features, ancestors, inherited_content, extensible) = match supertype {
            Some(sup) => {
                let mut ancestors = vec![sup.name.clone()];
                ancestors.extend(sup.ancestors.iter().cloned());
                (sup.features.clone(), ancestors, Some(sup.content), sup.extensible)
            }
            None => (Vec::new(), Vec::new(), None, false),
        };
        let own_start = features.len();
        features.extend(own);

        let mut entity_type = Self {
            content: decl
                .content
                .or(inherited_content)
                .unwrap_or(ContentKind::ElementOnly),
            name: decl.name,
            supertype: decl.supertype,
            ancestors,
            is_abstract: decl.is_abstract,
            features,
            own_start,
            extensible: extensible || decl.extensible,
            by_name: HashMap::new(),
            attributes: HashMap::new(),
            elements: HashMap::new(),
            simple_content: None,
            wildcard: None,
        };
        entity_type.build_indexes()?;
        Ok(entity_type)
    }

    fn build_indexes(&mut self) -> Result<(), SchemaError> {
        let type_name = self.name.local_name.clone();
        let duplicate = |what: &str, name: &str| {
            SchemaError::SchemaDefinition(format!("{} declares {} '{}' twice", type_name, what, name))
        };

        for (index, feature) in self.features.iter().enumerate() {
            if self.by_name.insert(feature.name().to_string(), index).is_some() {
                return Err(duplicate("feature", feature.name()));
            }
            let previous = match feature.kind() {
                XmlKind::Attribute => self.attributes.insert(feature.xml_name().clone(), index),
                XmlKind::Element => self.elements.insert(feature.xml_name().clone(), index),
                XmlKind::SimpleContent => self.simple_content.replace(index),
                XmlKind::Wildcard => self.wildcard.replace(index),
                XmlKind::Group => None,
            };
            if previous.is_some() {
                return Err(duplicate(feature.kind().as_str(), feature.name()));
            }
        }

        for feature in &self.features {
            if let Some(group) = feature.group_name() {
                let is_group = self
                    .feature(group)
                    .map_or(false, |(_, g)| g.kind() == XmlKind::Group);
                if !is_group || feature.kind() != XmlKind::Element {
                    return Err(SchemaError::SchemaDefinition(format!(
                        "{}: '{}' is not an element member of a group '{}'",
                        type_name,
                        feature.name(),
                        group
                    )));
                }
            }
        }
        Ok(())
    }

    /// Qualified type name
    pub fn qname(&self) -> &QName {
        &self.name
    }

    /// Local type name, e.g. `GetCoverageType`
    pub fn name(&self) -> &str {
        &self.name.local_name
    }

    /// Direct supertype
    pub fn supertype(&self) -> Option<&QName> {
        self.supertype.as_ref()
    }

    /// All supertypes, nearest first
    pub fn ancestors(&self) -> &[QName] {
        &self.ancestors
    }

    /// Whether the type is this type or one of its supertypes
    pub fn is_a(&self, name: &QName) -> bool {
        &self.name == name || self.ancestors.contains(name)
    }

    /// Whether the type is abstract
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Content kind
    pub fn content(&self) -> ContentKind {
        self.content
    }

    /// Whether instances carry extended properties
    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    /// Effective features: supertype features first, then the type's own
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Features declared by this type itself
    pub fn own_features(&self) -> &[Feature] {
        &self.features[self.own_start..]
    }

    /// Feature and its index by name
    pub fn feature(&self, name: &str) -> Option<(usize, &Feature)> {
        self.by_name
            .get(name)
            .map(|&index| (index, &self.features[index]))
    }

    /// Feature by index
    pub fn feature_at(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Index of the attribute feature bound to `name`
    pub fn attribute(&self, name: &QName) -> Option<usize> {
        self.attributes.get(name).copied()
    }

    /// Index of an attribute feature written unqualified but declared in
    /// this type's own namespace
    pub fn attribute_by_local_name(&self, local_name: &str) -> Option<usize> {
        let qualified = QName::new(self.name.namespace.clone(), local_name);
        self.attributes.get(&qualified).copied()
    }

    /// Index of the element feature bound to `name`
    pub fn element(&self, name: &QName) -> Option<usize> {
        self.elements.get(name).copied()
    }

    /// Index of the simple-content feature
    pub fn simple_content(&self) -> Option<usize> {
        self.simple_content
    }

    /// Index of the wildcard feature
    pub fn wildcard(&self) -> Option<usize> {
        self.wildcard
    }

    /// Names of the entity types referenced by features
    pub fn referenced_types(&self) -> impl Iterator<Item = &QName> {
        self.features.iter().filter_map(|f| match f.ty() {
            FeatureType::Entity(name) => Some(name),
            _ => None,
        })
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> EntityType {
        let decl = TypeDecl::new(QName::wcs("BaseType"))
            .abstract_type()
            .feature(Feature::element(QName::wcs("name"), FeatureType::string()).required())
            .feature(Feature::attribute("version", FeatureType::string()).default("1.0.0"));
        EntityType::resolve(decl, None).unwrap()
    }

    #[test]
    fn test_effective_features_concatenate() {
        let base = base();
        let decl = TypeDecl::new(QName::wcs("DerivedType"))
            .extends(QName::wcs("BaseType"))
            .feature(Feature::element(QName::wcs("extra"), FeatureType::string()));
        let derived = EntityType::resolve(decl, Some(&base)).unwrap();

        let names: Vec<_> = derived.features().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["name", "version", "extra"]);
        assert_eq!(derived.own_features().len(), 1);
        assert!(derived.is_a(&QName::wcs("BaseType")));
        assert!(!base.is_a(&QName::wcs("DerivedType")));
        assert!(!derived.is_abstract());
        assert_eq!(derived.element(&QName::wcs("extra")), Some(2));
        assert_eq!(derived.attribute(&QName::local("version")), Some(1));
    }

    #[test]
    fn test_duplicate_feature_rejected() {
        let decl = TypeDecl::new(QName::wcs("DupType"))
            .feature(Feature::attribute("a", FeatureType::string()))
            .feature(Feature::attribute("a", FeatureType::string()));
        assert!(matches!(
            EntityType::resolve(decl, None),
            Err(SchemaError::SchemaDefinition(_))
        ));
    }

    #[test]
    fn test_group_members_need_group() {
        let decl = TypeDecl::new(QName::wcs("G"))
            .feature(Feature::element(QName::wcs("x"), FeatureType::string()).in_group("missing"));
        assert!(EntityType::resolve(decl, None).is_err());

        let decl = TypeDecl::new(QName::wcs("G"))
            .feature(Feature::group("choice"))
            .feature(Feature::element(QName::wcs("x"), FeatureType::string()).in_group("choice"));
        assert!(EntityType::resolve(decl, None).is_ok());
    }

    #[test]
    fn test_qualified_attribute_lookup() {
        let decl = TypeDecl::new(QName::wcs("ValueRangeType")).feature(
            Feature::attribute("closure", FeatureType::string()).qualified(crate::namespaces::WCS_NAMESPACE),
        );
        let ty = EntityType::resolve(decl, None).unwrap();
        assert_eq!(ty.attribute(&QName::local("closure")), None);
        assert_eq!(ty.attribute_by_local_name("closure"), Some(0));
    }
}
