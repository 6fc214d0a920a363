//! Serializable registry dump
//!
//! These structures describe a [`Registry`] in a stable JSON form, used by the
//! `inspect` command and handy for diffing registry tables between versions.
//! Qualified names use Clark notation (`{namespace}localName`).

use crate::error::Result;
use crate::schema::{EntityType, Feature, Registry};
use serde::{Deserialize, Serialize};

/// Complete registry dump
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RegistryDump {
    /// Target namespace of the registry
    pub target_namespace: Option<String>,

    /// Prefix bindings used when writing documents
    pub prefixes: Vec<PrefixInfo>,

    /// Global elements that may root a document
    pub global_elements: Vec<ElementInfo>,

    /// Entity types in declaration order
    pub types: Vec<TypeInfo>,

    /// Enumerations in declaration order
    pub enumerations: Vec<EnumerationInfo>,
}

/// One prefix binding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrefixInfo {
    /// The prefix
    pub prefix: String,
    /// Namespace URI it binds
    pub namespace: String,
}

/// Global element information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementInfo {
    /// Element name
    pub name: String,

    /// Declared value type
    #[serde(rename = "type")]
    pub element_type: String,

    /// Head of the substitution group the element belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution_group: Option<String>,
}

/// Entity type information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeInfo {
    /// Type name
    pub name: String,

    /// Direct supertype
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,

    /// Whether instances cannot be created
    pub is_abstract: bool,

    /// Whether instances carry extended properties
    pub extensible: bool,

    /// Content model (empty, simple, elementOnly, mixed)
    pub content: String,

    /// Effective features, inherited ones first
    pub features: Vec<FeatureInfo>,
}

/// Feature information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureInfo {
    /// Feature name
    pub name: String,

    /// XML binding kind (attribute, element, simpleContent, group, any)
    pub kind: String,

    /// Bound XML name
    pub xml_name: String,

    /// Declared value type
    #[serde(rename = "type")]
    pub feature_type: String,

    /// Minimum occurrences
    pub min_occurs: u32,

    /// Maximum occurrences (None means unbounded)
    pub max_occurs: Option<u32>,

    /// Default literal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Whether the feature tracks an explicit set/unset state
    pub unsettable: bool,

    /// Choice group the feature is a member of
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Enumeration information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnumerationInfo {
    /// Enumeration name
    pub name: String,

    /// Literals in declaration order
    pub literals: Vec<LiteralInfo>,
}

/// One enumeration literal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiteralInfo {
    /// Integer value
    pub value: i32,
    /// Symbolic name
    pub name: String,
    /// Wire text
    pub literal: String,
}

impl RegistryDump {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a type by local name
    pub fn type_info(&self, local_name: &str) -> Option<&TypeInfo> {
        self.types
            .iter()
            .find(|t| t.name.rsplit('}').next() == Some(local_name))
    }
}

impl Registry {
    /// Describe the registry's tables
    pub fn dump(&self) -> RegistryDump {
        RegistryDump {
            target_namespace: self.target_namespace().map(str::to_string),
            prefixes: self
                .prefixes()
                .iter()
                .map(|(prefix, namespace)| PrefixInfo {
                    prefix: prefix.clone(),
                    namespace: namespace.clone(),
                })
                .collect(),
            global_elements: self
                .global_elements()
                .map(|element| ElementInfo {
                    name: element.name().to_string(),
                    element_type: element.ty().to_string(),
                    substitution_group: element.substitution_group().map(ToString::to_string),
                })
                .collect(),
            types: self.types().map(|ty| type_info(ty)).collect(),
            enumerations: self
                .enumerations()
                .map(|enumeration| EnumerationInfo {
                    name: format!("{{{}}}{}", enumeration.namespace(), enumeration.name()),
                    literals: enumeration
                        .literals()
                        .iter()
                        .map(|l| LiteralInfo {
                            value: l.value,
                            name: l.name.to_string(),
                            literal: l.literal.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn type_info(ty: &EntityType) -> TypeInfo {
    TypeInfo {
        name: ty.qname().to_string(),
        supertype: ty.supertype().map(ToString::to_string),
        is_abstract: ty.is_abstract(),
        extensible: ty.is_extensible(),
        content: ty.content().as_str().to_string(),
        features: ty.features().iter().map(feature_info).collect(),
    }
}

fn feature_info(feature: &Feature) -> FeatureInfo {
    FeatureInfo {
        name: feature.name().to_string(),
        kind: feature.kind().as_str().to_string(),
        xml_name: feature.xml_name().to_string(),
        feature_type: feature.ty().to_string(),
        min_occurs: feature.occurrence().min,
        max_occurs: feature.occurrence().max,
        default: feature.default_literal().map(str::to_string),
        unsettable: feature.is_unsettable(),
        group: feature.group_name().map(str::to_string),
    }
}
