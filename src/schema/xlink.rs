//! XLink simple-link attributes
//!
//! XLink declares no complex types of its own; link-bearing WCS and GML types
//! carry the `simpleLink` attribute group, which this module hands out as a
//! feature list.

use crate::enums::{Actuate, Show};
use crate::namespaces::XLINK_NAMESPACE;
use crate::schema::features::{Feature, FeatureType};

fn xlink(name: &str, ty: FeatureType) -> Feature {
    Feature::attribute(name, ty).qualified(XLINK_NAMESPACE)
}

/// The `xlink:simpleLink` attribute group
pub(crate) fn simple_link() -> Vec<Feature> {
    vec![
        xlink("actuate", FeatureType::enumeration::<Actuate>())
            .default("onLoad")
            .unsettable(),
        xlink("arcrole", FeatureType::any_uri()),
        xlink("href", FeatureType::any_uri()),
        xlink("role", FeatureType::any_uri()),
        xlink("show", FeatureType::enumeration::<Show>())
            .default("new")
            .unsettable(),
        xlink("title", FeatureType::string()),
        xlink("type", FeatureType::string())
            .default("simple")
            .unsettable(),
    ]
}
