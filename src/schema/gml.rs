//! The GML 3 subset referenced by WCS 1.0
//!
//! Only the types a WCS 1.0 document can contain are declared: description
//! and code values, envelopes, grids, polygons and time positions.

use crate::enums::TimeIndeterminateValue;
use crate::namespaces::{QName, GML_NAMESPACE};
use crate::schema::features::{Feature, FeatureType, PrimitiveKind};
use crate::schema::registry::RegistryBuilder;
use crate::schema::types::{ContentKind, TypeDecl};
use crate::schema::xlink;

fn gml_type(name: &str) -> TypeDecl {
    TypeDecl::new(QName::gml(name))
}

fn element(name: &str, type_name: &str) -> Feature {
    Feature::element(QName::gml(name), FeatureType::entity(QName::gml(type_name)))
}

fn primitive(kind: PrimitiveKind) -> FeatureType {
    FeatureType::Primitive(kind)
}

/// Add the GML declarations to a registry under construction
pub(crate) fn declare(builder: &mut RegistryBuilder) {
    builder
        .prefix("gml", GML_NAMESPACE)
        .add_type(
            gml_type("AbstractGMLType")
                .abstract_type()
                .feature(element("metaDataProperty", "MetaDataPropertyType").many())
                .feature(element("description", "StringOrRefType"))
                .feature(element("name", "CodeType").many())
                .feature(Feature::attribute("id", FeatureType::string()).qualified(GML_NAMESPACE)),
        )
        .add_type(
            gml_type("MetaDataPropertyType")
                .feature(Feature::wildcard("any"))
                .features(xlink::simple_link())
                .feature(Feature::attribute("about", FeatureType::any_uri()))
                .feature(
                    Feature::attribute("remoteSchema", FeatureType::any_uri())
                        .qualified(GML_NAMESPACE),
                ),
        )
        .add_type(
            gml_type("StringOrRefType")
                .content(ContentKind::Simple)
                .feature(Feature::simple_content("value", FeatureType::string()))
                .features(xlink::simple_link())
                .feature(
                    Feature::attribute("remoteSchema", FeatureType::any_uri())
                        .qualified(GML_NAMESPACE),
                ),
        )
        .add_type(
            gml_type("CodeType")
                .content(ContentKind::Simple)
                .feature(Feature::simple_content("value", FeatureType::string()))
                .feature(Feature::attribute("codeSpace", FeatureType::any_uri())),
        )
        .add_type(
            gml_type("CodeListType")
                .content(ContentKind::Simple)
                .feature(Feature::simple_content("value", primitive(PrimitiveKind::NameList)))
                .feature(Feature::attribute("codeSpace", FeatureType::any_uri())),
        )
        .add_type(
            gml_type("DirectPositionType")
                .content(ContentKind::Simple)
                .feature(Feature::simple_content("value", primitive(PrimitiveKind::DecimalList)))
                .feature(Feature::attribute("srsName", FeatureType::any_uri()))
                .feature(Feature::attribute("srsDimension", primitive(PrimitiveKind::Integer))),
        )
        .add_type(
            gml_type("AbstractGeometryType")
                .abstract_type()
                .extends(QName::gml("AbstractGMLType"))
                .feature(Feature::attribute("gid", FeatureType::string()))
                .feature(Feature::attribute("srsName", FeatureType::any_uri())),
        )
        .add_type(
            gml_type("EnvelopeType")
                .feature(element("pos", "DirectPositionType").occurs(2, Some(2)))
                .feature(Feature::attribute("srsName", FeatureType::any_uri())),
        )
        .add_type(
            gml_type("PointType")
                .extends(QName::gml("AbstractGeometryType"))
                .feature(element("pos", "DirectPositionType").required()),
        )
        .add_type(
            gml_type("VectorType")
                .content(ContentKind::Simple)
                .feature(Feature::simple_content("value", primitive(PrimitiveKind::DecimalList)))
                .feature(Feature::attribute("srsName", FeatureType::any_uri())),
        )
        .add_type(
            gml_type("GridEnvelopeType")
                .feature(
                    Feature::element(QName::gml("low"), primitive(PrimitiveKind::IntegerList))
                        .required(),
                )
                .feature(
                    Feature::element(QName::gml("high"), primitive(PrimitiveKind::IntegerList))
                        .required(),
                ),
        )
        .add_type(
            gml_type("GridLimitsType")
                .feature(element("GridEnvelope", "GridEnvelopeType").required()),
        )
        .add_type(
            gml_type("GridType")
                .extends(QName::gml("AbstractGeometryType"))
                .feature(element("limits", "GridLimitsType").required())
                .feature(
                    Feature::element(QName::gml("axisName"), FeatureType::string())
                        .required()
                        .many(),
                )
                .feature(
                    Feature::attribute("dimension", primitive(PrimitiveKind::Integer)).required(),
                ),
        )
        .add_type(
            gml_type("RectifiedGridType")
                .extends(QName::gml("GridType"))
                .feature(element("origin", "PointType").required())
                .feature(element("offsetVector", "VectorType").required().many()),
        )
        .add_type(
            gml_type("LinearRingType")
                .extends(QName::gml("AbstractGeometryType"))
                .feature(element("pos", "DirectPositionType").occurs(4, None)),
        )
        .add_type(
            gml_type("AbstractRingPropertyType")
                .feature(element("LinearRing", "LinearRingType").required()),
        )
        .add_type(
            gml_type("PolygonType")
                .extends(QName::gml("AbstractGeometryType"))
                .feature(element("exterior", "AbstractRingPropertyType"))
                .feature(element("interior", "AbstractRingPropertyType").many()),
        )
        .add_type(
            gml_type("TimePositionType")
                .content(ContentKind::Simple)
                .feature(Feature::simple_content("value", primitive(PrimitiveKind::TimePosition)))
                .feature(Feature::attribute("calendarEraName", FeatureType::string()))
                .feature(
                    Feature::attribute("frame", FeatureType::any_uri())
                        .default("#ISO-8601")
                        .unsettable(),
                )
                .feature(
                    Feature::attribute(
                        "indeterminatePosition",
                        FeatureType::enumeration::<TimeIndeterminateValue>(),
                    )
                    .default("after")
                    .unsettable(),
                ),
        );
}
