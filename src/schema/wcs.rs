//! The WCS 1.0 type tables
//!
//! Declarations follow the published schema: features are listed in content
//! model order, attributes after elements, so the writer's declaration-order
//! traversal produces schema-valid element sequences.

use crate::enums::{CapabilitiesSection, Closure, InterpolationMethod, MetadataType};
use crate::enums::{Actuate, Show, TimeIndeterminateValue};
use crate::error::SchemaError;
use crate::model::WcsElement;
use crate::namespaces::{QName, GML_NAMESPACE, WCS_NAMESPACE, XLINK_NAMESPACE, XSI_NAMESPACE};
use crate::schema::enums::SchemaEnum;
use crate::schema::features::{Feature, FeatureType, PrimitiveKind};
use crate::schema::registry::{Registry, RegistryBuilder};
use crate::schema::types::{ContentKind, TypeDecl};
use crate::schema::{gml, xlink};

fn wcs_type(name: &str) -> TypeDecl {
    TypeDecl::new(QName::wcs(name))
}

/// Child element `wcs:{name}` holding a `wcs:{type_name}`
fn element(name: &str, type_name: &str) -> Feature {
    Feature::element(QName::wcs(name), FeatureType::entity(QName::wcs(type_name)))
}

/// Child element `wcs:{name}` holding a `gml:{type_name}`
fn gml_valued(name: &str, type_name: &str) -> Feature {
    Feature::element(QName::wcs(name), FeatureType::entity(QName::gml(type_name)))
}

/// Child element `gml:{name}` holding a `gml:{type_name}`
fn gml_element(name: &str, type_name: &str) -> Feature {
    Feature::element(QName::gml(name), FeatureType::entity(QName::gml(type_name)))
}

fn text(name: &str) -> Feature {
    Feature::element(QName::wcs(name), FeatureType::string())
}

fn attribute(name: &str) -> Feature {
    Feature::attribute(name, FeatureType::string())
}

fn uri_attribute(name: &str) -> Feature {
    Feature::attribute(name, FeatureType::any_uri())
}

/// Attributes the schema declares globally and references as `wcs:*`
fn wcs_attribute(name: &str, ty: FeatureType) -> Feature {
    Feature::attribute(name, ty).qualified(WCS_NAMESPACE)
}

fn version() -> Feature {
    attribute("version").default("1.0.0").unsettable()
}

fn service() -> Feature {
    attribute("service").default("WCS").unsettable().required()
}

fn update_sequence() -> Feature {
    attribute("updateSequence")
}

/// Build the WCS 1.0 registry
pub(crate) fn build() -> Result<Registry, SchemaError> {
    let mut builder = Registry::builder();
    builder
        .target_namespace(WCS_NAMESPACE)
        .prefix("wcs", WCS_NAMESPACE)
        .prefix("xlink", XLINK_NAMESPACE)
        .prefix("xsi", XSI_NAMESPACE);
    gml::declare(&mut builder);
    declare_descriptions(&mut builder);
    declare_capabilities(&mut builder);
    declare_coverages(&mut builder);
    declare_values(&mut builder);
    declare_requests(&mut builder);

    builder
        .add_enum(InterpolationMethod::ENUMERATION)
        .add_enum(Closure::ENUMERATION)
        .add_enum(CapabilitiesSection::ENUMERATION)
        .add_enum(MetadataType::ENUMERATION)
        .add_enum(Actuate::ENUMERATION)
        .add_enum(Show::ENUMERATION)
        .add_enum(TimeIndeterminateValue::ENUMERATION);
    for element in WcsElement::ALL {
        builder.add_global(element.declaration());
    }
    builder.build()
}

fn declare_descriptions(builder: &mut RegistryBuilder) {
    builder
        // restriction of gml:AbstractGMLType that drops the GML name and description
        .add_type(
            wcs_type("AbstractDescriptionBaseType")
                .abstract_type()
                .feature(Feature::attribute("id", FeatureType::string()).qualified(GML_NAMESPACE)),
        )
        .add_type(
            wcs_type("AbstractDescriptionType")
                .abstract_type()
                .extends(QName::wcs("AbstractDescriptionBaseType"))
                .feature(element("metadataLink", "MetadataLinkType").many())
                .feature(text("description"))
                .feature(text("name").required())
                .feature(text("label").required()),
        )
        .add_type(
            wcs_type("MetadataAssociationType").extends(QName::gml("MetaDataPropertyType")),
        )
        .add_type(
            wcs_type("MetadataLinkType")
                .extends(QName::wcs("MetadataAssociationType"))
                .feature(
                    Feature::attribute("metadataType", FeatureType::enumeration::<MetadataType>())
                        .default("TC211")
                        .unsettable()
                        .required(),
                ),
        )
        .add_type(
            wcs_type("KeywordsType")
                .feature(text("keyword").required().many())
                .feature(gml_valued("type", "CodeType")),
        )
        .add_type(
            wcs_type("LonLatEnvelopeBaseType").extends(QName::gml("EnvelopeType")),
        )
        .add_type(
            wcs_type("LonLatEnvelopeType")
                .extends(QName::wcs("LonLatEnvelopeBaseType"))
                .feature(gml_element("timePosition", "TimePositionType").occurs(0, Some(2))),
        )
        .add_type(
            wcs_type("OnlineResourceType")
                .content(ContentKind::Empty)
                .features(xlink::simple_link()),
        )
        .add_type(
            wcs_type("TelephoneType")
                .feature(text("voice").many())
                .feature(text("facsimile").many()),
        )
        .add_type(
            wcs_type("AddressType")
                .feature(text("deliveryPoint").many())
                .feature(text("city"))
                .feature(text("administrativeArea"))
                .feature(text("postalCode"))
                .feature(text("country"))
                .feature(text("electronicMailAddress").many()),
        )
        .add_type(
            wcs_type("ContactType")
                .feature(element("phone", "TelephoneType"))
                .feature(element("address", "AddressType"))
                .feature(element("onlineResource", "OnlineResourceType")),
        )
        .add_type(
            wcs_type("ResponsiblePartyType")
                .feature(text("individualName"))
                .feature(text("organisationName"))
                .feature(text("positionName"))
                .feature(element("contactInfo", "ContactType")),
        );
}

fn declare_capabilities(builder: &mut RegistryBuilder) {
    builder
        .add_type(
            wcs_type("WCSCapabilitiesType")
                .feature(element("Service", "ServiceType").required())
                .feature(element("Capability", "WCSCapabilityType").required())
                .feature(element("ContentMetadata", "ContentMetadataType").required())
                .feature(update_sequence())
                .feature(version().required()),
        )
        .add_type(
            wcs_type("ServiceType")
                .extends(QName::wcs("AbstractDescriptionType"))
                .feature(element("keywords", "KeywordsType").many())
                .feature(element("responsibleParty", "ResponsiblePartyType"))
                .feature(gml_valued("fees", "CodeListType").required())
                .feature(gml_valued("accessConstraints", "CodeListType").required().many())
                .feature(update_sequence())
                .feature(version()),
        )
        .add_type(
            wcs_type("WCSCapabilityType")
                .feature(element("Request", "RequestType").required())
                .feature(element("Exception", "ExceptionType").required())
                .feature(element(
                    "VendorSpecificCapabilities",
                    "VendorSpecificCapabilitiesType",
                ))
                .feature(update_sequence())
                .feature(version()),
        )
        .add_type(
            wcs_type("RequestType")
                .feature(element("GetCapabilities", "GetCapabilitiesType1").required())
                .feature(element("DescribeCoverage", "DescribeCoverageType1").required())
                .feature(element("GetCoverage", "GetCoverageType1").required()),
        )
        .add_type(
            wcs_type("GetCapabilitiesType1").feature(element("DCPType", "DCPTypeType").required().many()),
        )
        .add_type(
            wcs_type("DescribeCoverageType1").feature(element("DCPType", "DCPTypeType").required().many()),
        )
        .add_type(
            wcs_type("GetCoverageType1").feature(element("DCPType", "DCPTypeType").required().many()),
        )
        .add_type(wcs_type("DCPTypeType").feature(element("HTTP", "HTTPType").required()))
        .add_type(
            wcs_type("HTTPType")
                .feature(Feature::group("group"))
                .feature(element("Get", "GetType").in_group("group"))
                .feature(element("Post", "PostType").in_group("group")),
        )
        .add_type(
            wcs_type("GetType").feature(element("OnlineResource", "OnlineResourceType").required()),
        )
        .add_type(
            wcs_type("PostType").feature(element("OnlineResource", "OnlineResourceType").required()),
        )
        .add_type(wcs_type("ExceptionType").feature(text("Format").required().many()))
        .add_type(
            wcs_type("VendorSpecificCapabilitiesType")
                .feature(Feature::wildcard("any").required()),
        )
        .add_type(
            wcs_type("ContentMetadataType")
                .feature(element("CoverageOfferingBrief", "CoverageOfferingBriefType").many())
                .features(xlink::simple_link())
                .feature(uri_attribute("remoteSchema").qualified(GML_NAMESPACE))
                .feature(update_sequence())
                .feature(version()),
        );
}

fn declare_coverages(builder: &mut RegistryBuilder) {
    builder
        .add_type(
            wcs_type("CoverageDescriptionType")
                .feature(element("CoverageOffering", "CoverageOfferingType").required().many())
                .feature(update_sequence())
                .feature(version().required()),
        )
        .add_type(
            wcs_type("CoverageOfferingBriefType")
                .extends(QName::wcs("AbstractDescriptionType"))
                .feature(element("lonLatEnvelope", "LonLatEnvelopeType").required())
                .feature(element("keywords", "KeywordsType").many()),
        )
        .add_type(
            wcs_type("CoverageOfferingType")
                .extends(QName::wcs("CoverageOfferingBriefType"))
                .feature(element("domainSet", "DomainSetType").required())
                .feature(element("rangeSet", "RangeSetType1").required())
                .feature(element("supportedCRSs", "SupportedCRSsType").required())
                .feature(element("supportedFormats", "SupportedFormatsType").required())
                .feature(element("supportedInterpolations", "SupportedInterpolationsType")),
        )
        .add_type(
            wcs_type("DomainSetType")
                .feature(element("spatialDomain", "SpatialDomainType"))
                .feature(element("temporalDomain", "TimeSequenceType")),
        )
        .add_type(
            wcs_type("SpatialDomainType")
                .feature(gml_element("Envelope", "EnvelopeType").many())
                .feature(Feature::group("gridGroup"))
                .feature(gml_element("Grid", "GridType").in_group("gridGroup"))
                .feature(gml_element("RectifiedGrid", "RectifiedGridType").in_group("gridGroup"))
                .feature(gml_element("Polygon", "PolygonType").many()),
        )
        .add_type(
            wcs_type("SpatialSubsetType").extends(QName::wcs("SpatialDomainType")),
        )
        .add_type(
            wcs_type("TimeSequenceType")
                .feature(Feature::group("group"))
                .feature(gml_element("timePosition", "TimePositionType").in_group("group"))
                .feature(element("timePeriod", "TimePeriodType").in_group("group")),
        )
        .add_type(
            wcs_type("TimePeriodType")
                .feature(gml_valued("beginPosition", "TimePositionType").required())
                .feature(gml_valued("endPosition", "TimePositionType").required())
                .feature(Feature::element(
                    QName::wcs("timeResolution"),
                    FeatureType::Primitive(PrimitiveKind::Duration),
                ))
                .feature(uri_attribute("frame").default("#ISO-8601").unsettable()),
        )
        .add_type(
            wcs_type("RangeSetType1").feature(element("RangeSet", "RangeSetType").required()),
        )
        .add_type(
            wcs_type("RangeSetType")
                .extends(QName::wcs("AbstractDescriptionType"))
                .feature(element("axisDescription", "AxisDescriptionType1").many())
                .feature(element("nullValues", "ValueEnumType"))
                .feature(uri_attribute("refSys"))
                .feature(attribute("refSysLabel"))
                .feature(wcs_attribute("semantic", FeatureType::any_uri())),
        )
        .add_type(
            wcs_type("AxisDescriptionType1")
                .feature(element("AxisDescription", "AxisDescriptionType").required()),
        )
        .add_type(
            wcs_type("AxisDescriptionType")
                .extends(QName::wcs("AbstractDescriptionType"))
                .feature(element("values", "ValuesType").required())
                .feature(uri_attribute("refSys"))
                .feature(attribute("refSysLabel"))
                .feature(wcs_attribute("semantic", FeatureType::any_uri())),
        )
        .add_type(
            wcs_type("SupportedCRSsType")
                .feature(gml_valued("requestResponseCRSs", "CodeListType").many())
                .feature(gml_valued("requestCRSs", "CodeListType").many())
                .feature(gml_valued("responseCRSs", "CodeListType").many())
                .feature(gml_valued("nativeCRSs", "CodeListType").many()),
        )
        .add_type(
            wcs_type("SupportedFormatsType")
                .feature(gml_valued("formats", "CodeListType").required().many())
                .feature(attribute("nativeFormat")),
        )
        .add_type(
            wcs_type("SupportedInterpolationsType")
                .feature(
                    Feature::element(
                        QName::wcs("interpolationMethod"),
                        FeatureType::enumeration::<InterpolationMethod>(),
                    )
                    .required()
                    .many(),
                )
                .feature(
                    Feature::attribute("default", FeatureType::enumeration::<InterpolationMethod>())
                        .default("nearest neighbor")
                        .unsettable(),
                ),
        );
}

fn declare_values(builder: &mut RegistryBuilder) {
    builder
        .add_type(
            wcs_type("TypedLiteralType")
                .content(ContentKind::Simple)
                .feature(Feature::simple_content("value", FeatureType::string()))
                .feature(wcs_attribute("type", FeatureType::any_uri())),
        )
        .add_type(
            wcs_type("ValueRangeType")
                .feature(element("min", "TypedLiteralType"))
                .feature(element("max", "TypedLiteralType"))
                .feature(
                    Feature::attribute("atomic", FeatureType::boolean())
                        .default("false")
                        .unsettable(),
                )
                .feature(
                    wcs_attribute("closure", FeatureType::enumeration::<Closure>())
                        .default("closed")
                        .unsettable(),
                )
                .feature(wcs_attribute("semantic", FeatureType::any_uri()))
                .feature(wcs_attribute("type", FeatureType::any_uri())),
        )
        .add_type(
            wcs_type("IntervalType")
                .extends(QName::wcs("ValueRangeType"))
                .feature(element("res", "TypedLiteralType")),
        )
        .add_type(
            wcs_type("ValueEnumBaseType")
                .feature(Feature::group("group"))
                .feature(element("interval", "IntervalType").in_group("group"))
                .feature(element("singleValue", "TypedLiteralType").in_group("group")),
        )
        .add_type(
            wcs_type("ValueEnumType")
                .extends(QName::wcs("ValueEnumBaseType"))
                .feature(wcs_attribute("semantic", FeatureType::any_uri()))
                .feature(wcs_attribute("type", FeatureType::any_uri())),
        )
        .add_type(
            wcs_type("ValuesType")
                .extends(QName::wcs("ValueEnumType"))
                .feature(element("default", "TypedLiteralType")),
        );
}

fn declare_requests(builder: &mut RegistryBuilder) {
    builder
        .add_type(
            wcs_type("GetCapabilitiesType")
                .extensible()
                .feature(
                    Feature::element(
                        QName::wcs("section"),
                        FeatureType::enumeration::<CapabilitiesSection>(),
                    )
                    .default("/")
                    .unsettable(),
                )
                .feature(service())
                .feature(update_sequence())
                .feature(version()),
        )
        .add_type(
            wcs_type("DescribeCoverageType")
                .extensible()
                .feature(text("Coverage").many())
                .feature(service())
                .feature(version().required()),
        )
        .add_type(
            wcs_type("GetCoverageType")
                .extensible()
                .feature(text("sourceCoverage").required())
                .feature(element("domainSubset", "DomainSubsetType").required())
                .feature(element("rangeSubset", "RangeSubsetType"))
                .feature(
                    Feature::element(
                        QName::wcs("interpolationMethod"),
                        FeatureType::enumeration::<InterpolationMethod>(),
                    )
                    .default("nearest neighbor")
                    .unsettable(),
                )
                .feature(element("output", "OutputType").required())
                .feature(service())
                .feature(version().required()),
        )
        .add_type(
            wcs_type("DomainSubsetType")
                .feature(element("spatialSubset", "SpatialSubsetType"))
                .feature(element("temporalSubset", "TimeSequenceType")),
        )
        .add_type(
            wcs_type("RangeSubsetType")
                .feature(element("axisSubset", "AxisSubsetType").required().many()),
        )
        .add_type(
            wcs_type("AxisSubsetType")
                .extends(QName::wcs("ValueEnumBaseType"))
                .feature(attribute("name").required()),
        )
        .add_type(
            wcs_type("OutputType")
                .feature(gml_valued("crs", "CodeType"))
                .feature(gml_valued("format", "CodeType").required()),
        );
}
