//! Typed names for the WCS 1.0 global elements
//!
//! Every global element can be the root of a document. [`WcsElement`] names
//! them without string lookups and knows each element's declared type and
//! substitution group.

use crate::enums::InterpolationMethod;
use crate::namespaces::QName;
use crate::schema::{FeatureType, GlobalElement};
use std::fmt;

/// A WCS 1.0 global element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WcsElement {
    /// `wcs:axisDescription` (property wrapper)
    AxisDescriptionProperty,
    /// `wcs:AxisDescription`
    AxisDescription,
    /// `wcs:Capability`
    Capability,
    /// `wcs:ContentMetadata`
    ContentMetadata,
    /// `wcs:CoverageDescription`
    CoverageDescription,
    /// `wcs:CoverageOffering`
    CoverageOffering,
    /// `wcs:CoverageOfferingBrief`
    CoverageOfferingBrief,
    /// `wcs:DescribeCoverage`
    DescribeCoverage,
    /// `wcs:description`
    Description,
    /// `wcs:domainSet`
    DomainSet,
    /// `wcs:formats`
    Formats,
    /// `wcs:GetCapabilities`
    GetCapabilities,
    /// `wcs:GetCoverage`
    GetCoverage,
    /// `wcs:interpolationMethod`
    InterpolationMethod,
    /// `wcs:interval`
    Interval,
    /// `wcs:keywords`
    Keywords,
    /// `wcs:lonLatEnvelope`
    LonLatEnvelope,
    /// `wcs:metadataLink`
    MetadataLink,
    /// `wcs:name`
    Name,
    /// `wcs:rangeSet` (property wrapper)
    RangeSetProperty,
    /// `wcs:RangeSet`
    RangeSet,
    /// `wcs:Service`
    Service,
    /// `wcs:singleValue`
    SingleValue,
    /// `wcs:spatialDomain`
    SpatialDomain,
    /// `wcs:spatialSubset`
    SpatialSubset,
    /// `wcs:supportedCRSs`
    SupportedCrss,
    /// `wcs:supportedFormats`
    SupportedFormats,
    /// `wcs:supportedInterpolations`
    SupportedInterpolations,
    /// `wcs:temporalDomain`
    TemporalDomain,
    /// `wcs:temporalSubset`
    TemporalSubset,
    /// `wcs:timePeriod`
    TimePeriod,
    /// `wcs:TimeSequence`
    TimeSequence,
    /// `wcs:WCS_Capabilities`
    WcsCapabilities,
}

impl WcsElement {
    /// Every global element, in schema order
    pub const ALL: [WcsElement; 33] = [
        WcsElement::AxisDescriptionProperty,
        WcsElement::AxisDescription,
        WcsElement::Capability,
        WcsElement::ContentMetadata,
        WcsElement::CoverageDescription,
        WcsElement::CoverageOffering,
        WcsElement::CoverageOfferingBrief,
        WcsElement::DescribeCoverage,
        WcsElement::Description,
        WcsElement::DomainSet,
        WcsElement::Formats,
        WcsElement::GetCapabilities,
        WcsElement::GetCoverage,
        WcsElement::InterpolationMethod,
        WcsElement::Interval,
        WcsElement::Keywords,
        WcsElement::LonLatEnvelope,
        WcsElement::MetadataLink,
        WcsElement::Name,
        WcsElement::RangeSetProperty,
        WcsElement::RangeSet,
        WcsElement::Service,
        WcsElement::SingleValue,
        WcsElement::SpatialDomain,
        WcsElement::SpatialSubset,
        WcsElement::SupportedCrss,
        WcsElement::SupportedFormats,
        WcsElement::SupportedInterpolations,
        WcsElement::TemporalDomain,
        WcsElement::TemporalSubset,
        WcsElement::TimePeriod,
        WcsElement::TimeSequence,
        WcsElement::WcsCapabilities,
    ];

    /// Local element name
    pub fn local_name(self) -> &'static str {
        match self {
            WcsElement::AxisDescriptionProperty => "axisDescription",
            WcsElement::AxisDescription => "AxisDescription",
            WcsElement::Capability => "Capability",
            WcsElement::ContentMetadata => "ContentMetadata",
            WcsElement::CoverageDescription => "CoverageDescription",
            WcsElement::CoverageOffering => "CoverageOffering",
            WcsElement::CoverageOfferingBrief => "CoverageOfferingBrief",
            WcsElement::DescribeCoverage => "DescribeCoverage",
            WcsElement::Description => "description",
            WcsElement::DomainSet => "domainSet",
            WcsElement::Formats => "formats",
            WcsElement::GetCapabilities => "GetCapabilities",
            WcsElement::GetCoverage => "GetCoverage",
            WcsElement::InterpolationMethod => "interpolationMethod",
            WcsElement::Interval => "interval",
            WcsElement::Keywords => "keywords",
            WcsElement::LonLatEnvelope => "lonLatEnvelope",
            WcsElement::MetadataLink => "metadataLink",
            WcsElement::Name => "name",
            WcsElement::RangeSetProperty => "rangeSet",
            WcsElement::RangeSet => "RangeSet",
            WcsElement::Service => "Service",
            WcsElement::SingleValue => "singleValue",
            WcsElement::SpatialDomain => "spatialDomain",
            WcsElement::SpatialSubset => "spatialSubset",
            WcsElement::SupportedCrss => "supportedCRSs",
            WcsElement::SupportedFormats => "supportedFormats",
            WcsElement::SupportedInterpolations => "supportedInterpolations",
            WcsElement::TemporalDomain => "temporalDomain",
            WcsElement::TemporalSubset => "temporalSubset",
            WcsElement::TimePeriod => "timePeriod",
            WcsElement::TimeSequence => "TimeSequence",
            WcsElement::WcsCapabilities => "WCS_Capabilities",
        }
    }

    /// Qualified element name
    pub fn qname(self) -> QName {
        QName::wcs(self.local_name())
    }

    /// Find the element with this qualified name
    pub fn from_qname(name: &QName) -> Option<WcsElement> {
        if !name.is_in(crate::namespaces::WCS_NAMESPACE) {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.local_name() == name.local_name)
    }

    /// Declared type of the element's content
    pub fn value_type(self) -> FeatureType {
        let entity = |name: &str| FeatureType::entity(QName::wcs(name));
        match self {
            WcsElement::AxisDescriptionProperty => entity("AxisDescriptionType1"),
            WcsElement::AxisDescription => entity("AxisDescriptionType"),
            WcsElement::Capability => entity("WCSCapabilityType"),
            WcsElement::ContentMetadata => entity("ContentMetadataType"),
            WcsElement::CoverageDescription => entity("CoverageDescriptionType"),
            WcsElement::CoverageOffering => entity("CoverageOfferingType"),
            WcsElement::CoverageOfferingBrief => entity("CoverageOfferingBriefType"),
            WcsElement::DescribeCoverage => entity("DescribeCoverageType"),
            WcsElement::Description | WcsElement::Name => FeatureType::string(),
            WcsElement::DomainSet => entity("DomainSetType"),
            WcsElement::Formats => FeatureType::entity(QName::gml("CodeListType")),
            WcsElement::GetCapabilities => entity("GetCapabilitiesType"),
            WcsElement::GetCoverage => entity("GetCoverageType"),
            WcsElement::InterpolationMethod => FeatureType::enumeration::<InterpolationMethod>(),
            WcsElement::Interval => entity("IntervalType"),
            WcsElement::Keywords => entity("KeywordsType"),
            WcsElement::LonLatEnvelope => entity("LonLatEnvelopeType"),
            WcsElement::MetadataLink => entity("MetadataLinkType"),
            WcsElement::RangeSetProperty => entity("RangeSetType1"),
            WcsElement::RangeSet => entity("RangeSetType"),
            WcsElement::Service => entity("ServiceType"),
            WcsElement::SingleValue => entity("TypedLiteralType"),
            WcsElement::SpatialDomain => entity("SpatialDomainType"),
            WcsElement::SpatialSubset => entity("SpatialSubsetType"),
            WcsElement::SupportedCrss => entity("SupportedCRSsType"),
            WcsElement::SupportedFormats => entity("SupportedFormatsType"),
            WcsElement::SupportedInterpolations => entity("SupportedInterpolationsType"),
            WcsElement::TemporalDomain
            | WcsElement::TemporalSubset
            | WcsElement::TimeSequence => entity("TimeSequenceType"),
            WcsElement::TimePeriod => entity("TimePeriodType"),
            WcsElement::WcsCapabilities => entity("WCSCapabilitiesType"),
        }
    }

    /// Head of the substitution group the element belongs to
    pub fn substitution_group(self) -> Option<QName> {
        match self {
            WcsElement::AxisDescription
            | WcsElement::CoverageOffering
            | WcsElement::CoverageOfferingBrief
            | WcsElement::RangeSet
            | WcsElement::Service => Some(QName::gml("_GML")),
            WcsElement::MetadataLink => Some(QName::gml("metaDataProperty")),
            _ => None,
        }
    }

    pub(crate) fn declaration(self) -> GlobalElement {
        let element = GlobalElement::new(self.qname(), self.value_type());
        match self.substitution_group() {
            Some(head) => element.affiliation(head),
            None => element,
        }
    }
}

impl fmt::Display for WcsElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wcs:{}", self.local_name())
    }
}
