//! Factory for empty entities
//!
//! One `create_*` method per concrete type. Types are resolved once in
//! [`Factory::new`], so creating an instance cannot fail afterwards.

use crate::error::SchemaError;
use crate::model::document_root::DocumentRoot;
use crate::model::entity::Entity;
use crate::namespaces::QName;
use crate::schema::{EntityType, Registry};
use std::sync::Arc;

macro_rules! concrete_types {
    ($( $method:ident => $ns:ident : $type_name:literal ),+ $(,)?) => {
        #[derive(Debug, Clone)]
        struct ConcreteTypes {
            $( $method: Arc<EntityType>, )+
        }

        impl ConcreteTypes {
            fn resolve(registry: &Registry) -> Result<Self, SchemaError> {
                Ok(Self {
                    $( $method: registry.concrete_type(&QName::$ns($type_name))?, )+
                })
            }
        }

        impl Factory {
            $(
                #[doc = concat!("Create an empty `", stringify!($ns), ":", $type_name, "`")]
                pub fn $method(&self) -> Entity {
                    Entity::new(Arc::clone(&self.types.$method))
                }
            )+
        }
    };
}

concrete_types! {
    create_address_type => wcs: "AddressType",
    create_axis_description_type => wcs: "AxisDescriptionType",
    create_axis_description_type1 => wcs: "AxisDescriptionType1",
    create_axis_subset_type => wcs: "AxisSubsetType",
    create_contact_type => wcs: "ContactType",
    create_content_metadata_type => wcs: "ContentMetadataType",
    create_coverage_description_type => wcs: "CoverageDescriptionType",
    create_coverage_offering_brief_type => wcs: "CoverageOfferingBriefType",
    create_coverage_offering_type => wcs: "CoverageOfferingType",
    create_dcp_type_type => wcs: "DCPTypeType",
    create_describe_coverage_type => wcs: "DescribeCoverageType",
    create_describe_coverage_type1 => wcs: "DescribeCoverageType1",
    create_domain_set_type => wcs: "DomainSetType",
    create_domain_subset_type => wcs: "DomainSubsetType",
    create_exception_type => wcs: "ExceptionType",
    create_get_capabilities_type => wcs: "GetCapabilitiesType",
    create_get_capabilities_type1 => wcs: "GetCapabilitiesType1",
    create_get_coverage_type => wcs: "GetCoverageType",
    create_get_coverage_type1 => wcs: "GetCoverageType1",
    create_get_type => wcs: "GetType",
    create_http_type => wcs: "HTTPType",
    create_interval_type => wcs: "IntervalType",
    create_keywords_type => wcs: "KeywordsType",
    create_lon_lat_envelope_base_type => wcs: "LonLatEnvelopeBaseType",
    create_lon_lat_envelope_type => wcs: "LonLatEnvelopeType",
    create_metadata_association_type => wcs: "MetadataAssociationType",
    create_metadata_link_type => wcs: "MetadataLinkType",
    create_online_resource_type => wcs: "OnlineResourceType",
    create_output_type => wcs: "OutputType",
    create_post_type => wcs: "PostType",
    create_range_set_type => wcs: "RangeSetType",
    create_range_set_type1 => wcs: "RangeSetType1",
    create_range_subset_type => wcs: "RangeSubsetType",
    create_request_type => wcs: "RequestType",
    create_responsible_party_type => wcs: "ResponsiblePartyType",
    create_service_type => wcs: "ServiceType",
    create_spatial_domain_type => wcs: "SpatialDomainType",
    create_spatial_subset_type => wcs: "SpatialSubsetType",
    create_supported_crss_type => wcs: "SupportedCRSsType",
    create_supported_formats_type => wcs: "SupportedFormatsType",
    create_supported_interpolations_type => wcs: "SupportedInterpolationsType",
    create_telephone_type => wcs: "TelephoneType",
    create_time_period_type => wcs: "TimePeriodType",
    create_time_sequence_type => wcs: "TimeSequenceType",
    create_typed_literal_type => wcs: "TypedLiteralType",
    create_value_enum_base_type => wcs: "ValueEnumBaseType",
    create_value_enum_type => wcs: "ValueEnumType",
    create_value_range_type => wcs: "ValueRangeType",
    create_values_type => wcs: "ValuesType",
    create_vendor_specific_capabilities_type => wcs: "VendorSpecificCapabilitiesType",
    create_wcs_capabilities_type => wcs: "WCSCapabilitiesType",
    create_wcs_capability_type => wcs: "WCSCapabilityType",
    create_code_type => gml: "CodeType",
    create_code_list_type => gml: "CodeListType",
    create_direct_position_type => gml: "DirectPositionType",
    create_envelope_type => gml: "EnvelopeType",
    create_grid_type => gml: "GridType",
    create_rectified_grid_type => gml: "RectifiedGridType",
    create_time_position_type => gml: "TimePositionType",
}

/// Creates empty instances of the registry's concrete types
#[derive(Debug, Clone)]
pub struct Factory {
    registry: Arc<Registry>,
    types: ConcreteTypes,
}

impl Factory {
    /// Create a factory over a registry declaring every WCS 1.0 type
    pub fn new(registry: Arc<Registry>) -> Result<Self, SchemaError> {
        let types = ConcreteTypes::resolve(&registry)?;
        Ok(Self { registry, types })
    }

    /// Factory over the process-wide WCS 1.0 registry
    pub fn wcs10() -> Result<Self, SchemaError> {
        Self::new(Registry::wcs10()?)
    }

    /// The registry instances are typed against
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Create an instance of any concrete type by name
    ///
    /// Names resolve like [`Registry::type_of`].
    pub fn create(&self, type_name: &str) -> Result<Entity, SchemaError> {
        let ty = self.registry.require_type(type_name)?;
        if ty.is_abstract() {
            return Err(SchemaError::AbstractType(ty.name().to_string()));
        }
        Ok(Entity::new(Arc::clone(ty)))
    }

    /// Create an instance of a concrete type by qualified name
    pub fn create_qualified(&self, type_name: &QName) -> Result<Entity, SchemaError> {
        self.registry.concrete_type(type_name).map(Entity::new)
    }

    /// Create an empty document root
    pub fn create_document_root(&self) -> DocumentRoot {
        DocumentRoot::new()
    }
}
