//! Typed enumerations of the WCS 1.0 schema and the GML/XLink types it uses
//!
//! Each enum shares its literal table with the untyped
//! [`EnumerationType`](crate::schema::EnumerationType) registered for it, so
//! `InterpolationMethod::by_literal("bilinear")` and a value read from a
//! document compare equal after [`EnumValue::to_typed`](crate::schema::EnumValue::to_typed).

use crate::namespaces::{GML_NAMESPACE, WCS_NAMESPACE, XLINK_NAMESPACE};
use crate::schema_enum;

schema_enum! {
    /// Interpolation method applied when a coverage is resampled
    pub enum InterpolationMethod in WCS_NAMESPACE, "InterpolationMethodType" {
        /// `nearest neighbor`
        NearestNeighbor = 0, "nearestNeighbor" => "nearest neighbor",
        /// `bilinear`
        Bilinear = 1, "bilinear" => "bilinear",
        /// `bicubic`
        Bicubic = 2, "bicubic" => "bicubic",
        /// `lost area`
        LostArea = 3, "lostArea" => "lost area",
        /// `barycentric`
        Barycentric = 4, "barycentric" => "barycentric",
        /// `none`
        None = 5, "none" => "none",
    }
}

schema_enum! {
    /// Which ends of a value range are included
    pub enum Closure in WCS_NAMESPACE, "ClosureType" {
        /// Both ends included
        Closed = 0, "closed" => "closed",
        /// Neither end included
        Open = 1, "open" => "open",
        /// Only the upper end included
        OpenClosed = 2, "openClosed" => "open-closed",
        /// Only the lower end included
        ClosedOpen = 3, "closedOpen" => "closed-open",
    }
}

schema_enum! {
    /// Section of a capabilities document requested by GetCapabilities
    pub enum CapabilitiesSection in WCS_NAMESPACE, "CapabilitiesSectionType" {
        /// The whole document
        All = 0, "_" => "/",
        /// The Service section
        Service = 1, "WCSCapabilitiesService" => "/WCS_Capabilities/Service",
        /// The Capability section
        Capability = 2, "WCSCapabilitiesCapability" => "/WCS_Capabilities/Capability",
        /// The ContentMetadata section
        ContentMetadata = 3, "WCSCapabilitiesContentMetadata" => "/WCS_Capabilities/ContentMetadata",
    }
}

schema_enum! {
    /// Standard a linked metadata document follows
    pub enum MetadataType in WCS_NAMESPACE, "MetadataTypeType" {
        /// ISO TC211 19115
        Tc211 = 0, "TC211" => "TC211",
        /// FGDC CSDGM
        Fgdc = 1, "FGDC" => "FGDC",
        /// Anything else
        Other = 2, "other" => "other",
    }
}

schema_enum! {
    /// `xlink:actuate`
    pub enum Actuate in XLINK_NAMESPACE, "ActuateType" {
        /// `onLoad`
        OnLoad = 0, "onLoad" => "onLoad",
        /// `onRequest`
        OnRequest = 1, "onRequest" => "onRequest",
        /// `other`
        Other = 2, "other" => "other",
        /// `none`
        None = 3, "none" => "none",
    }
}

schema_enum! {
    /// `xlink:show`
    pub enum Show in XLINK_NAMESPACE, "ShowType" {
        /// `new`
        New = 0, "new" => "new",
        /// `replace`
        Replace = 1, "replace" => "replace",
        /// `embed`
        Embed = 2, "embed" => "embed",
        /// `other`
        Other = 3, "other" => "other",
        /// `none`
        None = 4, "none" => "none",
    }
}

schema_enum! {
    /// `gml:TimeIndeterminateValueType`
    pub enum TimeIndeterminateValue in GML_NAMESPACE, "TimeIndeterminateValueType" {
        /// `after`
        After = 0, "after" => "after",
        /// `before`
        Before = 1, "before" => "before",
        /// `now`
        Now = 2, "now" => "now",
        /// `unknown`
        Unknown = 3, "unknown" => "unknown",
    }
}
