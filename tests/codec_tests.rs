//! Integration tests for reading and writing WCS 1.0 documents

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use wcs10::codec::{Codec, CodecConfig, ReadMode};
use wcs10::documents::{AnyElement, MixedContent};
use wcs10::enums::{CapabilitiesSection, Closure, InterpolationMethod};
use wcs10::limits::Limits;
use wcs10::model::{DocumentRoot, Entity, Factory, RootState, Value, WcsElement};
use wcs10::schema::SchemaEnum;
use wcs10::{Error, QName, SchemaError};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn codec() -> Codec {
    Codec::wcs10().unwrap()
}

fn lax() -> Codec {
    let mut codec = codec();
    codec.set_config(CodecConfig::new().with_mode(ReadMode::Lax));
    codec
}

/// A GetCoverage request with every required feature populated
fn get_coverage(factory: &Factory) -> Entity {
    let mut request = factory.create_get_coverage_type();
    request.set("sourceCoverage", "dem_30m").unwrap();

    let mut envelope = factory.create_envelope_type();
    for corner in ["-120.5 35.0", "-119.5 36.0"] {
        let mut pos = factory.create_direct_position_type();
        let values: Vec<Decimal> = corner
            .split_whitespace()
            .map(|v| Decimal::from_str(v).unwrap())
            .collect();
        pos.set("value", Value::DecimalList(values)).unwrap();
        envelope.push("pos", pos).unwrap();
    }
    envelope.set("srsName", "EPSG:4326").unwrap();

    let mut subset = factory.create_spatial_subset_type();
    subset.push("Envelope", envelope).unwrap();
    let mut domain = factory.create_domain_subset_type();
    domain.set("spatialSubset", subset).unwrap();
    request.set("domainSubset", domain).unwrap();

    let mut format = factory.create_code_type();
    format.set("value", "GeoTIFF").unwrap();
    let mut output = factory.create_output_type();
    output.set("format", format).unwrap();
    request.set("output", output).unwrap();
    request
}

// ============================================================================
// Default preservation
// ============================================================================

#[test]
fn test_get_capabilities_scenario() {
    let parsed = codec()
        .read_str(r#"<wcs:GetCapabilities service="WCS" version="1.0.0"/>"#)
        .unwrap();
    assert!(parsed.is_clean());

    let request = parsed.document.get(WcsElement::GetCapabilities).unwrap();
    assert!(!request.is_set("section"));
    assert_eq!(
        request.get_enum::<CapabilitiesSection>("section"),
        Some(CapabilitiesSection::All)
    );
    assert!(request.is_set("service"));
    assert_eq!(request.get_str("service"), Some("WCS"));
    assert!(request.is_set("version"));
    assert_eq!(request.get_str("version"), Some("1.0.0"));
    assert_eq!(request.base_url(), None);
    assert!(request.extended_properties().unwrap().is_empty());
}

#[test]
fn test_version_present_versus_absent() {
    let with_version = codec()
        .read_str(
            r#"<wcs:GetCapabilities xmlns:wcs="http://www.opengis.net/wcs" version="1.0.0"/>"#,
        )
        .unwrap();
    let request = with_version.document.root_entity().unwrap();
    assert!(request.is_set("version"));

    let without_version = codec()
        .read_str(r#"<wcs:GetCapabilities xmlns:wcs="http://www.opengis.net/wcs"/>"#)
        .unwrap();
    let request = without_version.document.root_entity().unwrap();
    assert!(!request.is_set("version"));
    assert_eq!(request.get_str("version"), Some("1.0.0"));
}

#[test]
fn test_get_coverage_fixture() {
    let parsed = codec().read_file(fixture("get_coverage.xml")).unwrap();
    assert!(parsed.is_clean(), "{:?}", parsed.diagnostics);

    let document = &parsed.document;
    assert_eq!(document.state(), RootState::Occupied(&QName::wcs("GetCoverage")));
    assert_eq!(
        document.schema_location().get("http://www.opengis.net/wcs").map(String::as_str),
        Some("http://schemas.opengis.net/wcs/1.0.0/getCoverage.xsd")
    );
    assert_eq!(document.mixed().len(), 1);

    let request = document.get(WcsElement::GetCoverage).unwrap();
    assert_eq!(request.get_str("sourceCoverage"), Some("dem_30m"));
    assert_eq!(
        request.get_enum::<InterpolationMethod>("interpolationMethod"),
        Some(InterpolationMethod::Bilinear)
    );

    let subset = request
        .child("domainSubset")
        .and_then(|d| d.child("spatialSubset"))
        .unwrap();
    let envelope = subset.children("Envelope")[0];
    let corners: Vec<&Value> = envelope
        .children("pos")
        .iter()
        .filter_map(|p| p.get("value"))
        .collect();
    assert_eq!(
        corners[0],
        &Value::DecimalList(vec![Decimal::new(-1205, 1), Decimal::new(350, 1)])
    );

    let grid = subset.group("gridGroup").unwrap()[0].value.as_entity().unwrap();
    assert_eq!(grid.type_name(), "GridType");
    assert_eq!(grid.get_integer("dimension"), Some(2));
    let limits = grid.child("limits").and_then(|l| l.child("GridEnvelope")).unwrap();
    assert_eq!(limits.get("high"), Some(&Value::IntegerList(vec![99, 99])));
}

// ============================================================================
// Enumeration closure
// ============================================================================

#[test]
fn test_enumeration_literals_are_closed() {
    assert_eq!(
        InterpolationMethod::by_literal("bilinear"),
        InterpolationMethod::by_literal("bilinear")
    );
    assert_eq!(InterpolationMethod::by_literal("bogus"), None);
    assert_eq!(Closure::by_literal("closed-open"), Some(Closure::ClosedOpen));

    let parsed = codec()
        .read_file(fixture("coverage_description.xml"))
        .unwrap();
    let offering = parsed.document.root_entity().unwrap().children("CoverageOffering")[0];
    let values = offering
        .child("rangeSet")
        .and_then(|r| r.child("RangeSet"))
        .map(|r| r.children("axisDescription"))
        .and_then(|axes| axes[0].child("AxisDescription"))
        .and_then(|a| a.child("values"))
        .unwrap();
    let interval = values
        .group("group")
        .unwrap()
        .iter()
        .find(|e| e.member == "interval")
        .and_then(|e| e.value.as_entity())
        .unwrap();
    assert_eq!(interval.get_enum::<Closure>("closure"), Some(Closure::OpenClosed));
    assert!(!interval.is_set("atomic"));
    assert_eq!(interval.get_bool("atomic"), Some(false));
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn test_ownership_transfer_between_parents() {
    let factory = Factory::wcs10().unwrap();
    let mut first = factory.create_get_coverage_type();
    let mut second = factory.create_get_coverage_type();

    let mut output = factory.create_output_type();
    let mut format = factory.create_code_type();
    format.set("value", "GeoTIFF").unwrap();
    output.set("format", format).unwrap();
    first.set("output", output).unwrap();

    Entity::transfer(&mut first, "output", &mut second, "output").unwrap();
    assert!(first.get("output").is_none());
    assert!(!first.is_set("output"));
    assert_eq!(
        second.child("output").and_then(|o| o.child("format")).and_then(|f| f.get_str("value")),
        Some("GeoTIFF")
    );
}

// ============================================================================
// Required-field enforcement
// ============================================================================

#[test]
fn test_incomplete_coverage_offering_is_not_written() {
    let factory = Factory::wcs10().unwrap();
    let mut offering = factory.create_coverage_offering_type();
    offering.set("name", "dem_30m").unwrap();
    offering.set("label", "30 m DEM").unwrap();

    let err = codec()
        .write_entity(&offering, &QName::wcs("CoverageOffering"))
        .unwrap_err();
    assert!(matches!(
        err.schema_error(),
        Some(SchemaError::MissingRequiredFeature { .. })
    ));

    let missing: Vec<String> = err
        .diagnostics()
        .iter()
        .filter_map(|d| match &d.error {
            SchemaError::MissingRequiredFeature { feature, .. } => Some(feature.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        missing,
        vec![
            "lonLatEnvelope",
            "domainSet",
            "rangeSet",
            "supportedCRSs",
            "supportedFormats"
        ]
    );
}

#[test]
fn test_list_insertions_are_checked_at_write() {
    let factory = Factory::wcs10().unwrap();
    let mut request = factory.create_describe_coverage_type();
    request
        .list_mut("Coverage")
        .unwrap()
        .push(Value::Integer(7));

    let mut document = DocumentRoot::new();
    document.set(WcsElement::DescribeCoverage, request).unwrap();
    let err = codec().write_document(&document).unwrap_err();
    assert!(matches!(err, Error::Unserializable(_)));
    assert!(matches!(
        err.schema_error(),
        Some(SchemaError::TypeMismatch { .. })
    ));
    assert_eq!(err.diagnostics()[0].path, "/DescribeCoverageType/Coverage[1]");
}

// ============================================================================
// Document root exclusivity
// ============================================================================

#[test]
fn test_document_root_holds_one_element() {
    let factory = Factory::wcs10().unwrap();
    let mut document = factory.create_document_root();
    document.set(WcsElement::GetCoverage, get_coverage(&factory)).unwrap();
    document
        .set(WcsElement::GetCapabilities, factory.create_get_capabilities_type())
        .unwrap();

    assert!(document.get(WcsElement::GetCoverage).is_none());
    assert!(document.get(WcsElement::GetCapabilities).is_some());
    assert_eq!(document.wcs_element(), Some(WcsElement::GetCapabilities));
}

// ============================================================================
// Read modes and limits
// ============================================================================

#[test]
fn test_unknown_root_element() {
    let err = lax()
        .read_str(r#"<wcs:GetMap xmlns:wcs="http://www.opengis.net/wcs"/>"#)
        .unwrap_err();
    assert_eq!(
        err.schema_error(),
        Some(&SchemaError::UnknownRootElement("wcs:GetMap".to_string()))
    );
}

#[test]
fn test_depth_limit() {
    let mut codec = codec();
    codec.set_config(
        CodecConfig::new()
            .with_mode(ReadMode::Skip)
            .with_limits(Limits::new().with_max_xml_depth(3)),
    );
    let err = codec.read_file(fixture("get_coverage.xml")).unwrap_err();
    assert_eq!(
        err.schema_error(),
        Some(&SchemaError::DepthExceeded { depth: 4, max: 3 })
    );
}

#[test]
fn test_size_limit() {
    let mut codec = codec();
    codec.set_config(CodecConfig::new().with_limits(Limits::new().with_max_xml_size(64)));
    let xml = std::fs::read_to_string(fixture("capabilities.xml")).unwrap();
    assert!(matches!(
        codec.read_str(&xml),
        Err(Error::LimitExceeded(_))
    ));
}

#[test]
fn test_lax_collects_what_strict_rejects() {
    let xml = r#"<wcs:GetCoverage xmlns:wcs="http://www.opengis.net/wcs" version="1.0.0" mode="fast">
          <wcs:sourceCoverage>dem</wcs:sourceCoverage>
          <wcs:interpolationMethod>spline</wcs:interpolationMethod>
        </wcs:GetCoverage>"#;

    let err = codec().read_str(xml).unwrap_err();
    assert_eq!(
        err.schema_error(),
        Some(&SchemaError::UnexpectedAttribute("mode".to_string()))
    );

    let parsed = lax().read_str(xml).unwrap();
    let errors: Vec<&SchemaError> = parsed.diagnostics.iter().map(|d| &d.error).collect();
    assert_eq!(errors.len(), 4);
    assert_eq!(errors[0], &SchemaError::UnexpectedAttribute("mode".to_string()));
    assert!(matches!(errors[1], SchemaError::InvalidEnumLiteral { .. }));
    assert!(matches!(
        errors[2],
        SchemaError::MissingRequiredFeature { feature, .. } if feature == "domainSubset"
    ));
    assert!(matches!(
        errors[3],
        SchemaError::MissingRequiredFeature { feature, .. } if feature == "output"
    ));

    let request = parsed.document.root_entity().unwrap();
    assert_eq!(request.get_str("sourceCoverage"), Some("dem"));
}

#[test]
fn test_repeated_single_element_keeps_last_value() {
    let xml = r#"<wcs:DescribeCoverage xmlns:wcs="http://www.opengis.net/wcs" version="1.0.0">
          <wcs:Coverage>a</wcs:Coverage>
        </wcs:DescribeCoverage>"#;
    assert!(codec().read_str(xml).unwrap().is_clean());

    let xml = r#"<wcs:GetCoverage xmlns:wcs="http://www.opengis.net/wcs" version="1.0.0">
          <wcs:sourceCoverage>first</wcs:sourceCoverage>
          <wcs:sourceCoverage>second</wcs:sourceCoverage>
        </wcs:GetCoverage>"#;
    let parsed = lax().read_str(xml).unwrap();
    assert!(matches!(
        parsed.diagnostics[0].error,
        SchemaError::TooManyValues { max: 1, .. }
    ));
    let request = parsed.document.root_entity().unwrap();
    assert_eq!(request.get_str("sourceCoverage"), Some("second"));
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_factory_built_request_round_trips() {
    let factory = Factory::wcs10().unwrap();
    let mut request = get_coverage(&factory);
    request.set("service", "WCS").unwrap();
    request.set("version", "1.0.0").unwrap();
    request
        .set("interpolationMethod", InterpolationMethod::Bicubic)
        .unwrap();

    let mut document = factory.create_document_root();
    document.set(WcsElement::GetCoverage, request.clone()).unwrap();

    let codec = codec();
    let xml = codec.write_document(&document).unwrap();
    let parsed = codec.read_str(&xml).unwrap();
    assert!(parsed.is_clean(), "{:?}", parsed.diagnostics);
    assert_eq!(parsed.document.root_entity(), Some(&request));
    assert!(xml.contains("<wcs:interpolationMethod>bicubic</wcs:interpolationMethod>"));
}

#[test]
fn test_fixtures_round_trip() {
    let codec = codec();
    for name in ["get_coverage.xml", "capabilities.xml", "coverage_description.xml"] {
        let first = codec.read_file(fixture(name)).unwrap();
        assert!(first.is_clean(), "{}: {:?}", name, first.diagnostics);

        let written = codec.write_document(&first.document).unwrap();
        let second = codec.read_str(&written).unwrap();
        assert_eq!(
            second.document.root_value(),
            first.document.root_value(),
            "{}",
            name
        );
        assert_eq!(second.document.mixed(), first.document.mixed(), "{}", name);

        let rewritten = codec.write_document(&second.document).unwrap();
        assert_eq!(rewritten, codec.write_document(&second.document).unwrap());
        let third = codec.read_str(&rewritten).unwrap();
        assert_eq!(third.document, second.document, "{}", name);
    }
}

#[test]
fn test_wildcard_content_is_preserved() {
    let codec = codec();
    let parsed = codec.read_file(fixture("capabilities.xml")).unwrap();
    let vendor = parsed
        .document
        .get(WcsElement::WcsCapabilities)
        .and_then(|c| c.child("Capability"))
        .and_then(|c| c.child("VendorSpecificCapabilities"))
        .unwrap();
    let elements: Vec<&AnyElement> = vendor
        .mixed("any")
        .unwrap()
        .iter()
        .filter_map(|item| match item {
            MixedContent::Element(element) => Some(element),
            _ => None,
        })
        .collect();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].local_name(), "Tiling");

    let xml = codec.write_document(&parsed.document).unwrap();
    assert!(xml.contains(r#"xmlns:ns1="urn:acme""#));
    assert!(xml.contains(r#"<ns1:Tiling size="256">"#));
    assert!(xml.contains("<ns1:Format>image/png</ns1:Format>"));
}

/// Vendor content of a capabilities document
fn vendor_content(document: &DocumentRoot) -> &Vec<MixedContent> {
    document
        .get(WcsElement::WcsCapabilities)
        .and_then(|c| c.child("Capability"))
        .and_then(|c| c.child("VendorSpecificCapabilities"))
        .and_then(|v| v.mixed("any"))
        .unwrap()
}

#[test]
fn test_wildcard_text_keeps_whitespace() {
    let xml = std::fs::read_to_string(fixture("capabilities.xml")).unwrap();
    let start = xml.find("<VendorSpecificCapabilities>").unwrap();
    let end = xml.find("</VendorSpecificCapabilities>").unwrap();
    let xml = format!(
        "{}<VendorSpecificCapabilities><acme:Note xmlns:acme=\"urn:acme\">a <acme:b/> c</acme:Note>{}",
        &xml[..start],
        &xml[end..]
    );

    let codec = codec();
    let first = codec.read_str(&xml).unwrap();
    let note = AnyElement::new(QName::namespaced("urn:acme", "Note"))
        .with_text("a ")
        .with_child(AnyElement::new(QName::namespaced("urn:acme", "b")))
        .with_text(" c");
    assert_eq!(vendor_content(&first.document), &vec![MixedContent::Element(note)]);

    let written = codec.write_document(&first.document).unwrap();
    assert!(written.contains("<ns1:Note>a <ns1:b/> c</ns1:Note></VendorSpecificCapabilities>"));
    let second = codec.read_str(&written).unwrap();
    assert_eq!(vendor_content(&second.document), vendor_content(&first.document));
}

#[test]
fn test_string_values_keep_whitespace() {
    let factory = Factory::wcs10().unwrap();
    let mut request = factory.create_describe_coverage_type();
    request.set("service", "WCS").unwrap();
    request.set("version", "1.0.0").unwrap();
    request.push("Coverage", "  dem 30m ").unwrap();
    request.push("Coverage", "landsat\t").unwrap();
    let mut document = factory.create_document_root();
    document.set(WcsElement::DescribeCoverage, request.clone()).unwrap();

    let codec = codec();
    let parsed = codec.read_str(&codec.write_document(&document).unwrap()).unwrap();
    assert_eq!(parsed.document.root_entity(), Some(&request));
}

#[test]
fn test_compact_output() {
    let factory = Factory::wcs10().unwrap();
    let mut document = DocumentRoot::new();
    document
        .set(WcsElement::GetCapabilities, factory.create_get_capabilities_type())
        .unwrap();
    document.declare_prefix("wcs", "http://www.opengis.net/wcs");

    let mut codec = codec();
    codec.set_config(CodecConfig::new().with_indent(None));
    assert_eq!(
        codec.write_document(&document).unwrap(),
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<wcs:GetCapabilities xmlns:wcs="http://www.opengis.net/wcs" service="WCS"/>"#
        )
    );
}
