//! Property tests: values written by the codec read back unchanged

use proptest::prelude::*;
use rust_decimal::Decimal;
use wcs10::codec::Codec;
use wcs10::documents::{AnyElement, MixedContent};
use wcs10::enums::InterpolationMethod;
use wcs10::model::{DocumentRoot, Entity, Factory, Value, WcsElement};
use wcs10::QName;
use wcs10::schema::SchemaEnum;

// -- Strategy helpers --

/// Text with leading, inner and trailing whitespace and characters that need escaping
fn arb_token() -> impl Strategy<Value = String> {
    "[ \t]{0,3}[A-Za-z0-9_&<>'\".: \t-]{1,20}[ \t]{0,3}"
}

/// Wildcard content: text runs interleaved with vendor elements that carry text
fn arb_mixed() -> impl Strategy<Value = Vec<MixedContent>> {
    let run = "[ \tA-Za-z0-9&<>.-]{1,12}";
    prop::collection::vec((run, "[a-z][a-z0-9]{0,7}", run), 1..5).prop_map(|parts| {
        let mut items = Vec::new();
        for (before, local, inner) in parts {
            items.push(MixedContent::Text(before));
            items.push(MixedContent::Element(
                AnyElement::new(QName::namespaced("urn:acme", local)).with_text(inner),
            ));
        }
        items
    })
}

fn capabilities_fixture() -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/capabilities.xml");
    std::fs::read_to_string(path).unwrap()
}

fn vendor_content(document: &DocumentRoot) -> Option<&Vec<MixedContent>> {
    document
        .get(WcsElement::WcsCapabilities)
        .and_then(|c| c.child("Capability"))
        .and_then(|c| c.child("VendorSpecificCapabilities"))
        .and_then(|v| v.mixed("any"))
}

fn arb_interpolation() -> impl Strategy<Value = InterpolationMethod> {
    (0i32..6).prop_map(|v| InterpolationMethod::by_value(v).unwrap_or(InterpolationMethod::None))
}

fn arb_decimal() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64, 0u32..6).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn get_coverage(factory: &Factory, corners: &[Vec<Decimal>], method: InterpolationMethod) -> Entity {
    let mut request = factory.create_get_coverage_type();
    request.set("service", "WCS").unwrap();
    request.set("version", "1.0.0").unwrap();
    request.set("sourceCoverage", "dem").unwrap();
    request.set("interpolationMethod", method).unwrap();

    let mut envelope = factory.create_envelope_type();
    for corner in corners {
        let mut pos = factory.create_direct_position_type();
        pos.set("value", Value::DecimalList(corner.clone())).unwrap();
        envelope.push("pos", pos).unwrap();
    }
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

proptest! {
    #[test]
    fn coverage_names_keep_order(names in prop::collection::vec(arb_token(), 0..8)) {
        let factory = Factory::wcs10().unwrap();
        let mut request = factory.create_describe_coverage_type();
        for name in &names {
            request.push("Coverage", name.as_str()).unwrap();
        }
        let mut document = factory.create_document_root();
        document.set(WcsElement::DescribeCoverage, request).unwrap();

        let codec = Codec::wcs10().unwrap();
        let xml = codec.write_document(&document).unwrap();
        let parsed = codec.read_str(&xml).unwrap();
        prop_assert!(parsed.is_clean());

        let read: Vec<String> = parsed
            .document
            .root_entity()
            .and_then(|r| r.list("Coverage"))
            .map(|values| values.iter().filter_map(|v| v.as_str()).map(str::to_string).collect())
            .unwrap_or_default();
        prop_assert_eq!(read, names);
    }

    #[test]
    fn get_coverage_survives_round_trip(
        corners in prop::collection::vec(prop::collection::vec(arb_decimal(), 2..4), 2..3),
        method in arb_interpolation(),
    ) {
        let factory = Factory::wcs10().unwrap();
        let request = get_coverage(&factory, &corners, method);
        let mut document = factory.create_document_root();
        document.set(WcsElement::GetCoverage, request.clone()).unwrap();

        let codec = Codec::wcs10().unwrap();
        let xml = codec.write_document(&document).unwrap();
        let parsed = codec.read_str(&xml).unwrap();
        prop_assert!(parsed.is_clean());

        let read = parsed.document.root_entity().unwrap();
        prop_assert_eq!(read.get_enum::<InterpolationMethod>("interpolationMethod"), Some(method));
        prop_assert_eq!(read, &request);
    }

    #[test]
    fn vendor_text_around_elements_survives(content in arb_mixed()) {
        let codec = Codec::wcs10().unwrap();
        let mut document = codec.read_str(&capabilities_fixture()).unwrap().document;
        let slot = document
            .root_entity_mut()
            .and_then(|c| c.child_mut("Capability"))
            .and_then(|c| c.child_mut("VendorSpecificCapabilities"))
            .and_then(|v| v.mixed_mut("any"))
            .unwrap();
        *slot = content.clone();

        let xml = codec.write_document(&document).unwrap();
        let parsed = codec.read_str(&xml).unwrap();
        prop_assert!(parsed.is_clean());
        prop_assert_eq!(vendor_content(&parsed.document), Some(&content));
    }

    #[test]
    fn written_output_is_stable(update_sequence in arb_token()) {
        let factory = Factory::wcs10().unwrap();
        let mut request = factory.create_get_capabilities_type();
        request.set("updateSequence", update_sequence.as_str()).unwrap();
        let mut document = factory.create_document_root();
        document.set(WcsElement::GetCapabilities, request).unwrap();

        let codec = Codec::wcs10().unwrap();
        let first = codec.write_document(&document).unwrap();
        let parsed = codec.read_str(&first).unwrap();
        let second = codec.write_document(&parsed.document).unwrap();
        prop_assert_eq!(
            parsed.document.root_entity().and_then(|r| r.get_str("updateSequence")),
            Some(update_sequence.as_str())
        );
        prop_assert_eq!(first, second);
    }
}
