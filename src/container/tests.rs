use super::*;
use crate::container::header::METADATA_KEY;

/// Assemble a container by hand from a header string and raw data
fn raw_container(json: &str, data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(json.len() as u64).to_le_bytes());
    bytes.extend_from_slice(json.as_bytes());
    bytes.extend_from_slice(data);
    bytes
}

fn header_json(bytes: &[u8]) -> serde_json::Value {
    let len = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    serde_json::from_slice(&bytes[8..8 + len]).unwrap()
}

fn conv_fixture() -> FixtureContainer {
    let mut fixture = FixtureContainer::new();
    fixture.add_f32("simple.input", &[1, 2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
    fixture.add_f32("simple.output", &[1, 1, 1], &[10.0]).unwrap();
    fixture.add_f32("simple.conv.weight", &[1, 1, 2, 2], &[1.0; 4]).unwrap();
    fixture.add_f32("simple.conv.bias", &[1], &[0.0]).unwrap();
    fixture.add_metadata("simple.padding", "(0,0)").unwrap();
    fixture.add_metadata("simple.stride", "(1, 1)").unwrap();
    fixture.add_metadata("simple.padding_mode", "zeros").unwrap();
    fixture
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_add_tensor_and_query() {
    let fixture = conv_fixture();
    assert_eq!(fixture.len(), 4);
    assert!(!fixture.is_empty());
    assert_eq!(fixture.metadata_len(), 3);
    assert!(fixture.has_tensor("simple.conv.bias"));
    assert!(!fixture.has_tensor("simple.conv"));
    assert_eq!(fixture.data_section_len(), 16 + 4 + 16 + 4);

    let weight = fixture.get_tensor("simple.conv.weight").unwrap();
    assert_eq!(weight.name(), "simple.conv.weight");
    assert_eq!(weight.shape(), &[1, 1, 2, 2]);
    assert_eq!(weight.numel(), 4);
    assert!(fixture.get_tensor("missing").is_none());
    assert!(fixture.get_metadata("missing").is_none());
}

#[test]
fn test_tensor_names_keep_insertion_order() {
    let mut fixture = FixtureContainer::new();
    for name in ["zeta", "alpha", "mid", "beta"] {
        fixture.add_f32(name, &[], &[0.0]).unwrap();
    }
    assert_eq!(fixture.tensor_names(), vec!["zeta", "alpha", "mid", "beta"]);
}

#[test]
fn test_duplicate_name_rejected_without_overwrite() {
    let mut fixture = FixtureContainer::new();
    fixture.add_f32("simple.input", &[1], &[1.0]).unwrap();
    let err = fixture.add_f32("simple.input", &[1], &[2.0]).unwrap_err();
    assert!(matches!(err, FixtureError::DuplicateName(ref n) if n == "simple.input"));
    assert_eq!(fixture.len(), 1);
    assert_eq!(
        fixture.get_tensor("simple.input").unwrap().to_f32_vec().unwrap(),
        vec![1.0]
    );
}

#[test]
fn test_duplicate_metadata_key_rejected() {
    let mut fixture = FixtureContainer::new();
    fixture.add_metadata("simple.groups", "1").unwrap();
    let err = fixture.add_metadata("simple.groups", "2").unwrap_err();
    assert!(matches!(err, FixtureError::DuplicateKey(ref k) if k == "simple.groups"));
    assert_eq!(fixture.get_metadata("simple.groups"), Some("1"));
}

#[test]
fn test_add_tensor_size_mismatch() {
    let mut fixture = FixtureContainer::new();
    let err = fixture.add_tensor("w", DType::F32, &[2, 2], vec![0u8; 15]).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::SizeMismatch {
            expected: 16,
            actual: 15,
            ..
        }
    ));
    assert!(fixture.is_empty());
}

#[test]
fn test_add_tensor_shape_overflow() {
    let mut fixture = FixtureContainer::new();
    let err = fixture
        .add_tensor("huge", DType::F64, &[usize::MAX, 2], Vec::new())
        .unwrap_err();
    assert!(matches!(err, FixtureError::InvalidShape { .. }));
}

#[test]
fn test_metadata_iterates_in_key_order() {
    let fixture = conv_fixture();
    let keys: Vec<&str> = fixture.metadata().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["simple.padding", "simple.padding_mode", "simple.stride"]);
}

// ============================================================================
// Encode
// ============================================================================

#[test]
fn test_encode_empty_container() {
    let fixture = FixtureContainer::new();
    assert!(matches!(fixture.to_bytes(), Err(FixtureError::EmptyContainer)));

    let mut metadata_only = FixtureContainer::new();
    metadata_only.add_metadata("k", "v").unwrap();
    assert!(matches!(metadata_only.to_bytes(), Err(FixtureError::EmptyContainer)));
}

#[test]
fn test_encode_reserved_name() {
    let mut fixture = FixtureContainer::new();
    fixture.add_f32(METADATA_KEY, &[1], &[1.0]).unwrap();
    let err = fixture.to_bytes().unwrap_err();
    assert!(matches!(err, FixtureError::InvalidName(ref n) if n == METADATA_KEY));
}

#[test]
fn test_encode_offsets_follow_insertion_order() {
    let fixture = conv_fixture();
    let bytes = fixture.to_bytes().unwrap();
    let header = header_json(&bytes);

    let expected = [
        ("simple.input", [0, 16]),
        ("simple.output", [16, 20]),
        ("simple.conv.weight", [20, 36]),
        ("simple.conv.bias", [36, 40]),
    ];
    for (name, offsets) in expected {
        assert_eq!(header[name]["data_offsets"], serde_json::json!(offsets), "{name}");
        assert_eq!(header[name]["dtype"], "F32");
    }
    assert_eq!(header[METADATA_KEY]["simple.stride"], "(1, 1)");
}

#[test]
fn test_encode_header_written_in_insertion_order() {
    let mut fixture = FixtureContainer::new();
    fixture.add_f32("b", &[1], &[1.0]).unwrap();
    fixture.add_f32("a", &[1], &[2.0]).unwrap();
    let bytes = fixture.to_bytes_with(&EncodeOptions { align_header: false }).unwrap();
    let header_len = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    let json = std::str::from_utf8(&bytes[8..8 + header_len]).unwrap();
    let b = json.find("\"b\"").unwrap();
    let a = json.find("\"a\"").unwrap();
    assert!(b < a, "header must list tensors in insertion order: {json}");
}

#[test]
fn test_encode_data_section_is_concatenation() {
    let fixture = conv_fixture();
    let bytes = fixture.to_bytes().unwrap();
    let header_len = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    let data = &bytes[8 + header_len..];

    let expected: Vec<u8> = fixture.tensors().flat_map(|t| t.data().to_vec()).collect();
    assert_eq!(data, expected.as_slice());
}

#[test]
fn test_encode_aligned_header() {
    let fixture = conv_fixture();
    let aligned = fixture.to_bytes().unwrap();
    let header_len = u64::from_le_bytes(aligned[..8].try_into().unwrap()) as usize;
    assert_eq!(header_len % 8, 0);
    assert_eq!((8 + header_len) % 8, 0);

    let unaligned = fixture
        .to_bytes_with(&EncodeOptions { align_header: false })
        .unwrap();
    let raw_len = u64::from_le_bytes(unaligned[..8].try_into().unwrap()) as usize;
    assert!(raw_len <= header_len && header_len - raw_len < 8);
    // Only whitespace differs
    assert_eq!(&aligned[8..8 + raw_len], &unaligned[8..8 + raw_len]);
    assert!(aligned[8 + raw_len..8 + header_len].iter().all(|&b| b == b' '));
}

#[test]
fn test_encode_is_deterministic() {
    assert_eq!(conv_fixture().to_bytes().unwrap(), conv_fixture().to_bytes().unwrap());
}

#[test]
fn test_no_metadata_key_without_metadata() {
    let mut fixture = FixtureContainer::new();
    fixture.add_f32("x", &[1], &[1.0]).unwrap();
    let header = header_json(&fixture.to_bytes().unwrap());
    assert!(header.get(METADATA_KEY).is_none());
}

#[test]
fn test_encode_to_writer_matches_to_bytes() {
    let fixture = conv_fixture();
    let mut out = Vec::new();
    fixture.encode_to_writer(&mut out).unwrap();
    assert_eq!(out, fixture.to_bytes().unwrap());
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_simple_scenario_round_trip() {
    let mut fixture = FixtureContainer::new();
    fixture.add_f32("simple.input", &[1, 2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
    fixture.add_metadata("simple.padding", "(0,0)").unwrap();

    let decoded = FixtureContainer::from_bytes(&fixture.to_bytes().unwrap()).unwrap();
    let input = decoded.get_tensor("simple.input").unwrap();
    assert_eq!(input.shape(), &[1, 2, 2]);
    assert_eq!(input.to_f32_vec().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(decoded.get_metadata("simple.padding"), Some("(0,0)"));
}

#[test]
fn test_round_trip_mixed_dtypes() {
    let mut fixture = FixtureContainer::new();
    fixture.add_f32("rope.cos", &[2, 2], &[1.0, 0.5, -0.5, -1.0]).unwrap();
    fixture.add_i64("rope.position_ids", &[1, 3], &[0, 1, 2]).unwrap();
    fixture.add_bool("mask", &[3], &[true, false, true]).unwrap();
    let half_bytes: Vec<u8> = [1.5f32, -2.0]
        .iter()
        .flat_map(|&x| half::f16::from_f32(x).to_le_bytes())
        .collect();
    fixture.add_tensor("rope.q", DType::F16, &[2], half_bytes).unwrap();
    fixture.add_tensor("scalar", DType::F64, &[], 0.25f64.to_le_bytes()).unwrap();
    fixture.add_tensor("empty", DType::F32, &[0, 4], Vec::new()).unwrap();

    let decoded = FixtureContainer::from_bytes(&fixture.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, fixture);
    assert_eq!(decoded.tensor_names(), fixture.tensor_names());
    assert_eq!(
        decoded.get_tensor("rope.q").unwrap().to_f32_vec().unwrap(),
        vec![1.5, -2.0]
    );
    assert_eq!(
        decoded.get_tensor("scalar").unwrap().to_f64_vec().unwrap(),
        vec![0.25]
    );
    assert_eq!(decoded.get_tensor("empty").unwrap().numel(), 0);
}

#[test]
fn test_round_trip_zero_sized_tensors_keep_order() {
    let mut fixture = FixtureContainer::new();
    fixture.add_f32("a", &[0], &[]).unwrap();
    fixture.add_f32("b", &[1], &[1.0]).unwrap();
    fixture.add_f32("c", &[0], &[]).unwrap();
    fixture.add_f32("d", &[0, 3], &[]).unwrap();
    fixture.add_f32("e", &[1], &[2.0]).unwrap();

    let decoded = FixtureContainer::from_bytes(&fixture.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded.tensor_names(), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(decoded, fixture);
}

#[test]
fn test_decode_from_reader() {
    let fixture = conv_fixture();
    let bytes = fixture.to_bytes().unwrap();
    let decoded = FixtureContainer::decode_from_reader(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(decoded, fixture);
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("conv2d_simple.safetensors");
    let fixture = conv_fixture();

    fixture.encode_to_file(&path).unwrap();
    let decoded = FixtureContainer::decode_from_file(&path).unwrap();
    assert_eq!(decoded, fixture);
}

#[test]
fn test_file_encode_replaces_existing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fixture.safetensors");
    std::fs::write(&path, b"stale").unwrap();

    conv_fixture().encode_to_file(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), conv_fixture().to_bytes().unwrap());
}

#[test]
fn test_failed_file_encode_leaves_nothing_behind() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty.safetensors");

    let err = FixtureContainer::new().encode_to_file(&path).unwrap_err();
    assert!(matches!(err, FixtureError::EmptyContainer));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_failed_file_encode_keeps_previous_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fixture.safetensors");
    conv_fixture().encode_to_file(&path).unwrap();

    let mut bad = FixtureContainer::new();
    bad.add_f32(METADATA_KEY, &[1], &[0.0]).unwrap();
    assert!(bad.encode_to_file(&path).is_err());
    assert_eq!(FixtureContainer::decode_from_file(&path).unwrap(), conv_fixture());
}

#[test]
fn test_file_encode_into_missing_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing").join("fixture.safetensors");
    let err = conv_fixture().encode_to_file(&path).unwrap_err();
    assert!(matches!(err, FixtureError::Io(_)));
}

#[test]
fn test_decode_missing_file() {
    let err = FixtureContainer::decode_from_file("/nonexistent/fixture.safetensors").unwrap_err();
    assert!(matches!(err, FixtureError::Io(_)));
    assert!(!err.is_corruption());
}

// ============================================================================
// Decode validation
// ============================================================================

#[test]
fn test_decode_truncated_prefix() {
    for len in 0..8 {
        let err = FixtureContainer::from_bytes(&vec![0u8; len]).unwrap_err();
        assert!(matches!(err, FixtureError::Truncated { available } if available == len));
        assert!(err.is_corruption());
    }
}

#[test]
fn test_decode_header_longer_than_input() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&100u64.to_le_bytes());
    bytes.extend_from_slice(b"{}");
    let err = FixtureContainer::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FixtureError::MalformedHeader { .. }));
}

#[test]
fn test_decode_header_over_limit() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&u64::MAX.to_le_bytes());
    bytes.extend_from_slice(b"{}");
    let err = FixtureContainer::from_bytes(&bytes).unwrap_err();
    assert!(
        matches!(err, FixtureError::MalformedHeader { ref reason } if reason.contains("limit"))
    );

    let options = DecodeOptions {
        max_header_len: 4,
        ..DecodeOptions::default()
    };
    let json = r#"{"x":{"dtype":"U8","shape":[1],"data_offsets":[0,1]}}"#;
    let err = FixtureContainer::from_bytes_with(&raw_container(json, &[1]), &options).unwrap_err();
    assert!(matches!(err, FixtureError::MalformedHeader { .. }));
}

#[test]
fn test_decode_invalid_json() {
    let err = FixtureContainer::from_bytes(&raw_container("not json!!", &[])).unwrap_err();
    assert!(matches!(err, FixtureError::MalformedHeader { .. }));
}

#[test]
fn test_decode_header_not_object() {
    let err = FixtureContainer::from_bytes(&raw_container("[]", &[])).unwrap_err();
    assert!(matches!(err, FixtureError::MalformedHeader { .. }));
}

#[test]
fn test_decode_invalid_utf8_header() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&4u64.to_le_bytes());
    bytes.extend_from_slice(&[b'{', 0xFF, 0xFE, b'}']);
    let err = FixtureContainer::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FixtureError::MalformedHeader { .. }));
}

#[test]
fn test_decode_duplicate_header_key() {
    let json = r#"{
        "x":{"dtype":"U8","shape":[1],"data_offsets":[0,1]},
        "x":{"dtype":"U8","shape":[1],"data_offsets":[0,1]}
    }"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[1])).unwrap_err();
    assert!(
        matches!(err, FixtureError::MalformedHeader { ref reason } if reason.contains("duplicate"))
    );
}

#[test]
fn test_decode_duplicate_metadata_key() {
    let json = r#"{
        "__metadata__":{"simple.groups":"1","simple.groups":"2"},
        "x":{"dtype":"U8","shape":[1],"data_offsets":[0,1]}
    }"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[1])).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::MalformedHeader { ref reason }
            if reason.contains("duplicate key 'simple.groups'")
    ));
}

#[test]
fn test_decode_missing_field() {
    let json = r#"{"x":{"dtype":"U8","shape":[1]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[1])).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::MalformedHeader { ref reason } if reason.contains("data_offsets")
    ));
}

#[test]
fn test_decode_unknown_dtype() {
    let json = r#"{"x":{"dtype":"F4","shape":[1],"data_offsets":[0,1]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[1])).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::UnknownDType { ref name, ref dtype } if name == "x" && dtype == "F4"
    ));
}

#[test]
fn test_decode_negative_shape() {
    let json = r#"{"x":{"dtype":"U8","shape":[-1],"data_offsets":[0,1]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[1])).unwrap_err();
    assert!(matches!(err, FixtureError::InvalidShape { ref name, .. } if name == "x"));

    let json = r#"{"x":{"dtype":"U8","shape":[1.5],"data_offsets":[0,1]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[1])).unwrap_err();
    assert!(matches!(err, FixtureError::InvalidShape { .. }));
}

#[test]
fn test_decode_size_mismatch() {
    let json = r#"{"x":{"dtype":"F32","shape":[2,3],"data_offsets":[0,20]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[0u8; 20])).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::SizeMismatch {
            expected: 24,
            actual: 20,
            ..
        }
    ));
}

#[test]
fn test_decode_offsets_past_end() {
    let json = r#"{"x":{"dtype":"F32","shape":[2],"data_offsets":[0,8]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[0u8; 6])).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::OffsetOutOfRange {
            start: 0,
            end: 8,
            data_len: 6,
            ..
        }
    ));
}

#[test]
fn test_decode_reversed_offsets() {
    let json = r#"{"x":{"dtype":"U8","shape":[0],"data_offsets":[4,0]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[0u8; 4])).unwrap_err();
    assert!(matches!(err, FixtureError::OffsetOutOfRange { .. }));
}

#[test]
fn test_decode_overlapping_offsets() {
    let json = r#"{
        "a":{"dtype":"F32","shape":[2],"data_offsets":[0,8]},
        "b":{"dtype":"F32","shape":[2],"data_offsets":[4,12]}
    }"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[0u8; 12])).unwrap_err();
    assert!(matches!(err, FixtureError::OffsetOutOfRange { ref name, .. } if name == "b"));

    // Overlap is rejected even when gaps are tolerated
    let lenient = DecodeOptions::lenient();
    let err = FixtureContainer::from_bytes_with(&raw_container(json, &[0u8; 12]), &lenient)
        .unwrap_err();
    assert!(matches!(err, FixtureError::OffsetOutOfRange { .. }));
}

#[test]
fn test_decode_gap_and_trailing_bytes() {
    let gap = r#"{"a":{"dtype":"U8","shape":[2],"data_offsets":[2,4]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(gap, &[0u8; 4])).unwrap_err();
    assert!(matches!(err, FixtureError::OffsetOutOfRange { .. }));

    let trailing = r#"{"a":{"dtype":"U8","shape":[2],"data_offsets":[0,2]}}"#;
    let err = FixtureContainer::from_bytes(&raw_container(trailing, &[0u8; 5])).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::OffsetOutOfRange { ref reason, .. } if reason.contains("trailing")
    ));

    let lenient = DecodeOptions::lenient();
    let decoded =
        FixtureContainer::from_bytes_with(&raw_container(gap, &[9, 9, 1, 2]), &lenient).unwrap();
    assert_eq!(decoded.get_tensor("a").unwrap().data(), &[1, 2]);
    let decoded = FixtureContainer::from_bytes_with(&raw_container(trailing, &[0u8; 5]), &lenient);
    assert!(decoded.is_ok());
}

#[test]
fn test_decode_orders_tensors_by_offset() {
    // Python's save_file sorts header keys, not data; order follows offsets
    let json = r#"{
        "a":{"dtype":"U8","shape":[1],"data_offsets":[2,3]},
        "b":{"dtype":"U8","shape":[2],"data_offsets":[0,2]}
    }"#;
    let decoded = FixtureContainer::from_bytes(&raw_container(json, &[1, 2, 3])).unwrap();
    assert_eq!(decoded.tensor_names(), vec!["b", "a"]);
    assert_eq!(decoded.get_tensor("a").unwrap().data(), &[3]);
}

#[test]
fn test_decode_metadata() {
    let json = r#"{
        "__metadata__":{"simple.groups":"1","format":"pt"},
        "x":{"dtype":"BOOL","shape":[],"data_offsets":[0,1]}
    }"#;
    let decoded = FixtureContainer::from_bytes(&raw_container(json, &[1])).unwrap();
    assert_eq!(decoded.get_metadata("format"), Some("pt"));
    assert_eq!(decoded.get_metadata("simple.groups"), Some("1"));
    assert_eq!(decoded.get_tensor("x").unwrap().to_bool_vec().unwrap(), vec![true]);
}

#[test]
fn test_decode_non_string_metadata() {
    let json = r#"{
        "__metadata__":{"groups":1},
        "x":{"dtype":"U8","shape":[1],"data_offsets":[0,1]}
    }"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[1])).unwrap_err();
    assert!(matches!(err, FixtureError::MalformedHeader { .. }));
}

#[test]
fn test_decode_without_metadata() {
    let json = r#"{"x":{"dtype":"I64","shape":[1],"data_offsets":[0,8]}}"#;
    let decoded = FixtureContainer::from_bytes(&raw_container(json, &7i64.to_le_bytes())).unwrap();
    assert_eq!(decoded.metadata_len(), 0);
    assert_eq!(decoded.get_tensor("x").unwrap().to_i64_vec().unwrap(), vec![7]);
}

#[test]
fn test_decode_header_with_padding() {
    let json = r#"{"x":{"dtype":"U8","shape":[1],"data_offsets":[0,1]}}     "#;
    let decoded = FixtureContainer::from_bytes(&raw_container(json, &[42])).unwrap();
    assert_eq!(decoded.get_tensor("x").unwrap().data(), &[42]);
}

#[test]
fn test_decode_fails_on_first_bad_tensor() {
    let json = r#"{
        "a":{"dtype":"F4","shape":[1],"data_offsets":[0,1]},
        "b":{"dtype":"U8","shape":[-1],"data_offsets":[1,2]}
    }"#;
    let err = FixtureContainer::from_bytes(&raw_container(json, &[0, 0])).unwrap_err();
    assert!(matches!(err, FixtureError::UnknownDType { .. }));
}
