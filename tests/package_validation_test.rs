use catpack::{
    Column, PackConfig, PackageError, PackageRequest, Packager, Table, Value, Version,
};
use std::fs;
use std::path::PathBuf;

/// Helper to create a 3-column, 10-row test table
fn sample_table() -> Table {
    Table::new(vec![
        Column::new("id", (0..10i64).map(Value::Int).collect()).unwrap(),
        Column::new(
            "ra",
            (0..10).map(|i| Value::Float(f64::from(i) * 1.5)).collect(),
        )
        .unwrap(),
        Column::new(
            "band",
            (0..10).map(|i| Value::String(format!("b{}", i))).collect(),
        )
        .unwrap(),
    ])
    .unwrap()
}

fn sample_request(name: &str) -> PackageRequest {
    PackageRequest {
        name: name.to_string(),
        table: sample_table(),
        summary: "Pilot source list".to_string(),
        user: "A. Tester".to_string(),
        contact: "a.tester@obs.org".to_string(),
        script_name: "make_catalogue".to_string(),
        version: Version::Number(1),
        column_descriptions: vec![
            "Source identifier".to_string(),
            "Right ascension".to_string(),
            "Photometric band".to_string(),
        ],
        column_ucds: vec![
            "meta.id".to_string(),
            "pos.eq.ra".to_string(),
            "instr.bandpass".to_string(),
        ],
        column_units: vec![String::new(), "deg".to_string(), String::new()],
        readme: "Pilot catalogue built from commissioning data.".to_string(),
        extra: None,
        test_mode: false,
    }
}

fn fresh_dir(dir: &str) -> PackConfig {
    let _ = fs::remove_dir_all(dir);
    fs::create_dir_all(dir).unwrap();
    PackConfig::with_output_dir(PathBuf::from(dir))
}

fn dir_is_empty(dir: &str) -> bool {
    fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn test_packaging_succeeds_end_to_end() {
    let temp_dir = "/tmp/catpack_test_validation_ok";
    let config = fresh_dir(temp_dir);
    let packager = Packager::new(&config);

    let mut progress = Vec::new();
    let package = packager
        .package_to(sample_request("pilot_sources"), &mut progress)
        .unwrap();

    assert_eq!(package.metadata.name, "pilot_sources");
    assert_eq!(package.table.column_count(), 3);
    assert_eq!(package.table.row_count(), 10);
    assert_eq!(package.column_names.len(), 3);
    assert_eq!(package.column_descriptions.len(), 3);
    assert_eq!(package.column_ucds.len(), 3);
    assert_eq!(package.column_units.len(), 3);
    assert!(package.added.is_none());

    // File exists at the computed path immediately after return
    let expected = packager.output_path("pilot_sources", &Version::Number(1));
    assert!(expected.exists());

    // Progress output acknowledged each check and reported completion
    let progress = String::from_utf8(progress).unwrap();
    assert!(progress.contains("column_descriptions"));
    assert!(progress.contains("column_ucds"));
    assert!(progress.contains("column_units"));
    assert!(progress.contains("wrote package to"));

    let _ = fs::remove_dir_all(temp_dir);
}

#[test]
fn test_description_mismatch_writes_no_file() {
    let temp_dir = "/tmp/catpack_test_validation_desc";
    let config = fresh_dir(temp_dir);

    let mut request = sample_request("pilot_sources");
    request.column_descriptions.pop();

    let err = Packager::new(&config)
        .package_to(request, &mut Vec::new())
        .unwrap_err();

    match err {
        PackageError::ShapeMismatch { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].vector, "column_descriptions");
            assert_eq!(failures[0].expected, 3);
            assert_eq!(failures[0].actual, 2);
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
    assert!(dir_is_empty(temp_dir));

    let _ = fs::remove_dir_all(temp_dir);
}

#[test]
fn test_ucd_mismatch_writes_no_file() {
    let temp_dir = "/tmp/catpack_test_validation_ucd";
    let config = fresh_dir(temp_dir);

    let mut request = sample_request("pilot_sources");
    request.column_ucds.pop();

    let err = Packager::new(&config)
        .package_to(request, &mut Vec::new())
        .unwrap_err();

    match err {
        PackageError::ShapeMismatch { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].vector, "column_ucds");
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
    assert!(dir_is_empty(temp_dir));

    let _ = fs::remove_dir_all(temp_dir);
}

#[test]
fn test_unit_mismatch_writes_no_file() {
    let temp_dir = "/tmp/catpack_test_validation_unit";
    let config = fresh_dir(temp_dir);

    let mut request = sample_request("pilot_sources");
    request.column_units.push("mag".to_string());

    let err = Packager::new(&config)
        .package_to(request, &mut Vec::new())
        .unwrap_err();

    match err {
        PackageError::ShapeMismatch { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].vector, "column_units");
            assert_eq!(failures[0].actual, 4);
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
    assert!(dir_is_empty(temp_dir));

    let _ = fs::remove_dir_all(temp_dir);
}

#[test]
fn test_every_failing_vector_is_reported() {
    let temp_dir = "/tmp/catpack_test_validation_all";
    let config = fresh_dir(temp_dir);

    let mut request = sample_request("pilot_sources");
    request.column_descriptions.pop();
    request.column_ucds.clear();

    let mut progress = Vec::new();
    let err = Packager::new(&config)
        .package_to(request, &mut progress)
        .unwrap_err();

    match err {
        PackageError::ShapeMismatch { failures } => {
            let vectors: Vec<&str> = failures.iter().map(|f| f.vector).collect();
            assert_eq!(vectors, vec!["column_descriptions", "column_ucds"]);
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }

    // The passing check is still acknowledged alongside the failing ones
    let progress = String::from_utf8(progress).unwrap();
    assert!(progress.contains("column_units"));
    assert!(dir_is_empty(temp_dir));

    let _ = fs::remove_dir_all(temp_dir);
}
