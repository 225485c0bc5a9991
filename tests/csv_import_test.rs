use catpack::{import_table, PackConfig, PackageRequest, Packager, Value, ValueType, Version};
use std::fs;
use std::path::{Path, PathBuf};

const CSV_CONTENT: &str = "\
id,ra,dec,name
1,10.68,41.27,M31
2,83.82,-5.39,M42
3,201.37,-43.02,NGC5128
";

fn write_csv(dir: &str) -> PathBuf {
    let _ = fs::remove_dir_all(dir);
    fs::create_dir_all(dir).unwrap();
    let path = Path::new(dir).join("sources.csv");
    fs::write(&path, CSV_CONTENT).unwrap();
    path
}

#[test]
fn test_csv_import_infers_types() {
    let dir = "/tmp/catpack_test_csv_types";
    let path = write_csv(dir);

    let table = import_table(&path).unwrap();
    assert_eq!(table.column_count(), 4);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.column_names(), vec!["id", "ra", "dec", "name"]);

    assert_eq!(table.column("id").unwrap().value_type(), ValueType::Int);
    assert_eq!(table.column("ra").unwrap().value_type(), ValueType::Float);
    assert_eq!(table.column("name").unwrap().value_type(), ValueType::String);

    assert_eq!(table.column("id").unwrap().values[0], Value::Int(1));
    assert_eq!(
        table.column("name").unwrap().values[2],
        Value::String("NGC5128".to_string())
    );

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_imported_table_packages_cleanly() {
    let dir = "/tmp/catpack_test_csv_pack";
    let csv_path = write_csv(dir);
    let table = import_table(&csv_path).unwrap();

    let config = PackConfig::with_output_dir(PathBuf::from(dir));
    let packager = Packager::new(&config);

    let request = PackageRequest {
        name: "messier_sample".to_string(),
        table,
        summary: "Three bright objects".to_string(),
        user: "D. Importer".to_string(),
        contact: "d.importer@obs.org".to_string(),
        script_name: "import_csv".to_string(),
        version: Version::Number(1),
        column_descriptions: vec![
            "Running identifier".to_string(),
            "Right ascension".to_string(),
            "Declination".to_string(),
            "Common name".to_string(),
        ],
        column_ucds: vec![
            "meta.id".to_string(),
            "pos.eq.ra".to_string(),
            "pos.eq.dec".to_string(),
            "meta.id;meta.main".to_string(),
        ],
        column_units: vec![
            String::new(),
            "deg".to_string(),
            "deg".to_string(),
            String::new(),
        ],
        readme: "Imported from sources.csv.".to_string(),
        extra: None,
        test_mode: false,
    };

    let package = packager.package_to(request, &mut Vec::new()).unwrap();
    assert_eq!(package.column_names.len(), 4);
    assert!(packager
        .output_path("messier_sample", &Version::Number(1))
        .exists());

    let _ = fs::remove_dir_all(dir);
}
