//! # Catalog Loading Tests
//!
//! Dataset loading from disk, including the degraded empty-catalog mode.

use er_finder::catalog::{CatalogField, FacilityCatalog};
use er_finder::errors::CatalogError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_dataset(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_both_schema_variants() {
    let file = write_dataset(
        r#"[
            {"醫院名稱": "臺大醫院", "醫院地址": "台北市中正區中山南路7號", "醫院電話": "02-23123456", "縣市": "台北市", "地區": "中正區"},
            {"醫院名稱": "亞東醫院", "醫院地址": "新北市板橋區南雅南路二段21號", "縣市": "新北市", "行政區": "板橋區"},
            {"醫院名稱": "亞東醫院", "醫院地址": "新北市板橋區南雅南路二段21號", "縣市": "新北市", "行政區": "板橋區"}
        ]"#,
    );

    let catalog = FacilityCatalog::load(file.path()).unwrap();

    // Duplicates are preserved
    assert_eq!(catalog.len(), 3);
    assert_eq!(
        catalog.distinct_values(CatalogField::District, Some((CatalogField::City, "新北市"))),
        vec!["板橋區"]
    );
    assert_eq!(catalog.matching_region("板橋").len(), 2);
    assert_eq!(catalog.records()[1].phone(), None);
}

#[test]
fn test_missing_file_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    assert!(matches!(
        FacilityCatalog::load(&path),
        Err(CatalogError::Io { .. })
    ));
    assert!(FacilityCatalog::load_or_empty(&path).is_empty());
}

#[test]
fn test_malformed_file_degrades_to_empty() {
    let file = write_dataset(r#"{"醫院名稱": "not an array"}"#);

    assert!(matches!(
        FacilityCatalog::load(file.path()),
        Err(CatalogError::Parse { .. })
    ));
    assert!(FacilityCatalog::load_or_empty(file.path()).is_empty());
}

#[test]
fn test_bundled_sample_dataset_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/急診醫院清單_台北新北基隆.json");
    let catalog = FacilityCatalog::load(path).unwrap();

    assert!(!catalog.is_empty());
    assert_eq!(
        catalog.distinct_values(CatalogField::City, None),
        vec!["台北市", "基隆市", "新北市"]
    );
}
