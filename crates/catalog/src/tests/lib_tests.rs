use super::*;

use shared::domain::Position;

fn record(id: &str) -> SpringRecord {
    let mut record = Catalog::builtin()
        .get(&SpringId::new("baotu"))
        .map(|record| (*record).clone())
        .expect("baotu record");
    record.id = SpringId::new(id);
    record
}

#[test]
fn builtin_catalog_passes_validation() {
    let records = builtin::records();
    assert_eq!(records.len(), 4);
    validate(&records).expect("builtin catalog is valid");

    for record in &records {
        assert_eq!(record.hotspots.len(), 3, "record {}", record.id);
    }
}

#[test]
fn looks_up_records_by_id() {
    let catalog = Catalog::builtin();
    let baotu = catalog.get(&SpringId::new("baotu")).expect("baotu");

    assert_eq!(baotu.name, "趵突泉");
    let main = baotu
        .hotspot(&HotspotId::new("main-spring"))
        .expect("main-spring hotspot");
    assert_eq!(main.position, Position::new(45.0, 55.0));
    assert!(catalog.get(&SpringId::new("missing")).is_none());

    let ids: Vec<_> = catalog.ids().map(SpringId::as_str).collect();
    assert_eq!(ids, vec!["baotu", "heihu", "wulongtan", "zhenzhu"]);
}

#[test]
fn lookups_share_the_same_record_allocation() {
    let catalog = Catalog::builtin();
    let first = catalog.get(&SpringId::new("heihu")).expect("heihu");
    let second = catalog.get(&SpringId::new("heihu")).expect("heihu");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn rejects_duplicate_record_ids() {
    let err = Catalog::from_records(vec![record("dup"), record("dup")])
        .expect_err("duplicate record");
    assert_eq!(err, CatalogError::DuplicateRecord(SpringId::new("dup")));
}

#[test]
fn rejects_duplicate_hotspot_ids_within_a_record() {
    let mut spring = record("one");
    let copy = spring.hotspots[0].clone();
    spring.hotspots.push(copy);

    let err = Catalog::from_records(vec![spring]).expect_err("duplicate hotspot");
    assert_eq!(
        err,
        CatalogError::DuplicateHotspot {
            record: SpringId::new("one"),
            hotspot: HotspotId::new("main-spring"),
        }
    );
}

#[test]
fn rejects_positions_outside_the_viewport() {
    let mut spring = record("one");
    spring.hotspots[1].position = Position::new(120.0, 40.0);

    let err = Catalog::from_records(vec![spring]).expect_err("out of range");
    assert!(matches!(err, CatalogError::PositionOutOfRange { .. }));
}

#[test]
fn rejects_empty_catalog() {
    assert_eq!(
        Catalog::from_records(Vec::new()).expect_err("empty"),
        CatalogError::Empty
    );
}

#[test]
fn parses_json_catalog_documents() {
    let json = serde_json::json!({ "springs": [record("from-json")] }).to_string();
    let catalog = Catalog::from_json_str(&json).expect("parse");

    assert_eq!(catalog.len(), 1);
    assert!(catalog.get(&SpringId::new("from-json")).is_some());
}

#[test]
fn json_validation_errors_are_reported() {
    let json = serde_json::json!({ "springs": [] }).to_string();
    let err = Catalog::from_json_str(&json).expect_err("empty");
    assert!(err.to_string().contains("no records"));
}

#[test]
fn load_json_names_the_missing_file() {
    let path = std::env::temp_dir().join("spring_ar_guide_missing_catalog.json");
    let err = Catalog::load_json(&path).expect_err("missing file");
    assert!(err.to_string().contains("failed to read catalog file"));
}
