//! Integration tests for field resolution through the public API

use chrono::{Duration, TimeZone, Utc};
use usage_fields::fields::{FieldError, FieldRegistry, field_function};
use usage_fields::usage::{Definition, FieldValue, Item, Metadata, Reading, VolumeTypeCatalog};

fn reading_with(metadata: Metadata) -> Reading {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    Reading::new("resource_id", "project_id", start, start + Duration::hours(2), 4_i64, metadata).unwrap()
}

fn resolve(key: &str, metadata: Metadata) -> Option<FieldValue> {
    field_function(key, &Definition::new(), &Item::new(), &reading_with(metadata)).unwrap()
}

#[test]
fn test_cinder_metadata_end_to_end() {
    let metadata = Metadata::new().with("metadata", "[{'key': 'test', 'value': 'cinder'}]");
    assert_eq!(resolve("metadata:test", metadata), Some(FieldValue::from("cinder")));
}

#[test]
fn test_every_convention_ignores_case() {
    let conventions = [
        ("metadata.TeSt", "nova"),
        ("properties.TEST", "glance"),
        ("metadata", "{'TEST': 'snapshot'}"),
        ("metadata", "[{'key': 'tEsT', 'value': 'cinder'}]"),
        ("X-Container-Meta-Test", "swift"),
    ];

    for (key, value) in conventions {
        let metadata = Metadata::new().with(key, value);
        let lower = resolve("metadata:test", metadata.clone());
        let upper = resolve("metadata:TEST", metadata.clone());
        let mixed = resolve("MetaData:Test", metadata);

        assert!(lower.is_some(), "convention '{key}' should resolve");
        assert_eq!(lower, upper, "convention '{key}' should ignore the case of the name");
        assert_eq!(lower, mixed, "convention '{key}' should ignore the case of the namespace");
    }
}

#[test]
fn test_unknown_field_is_an_error() {
    let err = field_function("doesntexist", &Definition::new(), &Item::new(), &reading_with(Metadata::new())).unwrap_err();
    assert!(matches!(err, FieldError::UnknownField { ref name } if name == "doesntexist"));
}

#[test]
fn test_report_row() {
    let names = [("3f2a".to_string(), "ssd".to_string())].into_iter().collect();
    let registry = FieldRegistry::new(VolumeTypeCatalog::new(names, "unknown"));

    let definition = Definition::new()
        .with("billing_entity", "Cloud Services")
        .with("currency_code", "USD")
        .with("cost_format", "{:,.2f} USD");
    let item = Item::new()
        .with("meter_name", "volume.size")
        .with("item_rate", 250.25)
        .with("currency_code", "EUR");
    let metadata = Metadata::new().with("volume_type", "3f2a").with("display_name", "db-data");
    let reading = reading_with(metadata);

    let columns = [
        "billing_entity",
        "currency_code",
        "meter_name",
        "display_name",
        "volume_type",
        "hours",
        "cost",
        "usage_start_date",
        "invoice_id",
        "instance_type",
    ];
    let row = registry.row(&columns, &definition, &item, &reading).unwrap();

    let expected = [
        Some(FieldValue::from("Cloud Services")),
        Some(FieldValue::from("EUR")),
        Some(FieldValue::from("volume.size")),
        Some(FieldValue::from("db-data")),
        Some(FieldValue::from("ssd")),
        Some(FieldValue::Float(2.0)),
        Some(FieldValue::from("1,001.00 USD")),
        Some(FieldValue::from("2024-06-01T00:00:00")),
        Some(FieldValue::from("")),
        None,
    ];
    assert_eq!(row, expected);
}

#[test]
fn test_failing_field_does_not_abort_the_row() {
    let registry = FieldRegistry::default();
    let definition = Definition::new().with("cost_format", "{:.2f} and {:.2f}");
    let item = Item::new().with("item_rate", 1.0);

    let row = registry
        .row(&["resource_id", "cost", "project_id"], &definition, &item, &reading_with(Metadata::new()))
        .unwrap();
    assert_eq!(
        row,
        vec![Some(FieldValue::from("resource_id")), None, Some(FieldValue::from("project_id"))]
    );
}

#[test]
fn test_registry_is_shareable_across_threads() {
    let registry = FieldRegistry::default();
    let reading = reading_with(Metadata::new().with("properties.os_type", "linux"));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let _ = scope.spawn(|| {
                let value = registry
                    .field_function("metadata:os_type", &Definition::new(), &Item::new(), &reading)
                    .unwrap();
                assert_eq!(value, Some(FieldValue::from("linux")));
            });
        }
    });
}
