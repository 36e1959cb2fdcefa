use super::*;

fn retailer(id: &str, color: &str) -> RetailerConfig {
    RetailerConfig {
        id: id.to_string(),
        name: id.to_uppercase(),
        color: color.to_string(),
        schema: Schema::FamilyB,
        base_url: None,
        notes: None,
    }
}

#[test]
fn validate_accepts_well_formed_retailers() {
    let file = RetailersFile {
        retailers: vec![retailer("kiwi", "#7ab51d"), retailer("rema", "#002B5C")],
    };
    assert!(validate_retailers(&file).is_ok());
}

#[test]
fn validate_rejects_empty_id() {
    let file = RetailersFile {
        retailers: vec![retailer("  ", "#7ab51d")],
    };
    let err = validate_retailers(&file).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn validate_rejects_empty_name() {
    let mut r = retailer("kiwi", "#7ab51d");
    r.name = String::new();
    let file = RetailersFile { retailers: vec![r] };
    let err = validate_retailers(&file).unwrap_err();
    assert!(err.to_string().contains("non-empty name"));
}

#[test]
fn validate_rejects_bad_color() {
    for color in ["7ab51d", "#7ab51", "#7ab51dd", "#zzzzzz"] {
        let file = RetailersFile {
            retailers: vec![retailer("kiwi", color)],
        };
        let err = validate_retailers(&file).unwrap_err();
        assert!(
            err.to_string().contains("invalid color"),
            "color {color} should be rejected, got: {err}"
        );
    }
}

#[test]
fn validate_rejects_duplicate_ids_case_insensitive() {
    let file = RetailersFile {
        retailers: vec![retailer("kiwi", "#7ab51d"), retailer("KIWI", "#7ab51d")],
    };
    let err = validate_retailers(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate retailer id"));
}

#[test]
fn validate_rejects_base_url_without_scheme() {
    let mut r = retailer("kiwi", "#7ab51d");
    r.base_url = Some("api.kiwi.example".to_string());
    let file = RetailersFile { retailers: vec![r] };
    let err = validate_retailers(&file).unwrap_err();
    assert!(err.to_string().contains("http(s) scheme"));
}

#[test]
fn schema_parses_snake_case() {
    let yaml = r##"
retailers:
  - id: meny
    name: Meny
    color: "#d5121e"
    schema: family_a
    base_url: https://api.meny.example
"##;
    let file: RetailersFile = serde_yaml::from_str(yaml).expect("parse");
    assert_eq!(file.retailers[0].schema, Schema::FamilyA);
    assert_eq!(
        file.retailers[0].base_url.as_deref(),
        Some("https://api.meny.example")
    );
}

#[test]
fn schema_display() {
    assert_eq!(Schema::FamilyA.to_string(), "family_a");
    assert_eq!(Schema::FamilyB.to_string(), "family_b");
    assert_eq!(Schema::FamilyC.to_string(), "family_c");
}

#[test]
fn directory_display_known_and_unknown() {
    let dir = RetailerDirectory::new(vec![retailer("kiwi", "#7ab51d")]);
    assert_eq!(
        dir.display("kiwi"),
        RetailerDisplay {
            name: "KIWI".to_string(),
            color: "#7ab51d".to_string(),
        }
    );
    let unknown = dir.display("joker");
    assert_eq!(unknown.name, "joker");
    assert_eq!(unknown.color, FALLBACK_COLOR);
}

#[test]
fn directory_get_by_id() {
    let dir = RetailerDirectory::new(vec![
        retailer("kiwi", "#7ab51d"),
        retailer("rema", "#002b5c"),
    ]);
    assert_eq!(dir.len(), 2);
    assert_eq!(dir.get("rema").map(|r| r.id.as_str()), Some("rema"));
    assert!(dir.get("meny").is_none());
}

#[test]
fn load_retailers_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("retailers.yaml");
    assert!(
        path.exists(),
        "retailers.yaml missing at {path:?}; required for this test"
    );
    let file = load_retailers(&path).expect("failed to load retailers.yaml");
    assert!(
        !file.retailers.is_empty(),
        "retailers.yaml should contain at least one retailer"
    );
    let dir = RetailerDirectory::from(file);
    assert!(dir.get("kiwi").is_some());
}

#[test]
fn load_retailers_missing_file_is_io_error() {
    let err = load_retailers(Path::new("/nonexistent/retailers.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::RetailersFileIo { .. }));
}
