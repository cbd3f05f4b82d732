use query_filter::config::{ConfigError, load_config, load_config_from_path};
use query_filter::{Filter, SelectQuery, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BOOKING_CONFIG: &str = r#"
table = "booking"

[[fields]]
name = "name"
type = "char"
operator = "icontains"

[[fields]]
name = "heads"
source = "number_of_heads"
type = "integer"
operator = "gte"

[[fields]]
name = "guests"
source = "guest_names"
type = "array"

[[fields]]
name = "has_paid"
type = "boolean"
truthy = ["yes"]
falsy = ["no"]
default = "no"

[[fields]]
name = "date"
type = "date"
format = "%d/%m/%Y"
"#;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("filter.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, BOOKING_CONFIG);

    let config = load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.table.as_deref(), Some("booking"));
    assert!(!config.raise_exceptions);

    let fields = config.field_set().unwrap();
    assert_eq!(fields.names(), vec!["name", "heads", "guests", "has_paid", "date"]);
    assert_eq!(fields.get("guests").unwrap().operator_name(), Some("contains"));
}

#[test]
fn test_configured_fields_render_sql() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, BOOKING_CONFIG);
    let fields = load_config_from_path(&path).unwrap().field_set().unwrap();

    let (sql, params) = Filter::new(&fields, SelectQuery::new("booking"))
        .filter("heads=3&guests=jim,pam&date=05/01/2020")
        .unwrap()
        .to_sql();

    assert_eq!(
        sql,
        "SELECT * FROM booking WHERE number_of_heads >= ? AND guest_names @> ? AND has_paid = ? AND date = ?"
    );
    assert_eq!(params.values.len(), 4);
    assert_eq!(params.values[0], Value::Int(3));
    assert_eq!(params.values[1], Value::from(vec!["jim", "pam"]));
    assert_eq!(params.values[2], Value::Bool(false));
    assert_eq!(params.values[3].to_string(), "2020-01-05");
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");

    match load_config_from_path(&missing) {
        Err(ConfigError::Read { path, .. }) => assert!(path.ends_with("missing.toml")),
        other => panic!("expected a read error, got {:?}", other),
    }
}

#[test]
fn test_malformed_config_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[[fields]\nname = ");

    assert!(matches!(
        load_config_from_path(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_invalid_field_declaration_is_named() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[fields]]
name = "status"
type = "enum"
choices = []
"#,
    );

    let err = load_config_from_path(&path)
        .unwrap()
        .field_set()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Field { ref name, .. } if name == "status"));
}

#[test]
fn test_no_config_path_gives_empty_definition() {
    let config = load_config(None::<&Path>).unwrap();
    assert!(config.field_set().unwrap().is_empty());
}
