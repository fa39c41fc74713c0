use filehead_fs::ConfigStore;
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct TestConfig {
    name: String,
    count: i32,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.toml");
    fs::write(&file_path, "name = \"test\"\ncount = 42").unwrap();

    let config: TestConfig = ConfigStore::new().load(&file_path).unwrap();

    assert_eq!(config.name, "test");
    assert_eq!(config.count, 42);
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    fs::write(&file_path, r#"{"name": "test", "count": 42}"#).unwrap();

    let config: TestConfig = ConfigStore::new().load(&file_path).unwrap();

    assert_eq!(config.name, "test");
    assert_eq!(config.count, 42);
}

#[test]
fn test_load_yaml_uppercase_extension() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.YML");
    fs::write(&file_path, "name: test\ncount: 42").unwrap();

    let config: TestConfig = ConfigStore::new().load(&file_path).unwrap();

    assert_eq!(config, TestConfig { name: "test".into(), count: 42 });
}

#[test]
fn test_invalid_toml_reports_format_and_path() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.toml");
    fs::write(&file_path, "name = ").unwrap();

    let result: filehead_fs::Result<TestConfig> = ConfigStore::new().load(&file_path);

    match result {
        Err(filehead_fs::Error::ConfigParse { format, path, .. }) => {
            assert_eq!(format, "TOML");
            assert_eq!(path, file_path);
        }
        other => panic!("expected ConfigParse, got {:?}", other),
    }
}

#[test]
fn test_unsupported_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.xyz");
    fs::write(&file_path, "data").unwrap();

    let result: filehead_fs::Result<TestConfig> = ConfigStore::new().load(&file_path);

    assert!(matches!(
        result,
        Err(filehead_fs::Error::UnsupportedFormat { extension }) if extension == "xyz"
    ));
}
