//! Tests for tidyframe-model spec files and types.

use std::io::Write;

use tidyframe_model::{
    BuiltinConverter, CleaningSpec, ColumnKey, ColumnType, FillValue, SortKey, SpecFile,
    SpecFileError, load_spec_file,
};

const SCORES: &str = r#"
name = "scores"

[[columns]]
key = "user_id"
source = "User ID"
type = "int64"
required = true

[[columns]]
key = "score"
source = "Score"
type = "float64"
fill_null = 0.0
precision = 2
converter = "identity"
aggregate = true

[[columns]]
key = "team"
type = "string"
converter = "lowercase"

[[columns]]
key = "ratio"
type = "float"
converter = { scale = 0.5 }

[cleaning]
drop_null_subsets = [["user_id"]]
unique_subsets = [["user_id"]]
sort = [{ key = "user_id" }, { key = "score", descending = true }]
"#;

#[test]
fn parses_full_spec_file() {
    let file = SpecFile::parse(SCORES, "scores.toml").expect("parse spec");
    assert_eq!(file.name, "scores");
    assert_eq!(file.columns.len(), 4);
    assert_eq!(file.columns[1].fill_null, Some(FillValue::Float(0.0)));
    assert_eq!(file.columns[2].column_type, ColumnType::Utf8);
    assert_eq!(
        file.columns[3].converter,
        Some(BuiltinConverter::Scale(0.5))
    );

    let spec = file.into_spec().expect("convert spec");
    assert_eq!(spec.name(), "scores");
    assert_eq!(spec.rename_map().get("user_id").map(String::as_str), Some("User ID"));
    assert!(spec.rename_map().get("team").is_none());
    assert_eq!(spec.precision_map().get("score"), Some(&2));
    assert!(spec.no_null_cols().contains("user_id"));
    assert!(spec.add_on_duplicate_cols().contains("score"));
    assert_eq!(spec.converter_map()["team"].name(), "lowercase");
    assert_eq!(
        spec.sort_keys(),
        vec![SortKey::ascending("user_id"), SortKey::descending("score")]
    );
    assert_eq!(
        spec.col_names(),
        ["user_id", "score", "team", "ratio"]
            .into_iter()
            .map(ColumnKey::from)
            .collect::<Vec<_>>()
    );
}

#[test]
fn integer_fill_values_stay_integers() {
    let text = r#"
[[columns]]
key = "n"
type = "int64"
fill_null = 0
"#;
    let file = SpecFile::parse(text, "inline").unwrap();
    assert_eq!(file.name, "dataset");
    assert_eq!(file.columns[0].fill_null, Some(FillValue::Int(0)));
}

#[test]
fn unknown_fields_are_rejected() {
    let text = r#"
[[columns]]
key = "n"
type = "int64"
colour = "blue"
"#;
    let err = SpecFile::parse(text, "inline").unwrap_err();
    assert!(matches!(err, SpecFileError::Parse { .. }));
    assert!(err.to_string().starts_with("invalid spec inline"));
}

#[test]
fn duplicate_and_blank_keys_are_rejected() {
    let dup = r#"
[[columns]]
key = "a"
type = "int64"
[[columns]]
key = "a"
type = "utf8"
"#;
    let err = SpecFile::parse(dup, "dup").unwrap().into_spec().unwrap_err();
    assert_eq!(err.to_string(), "column 'a' is declared more than once");

    let blank = r#"
[[columns]]
key = "  "
type = "int64"
"#;
    let err = SpecFile::parse(blank, "blank").unwrap().into_spec().unwrap_err();
    assert!(matches!(err, SpecFileError::BlankColumnKey));
}

#[test]
fn loads_spec_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(SCORES.as_bytes()).expect("write spec");
    let spec = load_spec_file(file.path()).expect("load spec");
    assert_eq!(spec.dtype_map().len(), 4);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = load_spec_file(&path).unwrap_err();
    assert!(matches!(err, SpecFileError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn spec_file_serializes_to_json() {
    let file = SpecFile::parse(SCORES, "scores.toml").unwrap();
    let json = serde_json::to_value(&file).expect("serialize");
    assert_eq!(json["columns"][0]["type"], "int64");
    assert_eq!(json["columns"][3]["converter"]["scale"], 0.5);
    let round: SpecFile = serde_json::from_value(json).expect("deserialize");
    assert_eq!(round, file);
}
