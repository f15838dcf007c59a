use std::io::Write;

use nkpi_cli::input::load_table;
use nkpi_cli::output::ChartDocument;
use nkpi_model::RawValue;
use nkpi_transform::{TransformSpec, run};

fn csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_whole_file_with_first_row_as_header() {
    let file = csv("Month-Year,New Entries\nJan 2024,5\nFeb 2024,\n");
    let table = load_table(file.path(), None).unwrap();
    assert_eq!(table.columns, vec!["Month-Year", "New Entries"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.value(1, "New Entries"), Some(&RawValue::Null));
}

#[test]
fn loads_a_range_with_its_own_header() {
    let file = csv("Report,,\nignored,Month-Year,Value\nx,Jan 2024,3\nx,Feb 2024,4\n");
    let table = load_table(file.path(), Some("B2:C3")).unwrap();
    assert_eq!(table.columns, vec!["Month-Year", "Value"]);
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.value(0, "Value"),
        Some(&RawValue::Text("3".to_string()))
    );
}

#[test]
fn bad_range_is_an_error() {
    let file = csv("a,b\n1,2\n");
    assert!(load_table(file.path(), Some("not a range")).is_err());
    assert!(load_table(file.path(), Some("Z100:Z200")).is_err());
}

#[test]
fn missing_file_mentions_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let error = load_table(&path, None).unwrap_err();
    assert!(format!("{error:#}").contains("absent.csv"));
}

#[test]
fn chart_document_lists_points_and_drops() {
    let file = csv("Month-Year,New Entries,Existing Entries\nFeb 2024,3,2\nJan 2024,5,0\n");
    let table = load_table(file.path(), None).unwrap();
    let output = run(&table, &TransformSpec::default());
    let document = ChartDocument::new(&output.chart, &output.report);
    let json = serde_json::to_value(&document).unwrap();

    assert_eq!(json["series"], serde_json::json!(["New Entries", "Existing Entries"]));
    assert_eq!(json["points"][0]["label"], "Jan 2024");
    assert_eq!(json["points"][0]["value_label"], "5");
    assert_eq!(json["points"].as_array().unwrap().len(), 3);
    assert_eq!(json["drop_counts"]["non-positive"], 1);
    assert_eq!(json["dropped"][0]["reason"], "non_positive");
    assert_eq!(json["input_rows"], 2);
}
