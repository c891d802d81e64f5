//! Zipping CSV files end to end: inference, lazy columns, sinks.

mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use common::int_table;
use zipview_core::config::CsvOptions;
use zipview_core::cursor::RowCursor;
use zipview_core::schema::{DataType, RowSchema};
use zipview_core::source::{all_columns, TabularSource};
use zipview_core::types::Scalar;
use zipview_io::{drain, CsvTable, CsvWriter, JsonlWriter};
use zipview_zip::{create, ZipView};

fn csv_source(dir: &Path, name: &str, contents: &str) -> Arc<dyn TabularSource> {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write csv");
    Arc::new(CsvTable::open(&path, CsvOptions::default()).expect("open csv"))
}

fn people_and_scores(dir: &Path) -> Arc<dyn TabularSource> {
    create(vec![
        csv_source(dir, "people.csv", "id,name\n1,ann\n2,bob\n3,cy\n"),
        csv_source(dir, "scores.csv", "id,score\n10,1.5\n20,2.5\n"),
    ])
    .unwrap()
}

#[test]
fn composed_schema_from_inferred_csv_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let sources = vec![
        csv_source(dir.path(), "people.csv", "id,name\n1,ann\n"),
        csv_source(dir.path(), "scores.csv", "id,score,ok\n10,1.5,true\n"),
    ];
    let view = ZipView::try_new(sources).unwrap();
    let columns = view.composed_schema().columns().unwrap();
    let layout: Vec<_> = columns
        .iter()
        .map(|c| (c.name.as_str(), c.data_type, c.source, c.local))
        .collect();
    assert_eq!(
        layout,
        vec![
            ("id", DataType::Int64, 0, 0),
            ("name", DataType::Utf8, 0, 1),
            ("id", DataType::Int64, 1, 0),
            ("score", DataType::Float64, 1, 1),
            ("ok", DataType::Boolean, 1, 2),
        ]
    );
    assert_eq!(view.composed_schema().find_column("id"), Some(2));
}

#[test]
fn csv_row_count_needs_permission() {
    let dir = tempfile::tempdir().unwrap();
    let view = people_and_scores(dir.path());
    assert_eq!(view.row_count(false).unwrap(), None);
    assert_eq!(view.row_count(true).unwrap(), Some(2));
}

#[test]
fn csv_mixed_with_memory_table() {
    let dir = tempfile::tempdir().unwrap();
    let view = create(vec![
        csv_source(dir.path(), "names.csv", "name\nann\nbob\ncy\n"),
        int_table("n", &[7, 8]),
    ])
    .unwrap();
    // One side unknown without a scan.
    assert_eq!(view.row_count(false).unwrap(), None);

    let mut cursor = view.open_cursor(&all_columns).unwrap();
    let mut rows = Vec::new();
    while cursor.advance().unwrap() {
        rows.push((cursor.value(0).unwrap().clone(), cursor.value(1).unwrap().clone()));
    }
    assert_eq!(
        rows,
        vec![
            (Scalar::Str("ann".into()), Scalar::I64(7)),
            (Scalar::Str("bob".into()), Scalar::I64(8)),
        ]
    );
}

#[test]
fn jsonl_output_disambiguates_duplicate_names() {
    let dir = tempfile::tempdir().unwrap();
    let view = people_and_scores(dir.path());
    let schema = view.schema();
    let columns: Vec<usize> = (0..schema.column_count()).collect();

    let mut cursor = view.open_cursor(&all_columns).unwrap();
    let mut sink = JsonlWriter::to_writer(Vec::new(), schema.as_ref(), &columns).unwrap();
    let written = drain(cursor.as_mut(), &mut sink, None).unwrap();
    assert_eq!(written, 2);

    let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert_eq!(
        out,
        "{\"id\":1,\"id_1\":10,\"name\":\"ann\",\"score\":1.5}\n\
         {\"id\":2,\"id_1\":20,\"name\":\"bob\",\"score\":2.5}\n"
    );
}

#[test]
fn csv_output_of_selected_columns_after_skip() {
    let dir = tempfile::tempdir().unwrap();
    let view = create(vec![
        csv_source(dir.path(), "a.csv", "k,v\na,1\nb,2\nc,3\nd,4\n"),
        csv_source(dir.path(), "b.csv", "w\nx\ny\nz\n"),
    ])
    .unwrap();
    let schema = view.schema();
    let selected = vec![2, 0];
    let wanted = |c: usize| selected.contains(&c);

    let mut cursor = view.open_cursor(&wanted).unwrap();
    assert!(!cursor.is_column_active(1).unwrap());
    assert!(cursor.advance_many(1).unwrap());

    let mut sink = CsvWriter::to_writer(Vec::new(), b',', schema.as_ref(), &selected).unwrap();
    let written = drain(cursor.as_mut(), &mut sink, Some(5)).unwrap();
    assert_eq!(written, 2);
    let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert_eq!(out, "w,k\ny,b\nz,c\n");
}

#[test]
fn drain_respects_limit() {
    let dir = tempfile::tempdir().unwrap();
    let view = people_and_scores(dir.path());
    let schema = view.schema();
    let mut cursor = view.open_cursor(&all_columns).unwrap();
    let mut sink = JsonlWriter::to_writer(Vec::new(), schema.as_ref(), &[1]).unwrap();
    assert_eq!(drain(cursor.as_mut(), &mut sink, Some(1)).unwrap(), 1);
    let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert_eq!(out, "{\"name\":\"ann\"}\n");
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CsvTable::open(dir.path().join("absent.csv"), CsvOptions::default()).is_err());
}
