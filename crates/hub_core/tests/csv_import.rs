use hub_core::{
    CellValue, ColumnType, HubService, ImportError, ImportErrorKind, ImportOptions,
    RegistryError, TableRegistry,
};

fn setup() -> HubService<TableRegistry> {
    HubService::new(TableRegistry::new())
}

const PEOPLE: &[u8] = b"id,name,active\n1,Alice,true\n2,Bob,false\n";

#[test]
fn import_infers_types_and_preserves_order() {
    let service = setup();
    service.import_csv("people", PEOPLE).unwrap();

    let table = service.get_table("people").unwrap();
    assert_eq!(table.column_names(), vec!["id", "name", "active"]);
    let kinds: Vec<ColumnType> = table.columns().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ColumnType::Integer, ColumnType::Text, ColumnType::Boolean]
    );

    let first = table.row(0).unwrap();
    assert_eq!(first.get("id"), Some(&CellValue::Integer(1)));
    assert_eq!(first.get("name"), Some(&CellValue::from("Alice")));
    assert_eq!(first.get("active"), Some(&CellValue::Boolean(true)));

    let second = table.row(1).unwrap();
    assert_eq!(second.get("id"), Some(&CellValue::Integer(2)));
    assert_eq!(second.get("name"), Some(&CellValue::from("Bob")));
    assert_eq!(second.get("active"), Some(&CellValue::Boolean(false)));
}

#[test]
fn second_import_replaces_instead_of_merging() {
    let service = setup();
    service.import_csv("t", PEOPLE).unwrap();
    service.import_csv("t", b"x,y\n1.5,a\n").unwrap();

    let expected = hub_core::parse_table(b"x,y\n1.5,a\n", &ImportOptions::default()).unwrap();
    let table = service.get_table("t").unwrap();
    assert_eq!(*table, expected);
    assert_eq!(table.row_count(), 1);
    assert!(table.column("id").is_none());
}

#[test]
fn ragged_row_fails_and_leaves_registry_unchanged() {
    let service = setup();
    service.import_csv("t", PEOPLE).unwrap();
    let before = service.get_table("t").unwrap();

    let err = service
        .import_csv("t", b"a,b,c\n1,2,3\n4,5\n6,7,8\n")
        .unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::ParseError);
    assert_eq!(err.line(), Some(3));

    let after = service.get_table("t").unwrap();
    assert_eq!(*after, *before);
}

#[test]
fn duplicate_header_fails_with_schema_error() {
    let service = setup();
    service.import_csv("t", PEOPLE).unwrap();
    let before = service.get_table("t").unwrap();

    let err = service.import_csv("t", b"a,a\n1,2\n").unwrap_err();
    assert!(matches!(err, ImportError::Schema { .. }));
    assert_eq!(*service.get_table("t").unwrap(), *before);
}

#[test]
fn failed_import_of_new_name_stays_not_found() {
    let service = setup();
    let inputs: [&[u8]; 5] = [
        b"",
        b"a,a\n1,2\n",
        b"a,b\n1\n",
        b"a\n\"open\n",
        b"a\n\xFF\n",
    ];

    for input in inputs {
        assert!(service.import_csv("fresh", input).is_err());
        assert!(matches!(
            service.get_table("fresh"),
            Err(RegistryError::NotFound(_))
        ));
    }
    assert!(service.list_tables().is_empty());
}

#[test]
fn invalid_utf8_is_an_encoding_error() {
    let service = setup();
    let err = service.import_csv("t", b"name\n\xC3\x28\n").unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::EncodingError);
    assert_eq!(err.line(), Some(2));
}

#[test]
fn declared_encoding_decodes_legacy_bytes() {
    let service = setup();
    let options = ImportOptions::with_encoding("latin1");
    service
        .import_csv_with("cities", b"city\nS\xE3o Paulo\n", &options)
        .unwrap();

    let table = service.get_table("cities").unwrap();
    assert_eq!(
        table.row(0).unwrap().get("city"),
        Some(&CellValue::from("S\u{e3}o Paulo"))
    );
}

#[test]
fn empty_fields_become_null_and_numbers_widen() {
    let service = setup();
    service
        .import_csv("kpi", b"actual,target,note\n1,100,\n2.5,,late\n,80,\n")
        .unwrap();

    let table = service.get_table("kpi").unwrap();
    let kinds: Vec<ColumnType> = table.columns().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ColumnType::Float, ColumnType::Integer, ColumnType::Text]
    );
    assert_eq!(
        table.column_values("actual").unwrap(),
        vec![
            &CellValue::Float(1.0),
            &CellValue::Float(2.5),
            &CellValue::Null
        ]
    );
    assert_eq!(table.row(1).unwrap().get("target"), Some(&CellValue::Null));
}

#[test]
fn quoted_fields_round_trip_through_import() {
    let service = setup();
    service
        .import_csv(
            "notes",
            b"id,text\r\n1,\"hello, world\"\r\n2,\"two\r\nlines\"\r\n3,\"say \"\"hi\"\"\"\r\n",
        )
        .unwrap();

    let table = service.get_table("notes").unwrap();
    let texts: Vec<&str> = table
        .column_values("text")
        .unwrap()
        .into_iter()
        .filter_map(CellValue::as_str)
        .collect();
    assert_eq!(texts, vec!["hello, world", "two\r\nlines", "say \"hi\""]);
}

#[test]
fn cr_only_input_reports_the_same_lines_as_crlf() {
    let service = setup();

    let crlf = service.import_csv("t", b"a,b,c\r\n1,2,3\r\n4,5\r\n").unwrap_err();
    let cr = service.import_csv("t", b"a,b,c\r1,2,3\r4,5\r").unwrap_err();
    assert_eq!(cr.kind(), ImportErrorKind::ParseError);
    assert_eq!(cr.line(), crlf.line());
    assert_eq!(cr.line(), Some(3));

    let err = service.import_csv("t", b"a\r1\r\xFF\r").unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::EncodingError);
    assert_eq!(err.line(), Some(3));

    service.import_csv("t", b"a,b\r1,2\r3,4\r").unwrap();
    assert_eq!(service.get_table("t").unwrap().row_count(), 2);
}
