use chrono::NaiveDate;
use hub_core::{
    CellValue, ColumnType, HubService, SeedConfig, SeedError, TableRegistry, TableRepository,
    DEMO_TABLE_NAMES, MAX_HISTORY_DAYS,
};
use std::collections::HashSet;

fn setup() -> HubService<TableRegistry> {
    HubService::new(TableRegistry::new())
}

fn row_counts(service: &HubService<TableRegistry>) -> Vec<(String, usize)> {
    service
        .list_tables()
        .into_iter()
        .map(|name| {
            let rows = service.get_table(&name).unwrap().row_count();
            (name, rows)
        })
        .collect()
}

#[test]
fn seeding_registers_every_demo_table_in_order() {
    let service = setup();
    let seeded = service.seed_demo_data().unwrap();

    assert_eq!(service.list_tables(), DEMO_TABLE_NAMES.to_vec());
    assert_eq!(seeded.len(), DEMO_TABLE_NAMES.len());
    assert_eq!(service.get_table("dim_department").unwrap().row_count(), 4);
    assert_eq!(service.get_table("dim_kpi").unwrap().row_count(), 12);
    assert_eq!(service.get_table("fact_kpi_data").unwrap().row_count(), 90 * 12);
    assert_eq!(service.get_table("dim_user").unwrap().row_count(), 7);
}

#[test]
fn seeding_twice_matches_seeding_once() {
    let once = setup();
    once.seed_demo_data().unwrap();

    let twice = setup();
    twice.seed_demo_data().unwrap();
    twice.seed_demo_data().unwrap();

    assert_eq!(row_counts(&once), row_counts(&twice));
    for name in DEMO_TABLE_NAMES {
        assert_eq!(
            *once.get_table(name).unwrap(),
            *twice.get_table(name).unwrap()
        );
    }
}

#[test]
fn reseeding_replaces_an_imported_demo_table() {
    let service = setup();
    service.seed_demo_data().unwrap();
    service
        .import_csv("dim_department", b"dept_id\nOPS\n")
        .unwrap();
    service.import_csv("custom", b"a\n1\n").unwrap();

    service.seed_demo_data().unwrap();

    let departments = service.get_table("dim_department").unwrap();
    assert_eq!(departments.row_count(), 4);
    assert_eq!(departments.column_count(), 5);
    // Non-demo tables are left alone and keep their position.
    assert_eq!(service.list_tables().last().map(String::as_str), Some("custom"));
}

#[test]
fn kpi_facts_are_typed_and_uniquely_keyed() {
    let service = setup();
    service.seed_demo_data().unwrap();
    let facts = service.get_table("fact_kpi_data").unwrap();

    assert_eq!(facts.column("actual_value").unwrap().kind, ColumnType::Float);
    assert_eq!(facts.column("date_id").unwrap().kind, ColumnType::Integer);

    let ids: HashSet<&str> = facts
        .column_values("record_id")
        .unwrap()
        .into_iter()
        .filter_map(CellValue::as_str)
        .collect();
    assert_eq!(ids.len(), facts.row_count());
}

#[test]
fn demo_users_share_hashed_password_and_optional_department() {
    let service = setup();
    service.seed_demo_data().unwrap();
    let users = service.get_table("dim_user").unwrap();

    let admin = users.row(0).unwrap();
    assert_eq!(admin.get("username"), Some(&CellValue::from("admin")));
    assert_eq!(admin.get("dept_id"), Some(&CellValue::Null));

    let hash = admin.get("password_hash").and_then(CellValue::as_str).unwrap();
    assert_eq!(hash.len(), 64);
    assert!(users
        .column_values("password_hash")
        .unwrap()
        .iter()
        .all(|value| value.as_str() == Some(hash)));
}

#[test]
fn custom_config_shifts_history_window() {
    let config = SeedConfig {
        anchor_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        history_days: 7,
        rng_seed: 42,
    };
    let service = HubService::with_seed_config(TableRegistry::new(), config);
    service.seed_demo_data().unwrap();

    let facts = service.repository().get_table("fact_kpi_data").unwrap();
    assert_eq!(facts.row_count(), 7 * 12);
    assert_eq!(
        facts.row(facts.row_count() - 1).unwrap().get("date_id"),
        Some(&CellValue::Integer(20240615))
    );
}

#[test]
fn oversized_history_fails_without_committing() {
    let config = SeedConfig {
        history_days: MAX_HISTORY_DAYS + 1,
        ..SeedConfig::default()
    };
    let service = HubService::with_seed_config(TableRegistry::new(), config);

    let err = service.seed_demo_data().unwrap_err();
    assert_eq!(err, SeedError::HistoryTooLong(MAX_HISTORY_DAYS + 1));
    assert!(service.list_tables().is_empty());
}
