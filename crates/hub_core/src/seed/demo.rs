//! Demo table builders.

use super::{SeedConfig, SeedError, MAX_HISTORY_DAYS};
use crate::model::table::{Column, Table};
use crate::model::value::{CellValue, ColumnType};
use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Demo tables in commit order.
pub const DEMO_TABLE_NAMES: [&str; 7] = [
    "dim_date",
    "dim_department",
    "dim_person",
    "dim_kpi",
    "fact_kpi_data",
    "fact_work_item",
    "dim_user",
];

const CALENDAR_DAYS_BACK: u64 = 365;
const CALENDAR_DAYS_AHEAD: u64 = 90;
const DEMO_PASSWORD: &str = "demo123";

// (dept_id, name, description, color)
const DEPARTMENTS: [(&str, &str, &str, &str); 4] = [
    ("MDS", "Marketing & Sales", "Marketing and sales", "#06b6d4"),
    ("SGS", "Strategy & Planning", "Strategy and planning", "#f59e0b"),
    ("BMS", "Governance & Compliance", "Governance and compliance", "#10b981"),
    ("IT", "IT Operations", "Information technology", "#8b5cf6"),
];

// (person_id, name, role, department)
const PERSONS: [(&str, &str, &str, &str); 7] = [
    ("P1", "Director", "Executive", "Management"),
    ("P2", "MDS Head", "DeptHead", "MDS"),
    ("P3", "SGS Head", "DeptHead", "SGS"),
    ("P4", "BMS Head", "DeptHead", "BMS"),
    ("P5", "IT Head", "DeptHead", "IT"),
    ("P6", "MDS Officer", "Staff", "MDS"),
    ("P7", "SGS Officer", "Staff", "SGS"),
];

// (kpi_id, name, dept_id, unit, target_direction)
const KPIS: [(&str, &str, &str, &str, &str); 12] = [
    ("MDS_K1", "Lead Volume", "MDS", "leads", "higher_is_better"),
    ("MDS_K2", "Conversion Rate", "MDS", "%", "higher_is_better"),
    ("MDS_K3", "Pipeline Value", "MDS", "MB", "higher_is_better"),
    ("SGS_K1", "Strategy Progress", "SGS", "%", "higher_is_better"),
    ("SGS_K2", "Risk Score", "SGS", "score", "lower_is_better"),
    ("SGS_K3", "Budget Utilization", "SGS", "%", "higher_is_better"),
    ("BMS_K1", "Compliance Score", "BMS", "%", "higher_is_better"),
    ("BMS_K2", "Action Closure Rate", "BMS", "%", "higher_is_better"),
    ("BMS_K3", "Audit Findings", "BMS", "items", "lower_is_better"),
    ("IT_K1", "System Uptime", "IT", "%", "higher_is_better"),
    ("IT_K2", "Incident Count", "IT", "incidents", "lower_is_better"),
    ("IT_K3", "MTTR", "IT", "hours", "lower_is_better"),
];

// (dept_id, title, type, priority, status, progress, risk, start offset, due offset)
const WORK_ITEMS: [(&str, &str, &str, &str, &str, i64, &str, i64, i64); 5] = [
    ("MDS", "Q1 Campaign Development", "Project", "High", "In Progress", 65, "Medium", -30, 15),
    ("MDS", "Lead Generation Automation", "Project", "High", "In Progress", 40, "Low", -14, 30),
    ("SGS", "Strategic Plan Review 2025", "Project", "Critical", "At Risk", 30, "High", -45, 5),
    ("BMS", "Close Audit Findings", "Improvement", "High", "In Progress", 75, "Medium", -20, 10),
    ("IT", "Database Migration", "Project", "High", "Planned", 10, "High", 0, 60),
];

// (username, role, dept_id, person_id)
const USERS: [(&str, &str, Option<&str>, &str); 7] = [
    ("admin", "Admin", None, "P1"),
    ("executive", "Executive", None, "P1"),
    ("mds_head", "DeptHead", Some("MDS"), "P2"),
    ("sgs_head", "DeptHead", Some("SGS"), "P3"),
    ("bms_head", "DeptHead", Some("BMS"), "P4"),
    ("it_head", "DeptHead", Some("IT"), "P5"),
    ("mds_staff", "Staff", Some("MDS"), "P6"),
];

/// Builds every demo table for `config`, in `DEMO_TABLE_NAMES` order.
pub fn demo_tables(config: &SeedConfig) -> Result<Vec<(&'static str, Table)>, SeedError> {
    let anchor = config.anchor_date;
    let created_ts = format!("{anchor}T00:00:00");

    Ok(vec![
        dim_date(anchor)?,
        dim_department()?,
        dim_person()?,
        dim_kpi()?,
        fact_kpi_data(config, &created_ts)?,
        fact_work_item(anchor, &created_ts)?,
        dim_user()?,
    ])
}

fn build(
    name: &'static str,
    columns: &[(&str, ColumnType)],
    rows: Vec<Vec<CellValue>>,
) -> Result<(&'static str, Table), SeedError> {
    let columns = columns
        .iter()
        .map(|(column, kind)| Column::new(*column, *kind))
        .collect();
    Table::try_new(columns, rows)
        .map(|table| (name, table))
        .map_err(|source| SeedError::Table {
            table: name,
            source,
        })
}

fn dim_date(anchor: NaiveDate) -> Result<(&'static str, Table), SeedError> {
    let start = anchor
        .checked_sub_days(Days::new(CALENDAR_DAYS_BACK))
        .ok_or(SeedError::DateOutOfRange(anchor))?;
    let end = anchor
        .checked_add_days(Days::new(CALENDAR_DAYS_AHEAD))
        .ok_or(SeedError::DateOutOfRange(anchor))?;

    let rows = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| {
            vec![
                CellValue::Integer(date_id(day)),
                CellValue::Text(day.to_string()),
                CellValue::Integer(i64::from(day.month())),
                CellValue::Integer(i64::from((day.month() - 1) / 3 + 1)),
                CellValue::Integer(i64::from(day.year())),
                CellValue::Integer(i64::from(day.iso_week().week())),
            ]
        })
        .collect();

    build(
        "dim_date",
        &[
            ("date_id", ColumnType::Integer),
            ("date", ColumnType::Text),
            ("month", ColumnType::Integer),
            ("quarter", ColumnType::Integer),
            ("year", ColumnType::Integer),
            ("week", ColumnType::Integer),
        ],
        rows,
    )
}

fn dim_department() -> Result<(&'static str, Table), SeedError> {
    let rows = DEPARTMENTS
        .iter()
        .map(|(id, name, description, color)| {
            vec![
                CellValue::from(*id),
                CellValue::from(*name),
                CellValue::from(*id),
                CellValue::from(*description),
                CellValue::from(*color),
            ]
        })
        .collect();

    build(
        "dim_department",
        &[
            ("dept_id", ColumnType::Text),
            ("dept_name", ColumnType::Text),
            ("dept_code", ColumnType::Text),
            ("description", ColumnType::Text),
            ("color", ColumnType::Text),
        ],
        rows,
    )
}

fn dim_person() -> Result<(&'static str, Table), SeedError> {
    let rows = PERSONS
        .iter()
        .map(|(id, name, role, department)| {
            vec![
                CellValue::from(*id),
                CellValue::from(*name),
                CellValue::from(*role),
                CellValue::from(*department),
            ]
        })
        .collect();

    build(
        "dim_person",
        &[
            ("person_id", ColumnType::Text),
            ("person_name", ColumnType::Text),
            ("role", ColumnType::Text),
            ("department", ColumnType::Text),
        ],
        rows,
    )
}

fn dim_kpi() -> Result<(&'static str, Table), SeedError> {
    let rows = KPIS
        .iter()
        .map(|(id, name, dept, unit, direction)| {
            vec![
                CellValue::from(*id),
                CellValue::from(*name),
                CellValue::from(*dept),
                CellValue::from(*unit),
                CellValue::from(*direction),
            ]
        })
        .collect();

    build(
        "dim_kpi",
        &[
            ("kpi_id", ColumnType::Text),
            ("kpi_name", ColumnType::Text),
            ("dept_id", ColumnType::Text),
            ("unit", ColumnType::Text),
            ("target_direction", ColumnType::Text),
        ],
        rows,
    )
}

fn fact_kpi_data(
    config: &SeedConfig,
    created_ts: &str,
) -> Result<(&'static str, Table), SeedError> {
    let days = config.history_days;
    if days > MAX_HISTORY_DAYS {
        return Err(SeedError::HistoryTooLong(days));
    }
    let mut rng = StdRng::seed_from_u64(config.rng_seed);
    let mut rows = Vec::with_capacity(days as usize * KPIS.len());

    for index in 0..days {
        let day = config
            .anchor_date
            .checked_sub_days(Days::new(u64::from(days - 1 - index)))
            .ok_or(SeedError::DateOutOfRange(config.anchor_date))?;
        let day_id = date_id(day);

        for (kpi_id, _, dept_id, _, _) in KPIS {
            let (actual, target) = kpi_reading(kpi_id, f64::from(index), &mut rng);
            rows.push(vec![
                CellValue::Text(deterministic_id("KPI", &format!("{day_id}:{kpi_id}"))),
                CellValue::Integer(day_id),
                CellValue::from(dept_id),
                CellValue::from(kpi_id),
                CellValue::Float(actual),
                CellValue::Float(target),
                CellValue::from(created_ts),
            ]);
        }
    }

    build(
        "fact_kpi_data",
        &[
            ("record_id", ColumnType::Text),
            ("date_id", ColumnType::Integer),
            ("dept_id", ColumnType::Text),
            ("kpi_id", ColumnType::Text),
            ("actual_value", ColumnType::Float),
            ("target_value", ColumnType::Float),
            ("created_ts", ColumnType::Text),
        ],
        rows,
    )
}

/// Returns `(actual, target)` for one KPI on day `day` of the history window.
fn kpi_reading(kpi_id: &str, day: f64, rng: &mut StdRng) -> (f64, f64) {
    match kpi_id {
        "MDS_K1" => (f64::from(rng.random_range(80..=150_i32)) + day * 0.3, 100.0),
        "MDS_K2" => (rng.random_range(15.0..30.0), 25.0),
        "MDS_K3" => (rng.random_range(50.0..100.0) + day * 0.5, 80.0),
        "SGS_K1" => ((45.0 + day * 0.5 + rng.random_range(-5.0..5.0)).min(100.0), 80.0),
        "SGS_K2" => ((70.0 - day * 0.2 + rng.random_range(-5.0..5.0)).max(20.0), 40.0),
        "SGS_K3" => ((30.0 + day * 0.4 + rng.random_range(-3.0..3.0)).min(95.0), 75.0),
        "BMS_K1" => ((85.0 + day * 0.1 + rng.random_range(-2.0..2.0)).min(99.0), 95.0),
        "BMS_K2" => (rng.random_range(70.0..95.0), 90.0),
        "BMS_K3" => ((15.0 - day * 0.1 + rng.random_range(-2.0..2.0)).max(2.0), 5.0),
        "IT_K1" => (rng.random_range(99.0..99.99), 99.5),
        "IT_K2" => (f64::from(rng.random_range(0..=5_i32)), 2.0),
        "IT_K3" => (rng.random_range(0.5..4.0), 2.0),
        _ => (0.0, 0.0),
    }
}

fn fact_work_item(
    anchor: NaiveDate,
    created_ts: &str,
) -> Result<(&'static str, Table), SeedError> {
    let mut rows = Vec::with_capacity(WORK_ITEMS.len());
    for (dept_id, title, work_type, priority, status, progress, risk, start, due) in WORK_ITEMS {
        rows.push(vec![
            CellValue::Text(deterministic_id("W", title)),
            CellValue::from(dept_id),
            CellValue::from(title),
            CellValue::from(work_type),
            CellValue::from(priority),
            CellValue::from(status),
            CellValue::Integer(progress),
            CellValue::from(risk),
            CellValue::Integer(date_id(offset_date(anchor, start)?)),
            CellValue::Integer(date_id(offset_date(anchor, due)?)),
            CellValue::from(created_ts),
            CellValue::from(created_ts),
        ]);
    }

    build(
        "fact_work_item",
        &[
            ("work_id", ColumnType::Text),
            ("dept_id", ColumnType::Text),
            ("work_title", ColumnType::Text),
            ("work_type", ColumnType::Text),
            ("priority", ColumnType::Text),
            ("status", ColumnType::Text),
            ("progress_percent", ColumnType::Integer),
            ("risk_level", ColumnType::Text),
            ("start_date_id", ColumnType::Integer),
            ("due_date_id", ColumnType::Integer),
            ("created_ts", ColumnType::Text),
            ("updated_ts", ColumnType::Text),
        ],
        rows,
    )
}

fn dim_user() -> Result<(&'static str, Table), SeedError> {
    let password_hash = hex::encode(Sha256::digest(DEMO_PASSWORD.as_bytes()));
    let rows = USERS
        .iter()
        .map(|(username, role, dept_id, person_id)| {
            vec![
                CellValue::from(*username),
                CellValue::from(password_hash.as_str()),
                CellValue::from(*role),
                CellValue::from(*dept_id),
                CellValue::from(*person_id),
                CellValue::Integer(1),
            ]
        })
        .collect();

    build(
        "dim_user",
        &[
            ("username", ColumnType::Text),
            ("password_hash", ColumnType::Text),
            ("role", ColumnType::Text),
            ("dept_id", ColumnType::Text),
            ("person_id", ColumnType::Text),
            ("is_enabled", ColumnType::Integer),
        ],
        rows,
    )
}

fn offset_date(anchor: NaiveDate, offset: i64) -> Result<NaiveDate, SeedError> {
    let days = Days::new(offset.unsigned_abs());
    let shifted = if offset < 0 {
        anchor.checked_sub_days(days)
    } else {
        anchor.checked_add_days(days)
    };
    shifted.ok_or(SeedError::DateOutOfRange(anchor))
}

/// `YYYYMMDD` as an integer key.
fn date_id(day: NaiveDate) -> i64 {
    i64::from(day.year()) * 10_000 + i64::from(day.month()) * 100 + i64::from(day.day())
}

/// `<prefix>_<10 hex chars>` derived from `key`, stable across runs.
fn deterministic_id(prefix: &str, key: &str) -> String {
    let digest = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
        .simple()
        .to_string();
    format!("{prefix}_{}", &digest[..10])
}

#[cfg(test)]
mod tests {
    use super::{date_id, demo_tables, deterministic_id, DEMO_TABLE_NAMES};
    use crate::model::value::CellValue;
    use crate::seed::{SeedConfig, SeedError, MAX_HISTORY_DAYS};
    use chrono::NaiveDate;

    #[test]
    fn builds_tables_in_declared_order() {
        let tables = demo_tables(&SeedConfig::default()).expect("demo tables");
        let names: Vec<&str> = tables.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, DEMO_TABLE_NAMES.to_vec());
    }

    #[test]
    fn kpi_history_has_twelve_readings_per_day() {
        let config = SeedConfig {
            history_days: 3,
            ..SeedConfig::default()
        };
        let tables = demo_tables(&config).expect("demo tables");
        let (_, facts) = tables
            .iter()
            .find(|(name, _)| *name == "fact_kpi_data")
            .expect("fact table");
        assert_eq!(facts.row_count(), 36);

        let last_day = facts.row(35).expect("last row");
        assert_eq!(last_day.get("date_id"), Some(&CellValue::Integer(20250101)));
    }

    #[test]
    fn history_beyond_limit_is_rejected_before_building() {
        let config = SeedConfig {
            history_days: u32::MAX,
            ..SeedConfig::default()
        };
        assert_eq!(
            demo_tables(&config),
            Err(SeedError::HistoryTooLong(u32::MAX))
        );

        let config = SeedConfig {
            history_days: MAX_HISTORY_DAYS,
            ..SeedConfig::default()
        };
        let tables = demo_tables(&config).expect("limit itself is accepted");
        assert_eq!(tables[4].1.row_count(), MAX_HISTORY_DAYS as usize * 12);
    }

    #[test]
    fn calendar_spans_year_back_and_quarter_ahead() {
        let tables = demo_tables(&SeedConfig::default()).expect("demo tables");
        let (_, calendar) = &tables[0];
        // 2024 is a leap year: 365 days back, the anchor, 90 days ahead.
        assert_eq!(calendar.row_count(), 456);
        assert_eq!(
            calendar.row(0).and_then(|row| row.get("date_id").cloned()),
            Some(CellValue::Integer(20240102))
        );
    }

    #[test]
    fn same_config_yields_identical_tables() {
        let first = demo_tables(&SeedConfig::default()).expect("first build");
        let second = demo_tables(&SeedConfig::default()).expect("second build");
        assert_eq!(first, second);
    }

    #[test]
    fn ids_are_stable_and_prefixed() {
        let id = deterministic_id("KPI", "20250101:MDS_K1");
        assert_eq!(id, deterministic_id("KPI", "20250101:MDS_K1"));
        assert!(id.starts_with("KPI_"));
        assert_eq!(id.len(), 14);
        assert_eq!(
            date_id(NaiveDate::from_ymd_opt(2024, 2, 29).expect("date")),
            20240229
        );
    }
}
