use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use cpm_core::{
    DatedPlan, Dependency, ProjectFileError, StoreError, TaskStore, load_store_from_json,
    save_plan_to_csv, save_plan_to_json, save_store_to_json,
};
use std::fs;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 14, 30, 0).unwrap()
}

fn build_sample_store() -> TaskStore {
    let mut store = TaskStore::new();
    store.create_task_at("Design", Some(1), at(2025, 1, 6)).unwrap();
    store.create_task_at("Build", Some(4), at(2025, 1, 6)).unwrap();
    store.create_task_at("Docs", Some(1), at(2025, 1, 7)).unwrap();
    store.create_task_at("Release", Some(1), at(2025, 1, 8)).unwrap();
    store.add_dependency(1, 2).unwrap();
    store.add_dependency(1, 3).unwrap();
    store.add_dependency(2, 4).unwrap();
    store.add_dependency(3, 4).unwrap();
    store
}

#[test]
fn json_round_trip_preserves_store() {
    let store = build_sample_store();
    let file = NamedTempFile::new().unwrap();

    save_store_to_json(&store, file.path()).unwrap();
    let mut loaded = load_store_from_json(file.path()).unwrap();

    assert_eq!(loaded.list_tasks(), store.list_tasks());
    assert_eq!(loaded.dependencies(), store.dependencies());
    assert_eq!(
        loaded.schedule().unwrap(),
        store.schedule().unwrap()
    );
    // Loaded stores keep allocating after the highest saved id.
    let next = loaded.create_task_at("Retro", None, at(2025, 1, 9)).unwrap();
    assert_eq!(next.id, 5);
    assert_eq!(next.duration_days, 1);
}

#[test]
fn loading_a_cyclic_file_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let mut snapshot = build_sample_store().snapshot();
    snapshot.dependencies.push(Dependency::new(4, 1));
    fs::write(file.path(), serde_json::to_vec(&snapshot).unwrap()).unwrap();

    match load_store_from_json(file.path()) {
        Err(ProjectFileError::InvalidData(StoreError::WouldCreateCycle(dep))) => {
            assert_eq!(dep, Dependency::new(4, 1));
        }
        other => panic!("expected cycle rejection, got {other:?}"),
    }
}

#[test]
fn loading_malformed_json_reports_serialization_error() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), b"{ not json").unwrap();
    assert!(matches!(
        load_store_from_json(file.path()),
        Err(ProjectFileError::Serialization(_))
    ));
}

#[test]
fn plan_json_export_uses_calendar_dates() {
    let store = build_sample_store();
    let plan = store.plan(None).unwrap();
    assert_eq!(plan.project_start_date, d(2025, 1, 6));
    assert_eq!(plan.project_finish_date, d(2025, 1, 12));

    let file = NamedTempFile::new().unwrap();
    save_plan_to_json(&plan, file.path()).unwrap();
    let raw = fs::read_to_string(file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["project_start_date"], "2025-01-06");
    assert_eq!(value["tasks"][2]["latest_start_date"], "2025-01-10");

    let reparsed: DatedPlan = serde_json::from_str(&raw).unwrap();
    assert_eq!(reparsed, plan);
}

#[test]
fn plan_csv_export_has_one_row_per_task() {
    let store = build_sample_store();
    let plan = store.plan(Some(d(2025, 3, 3))).unwrap();
    let file = NamedTempFile::new().unwrap();

    save_plan_to_csv(&plan, file.path()).unwrap();
    let raw = fs::read_to_string(file.path()).unwrap();
    let mut lines = raw.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,title,duration_days,earliest_start,earliest_finish,latest_start,latest_finish,slack_days,is_critical"
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[2],
        "3,Docs,1,2025-03-04,2025-03-05,2025-03-07,2025-03-08,3,false"
    );
    assert_eq!(
        rows[3],
        "4,Release,1,2025-03-08,2025-03-09,2025-03-08,2025-03-09,0,true"
    );
}
