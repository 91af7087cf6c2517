//! Exercises the entry points that locate files through the environment.
//! Kept as the only test in this binary because it sets process-wide
//! environment variables.

use routine_core::config;
use routine_core::model::TaskStatus;
use routine_core::storage::csv_store;
use routine_core::task_api;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("routine-{nanos}-{file_name}"))
}

#[test]
fn api_uses_store_and_config_from_environment() {
    let store_path = temp_path("env-store.csv");
    let config_path = temp_path("env-config.json");
    std::fs::write(&config_path, "{\"theme\": \"dark\", \"chart_days\": 2}").unwrap();

    // SAFETY: this binary runs a single test, so no other thread reads the
    // environment concurrently.
    unsafe {
        std::env::set_var("ROUTINE_STORE_PATH", &store_path);
        std::env::set_var("ROUTINE_CONFIG_PATH", &config_path);
    }

    let loaded_config = config::load_config().unwrap();
    assert_eq!(loaded_config.theme.as_deref(), Some("noir"));
    assert_eq!(loaded_config.chart_days, 2);
    assert_eq!(csv_store::store_path().unwrap(), store_path);

    let first = task_api::add_task("Buy milk", Some("2025-06-01")).unwrap();
    let second = task_api::add_task("Call mom", Some("2025-06-01")).unwrap();
    task_api::add_task("Read", Some("2025-06-02")).unwrap();
    assert_eq!((first.id, second.id), (1, 2));

    let completed = task_api::complete_task(1).unwrap();
    assert_eq!(completed.status, TaskStatus::Completed);

    let listing = task_api::list_for_date("2025-06-01").unwrap();
    let ids: Vec<u32> = listing.tasks.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(listing.stats.completion_percentage, 50.0);

    let summary = task_api::day_summary("2025-06-02").unwrap();
    assert_eq!((summary.total, summary.completed), (1, 0));

    assert_eq!(task_api::get_task(2).unwrap().description, "Call mom");

    let history = task_api::history().unwrap();
    assert_eq!(history[0].0, "2025-06-02");

    let chart = task_api::chart(loaded_config.chart_days).unwrap();
    assert_eq!(chart.overall.total, 3);
    assert_eq!(chart.series.len(), 2);

    let removed = task_api::delete_task(2).unwrap();
    assert_eq!(removed.map(|task| task.id), Some(2));
    assert_eq!(task_api::delete_task(2).unwrap(), None);

    let remaining = csv_store::load_tasks(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert_eq!(remaining.len(), 2);
}
