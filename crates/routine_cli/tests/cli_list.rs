use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("routine-{nanos}-{file_name}"))
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_routine");
    Command::new(exe)
        .args(args)
        .env("ROUTINE_STORE_PATH", store_path)
        .env("ROUTINE_CONFIG_PATH", store_path.with_extension("config.json"))
        .output()
        .expect("failed to run routine")
}

const HEADER: &str = "id,descricao,data,status,data_conclusao";

fn write_store(path: &Path, rows: &[&str]) {
    let mut content = format!("{HEADER}\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(path, content).unwrap();
}

fn seeded(file_name: &str) -> PathBuf {
    let path = temp_path(file_name);
    write_store(
        &path,
        &[
            "1,stretch,2025-06-01,Concluída,2025-06-01",
            "2,read,2025-06-01,Concluída,2025-06-02",
            "3,walk,2025-06-01,Pendente,",
            "4,cook,2025-06-02,Pendente,",
        ],
    );
    path
}

#[test]
fn list_command_shows_day_and_stats() {
    let store_path = seeded("cli-list.csv");
    let output = run(&store_path, &["list", "--date", "2025-06-01"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stretch"));
    assert!(stdout.contains("walk"));
    assert!(!stdout.contains("cook"));
    assert!(stdout.contains("Total: 3 | Completed: 2 | Pending: 1 | Completion: 66.7%"));
}

#[test]
fn list_command_json_keeps_store_order() {
    let store_path = seeded("cli-list-json.csv");
    let output = run(&store_path, &["list", "--date", "2025-06-01", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<u64> = listing["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|task| task["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(listing["stats"]["completion_percentage"], 66.7);
}

#[test]
fn list_command_empty_day_reports_zero() {
    let store_path = seeded("cli-list-empty.csv");
    let output = run(&store_path, &["list", "--date", "2025-07-01"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks for 2025-07-01."));
    assert!(stdout.contains("Completion: 0.0%"));
}

#[test]
fn list_command_rejects_malformed_date() {
    let store_path = seeded("cli-list-bad.csv");
    let output = run(&store_path, &["list", "--date", "2025-06-1"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn list_command_without_store_file_is_empty() {
    let store_path = temp_path("cli-list-missing.csv");
    let output = run(&store_path, &["list"]);

    assert!(output.status.success());
    assert!(!store_path.exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total: 0"));
}

#[test]
fn stats_command_lists_newest_first() {
    let store_path = seeded("cli-stats.csv");
    let output = run(&store_path, &["stats"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["2025-06-02: 0/1 (0.0%)", "2025-06-01: 2/3 (66.7%)"]
    );
}

#[test]
fn chart_command_orders_oldest_first() {
    let store_path = seeded("cli-chart.csv");
    let output = run(&store_path, &["chart", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let chart: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(chart["overall"]["total"], 4);
    assert_eq!(chart["overall"]["completed"], 2);
    assert_eq!(chart["series"][0]["date"], "2025-06-01");
    assert_eq!(chart["series"][1]["date"], "2025-06-02");
}

#[test]
fn chart_command_respects_day_limit_override() {
    let store_path = seeded("cli-chart-days.csv");
    let output = run(
        &store_path,
        &["chart", "--json", "--config-override", "chart_days=1"],
    );
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let chart: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let series = chart["series"].as_array().expect("series array");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["date"], "2025-06-02");
}

#[test]
fn chart_command_without_tasks() {
    let store_path = temp_path("cli-chart-empty.csv");
    let output = run(&store_path, &["chart"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks."));
}

#[test]
fn config_file_store_path_is_used() {
    let store_path = seeded("cli-config-store.csv");
    let config_path = temp_path("cli-config.json");
    std::fs::write(
        &config_path,
        serde_json::json!({ "store_path": store_path }).to_string(),
    )
    .unwrap();

    let exe = env!("CARGO_BIN_EXE_routine");
    let output = Command::new(exe)
        .args(["stats"])
        .env_remove("ROUTINE_STORE_PATH")
        .env("ROUTINE_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run routine");
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2025-06-01: 2/3 (66.7%)"));
}

#[test]
fn unknown_config_override_is_rejected() {
    let store_path = seeded("cli-bad-override.csv");
    let output = run(&store_path, &["stats", "--config-override", "colour=red"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - unknown config field 'colour'"));
}
