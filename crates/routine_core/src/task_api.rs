use crate::dates;
use crate::error::AppError;
use crate::model::Task;
use crate::stats::{self, DayStats, DayTotals};
use crate::storage::{TaskStore, csv_store};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct DayListing {
    pub date: String,
    pub tasks: Vec<Task>,
    pub stats: DayStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub overall: DayTotals,
    pub series: Vec<(String, DayTotals)>,
}

pub fn add_task(description: &str, date: Option<&str>) -> Result<Task, AppError> {
    let path = csv_store::store_path()?;
    add_task_with_path(&path, description, date)
}

pub fn complete_task(id: u32) -> Result<Task, AppError> {
    let path = csv_store::store_path()?;
    complete_task_with_path(&path, id)
}

pub fn delete_task(id: u32) -> Result<Option<Task>, AppError> {
    let path = csv_store::store_path()?;
    delete_task_with_path(&path, id)
}

pub fn get_task(id: u32) -> Result<Task, AppError> {
    let path = csv_store::store_path()?;
    get_task_with_path(&path, id)
}

pub fn list_for_date(date: &str) -> Result<DayListing, AppError> {
    let path = csv_store::store_path()?;
    list_for_date_with_path(&path, date)
}

pub fn day_summary(date: &str) -> Result<DayStats, AppError> {
    let path = csv_store::store_path()?;
    day_summary_with_path(&path, date)
}

pub fn history() -> Result<Vec<(String, DayTotals)>, AppError> {
    let path = csv_store::store_path()?;
    history_with_path(&path)
}

pub fn chart(days: usize) -> Result<ChartData, AppError> {
    let path = csv_store::store_path()?;
    chart_with_path(&path, days)
}

/// Adds a task for `date`, or for today when no date is given.
pub fn add_task_with_path(
    path: &Path,
    description: &str,
    date: Option<&str>,
) -> Result<Task, AppError> {
    if description.trim().is_empty() {
        return Err(AppError::invalid_input("description is required"));
    }

    let date = match date {
        Some(value) => dates::parse_date(value)?,
        None => dates::today()?,
    };

    let mut store = TaskStore::open(path)?;
    store.add(description, &date)
}

pub fn complete_task_with_path(path: &Path, id: u32) -> Result<Task, AppError> {
    let mut store = TaskStore::open(path)?;
    store.complete(id)
}

pub fn delete_task_with_path(path: &Path, id: u32) -> Result<Option<Task>, AppError> {
    let mut store = TaskStore::open(path)?;
    store.delete(id)
}

pub fn get_task_with_path(path: &Path, id: u32) -> Result<Task, AppError> {
    let store = TaskStore::open(path)?;
    store
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::invalid_input("task not found"))
}

pub fn list_for_date_with_path(path: &Path, date: &str) -> Result<DayListing, AppError> {
    let date = dates::parse_date(date)?;
    let store = TaskStore::open(path)?;

    let tasks = stats::filter_by_date(store.tasks(), &date)
        .into_iter()
        .cloned()
        .collect();
    let stats = stats::day_stats(store.tasks(), &date);

    Ok(DayListing { date, tasks, stats })
}

pub fn day_summary_with_path(path: &Path, date: &str) -> Result<DayStats, AppError> {
    let date = dates::parse_date(date)?;
    let store = TaskStore::open(path)?;
    Ok(stats::day_stats(store.tasks(), &date))
}

pub fn history_with_path(path: &Path) -> Result<Vec<(String, DayTotals)>, AppError> {
    let store = TaskStore::open(path)?;
    Ok(stats::history_report(store.tasks()))
}

pub fn chart_with_path(path: &Path, days: usize) -> Result<ChartData, AppError> {
    if days == 0 {
        return Err(AppError::invalid_input("chart needs at least one day"));
    }

    let store = TaskStore::open(path)?;
    Ok(ChartData {
        overall: stats::overall_stats(store.tasks()),
        series: stats::chart_series(store.tasks(), days),
    })
}
