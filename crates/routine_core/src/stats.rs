//! Read-only queries over a task list: per-day filtering and completion
//! counts for the statistics report and the chart.

use crate::model::Task;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_CHART_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    pub total: usize,
    pub completed: usize,
}

impl DayTotals {
    pub fn pending(&self) -> usize {
        self.total - self.completed
    }

    /// Completion rate in percent, rounded to one decimal with ties to even.
    /// Zero when empty.
    pub fn percentage(&self) -> f64 {
        percentage(self.completed, self.total)
    }

    fn record(&mut self, task: &Task) {
        self.total += 1;
        if task.is_completed() {
            self.completed += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_percentage: f64,
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }

    // Tenths of a percent, computed exactly so halves can round to even.
    let numerator = part as u128 * 1000;
    let whole = whole as u128;
    let mut tenths = numerator / whole;
    let twice_remainder = 2 * (numerator % whole);
    if twice_remainder > whole || (twice_remainder == whole && tenths % 2 == 1) {
        tenths += 1;
    }
    tenths as f64 / 10.0
}

/// Tasks whose date is exactly `date`, in store order.
pub fn filter_by_date<'a>(tasks: &'a [Task], date: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|task| task.date == date).collect()
}

pub fn day_stats(tasks: &[Task], date: &str) -> DayStats {
    let mut totals = DayTotals::default();
    for task in filter_by_date(tasks, date) {
        totals.record(task);
    }

    DayStats {
        total: totals.total,
        completed: totals.completed,
        pending: totals.pending(),
        completion_percentage: totals.percentage(),
    }
}

pub fn overall_stats(tasks: &[Task]) -> DayTotals {
    let mut totals = DayTotals::default();
    for task in tasks {
        totals.record(task);
    }
    totals
}

pub fn history_stats(tasks: &[Task]) -> BTreeMap<String, DayTotals> {
    let mut history: BTreeMap<String, DayTotals> = BTreeMap::new();
    for task in tasks {
        history.entry(task.date.clone()).or_default().record(task);
    }
    history
}

/// Per-day totals, newest date first.
pub fn history_report(tasks: &[Task]) -> Vec<(String, DayTotals)> {
    history_stats(tasks).into_iter().rev().collect()
}

/// Per-day totals for the most recent `days` dates, oldest first.
pub fn chart_series(tasks: &[Task], days: usize) -> Vec<(String, DayTotals)> {
    let history = history_stats(tasks);
    let skip = history.len().saturating_sub(days);
    history.into_iter().skip(skip).collect()
}
