use crate::dates;
use crate::error::AppError;
use crate::model::{Task, TaskStatus};
use crate::storage::csv_store;
use log::info;
use std::path::{Path, PathBuf};

/// The in-memory task list together with the file it is mirrored to.
///
/// Every mutation rewrites the whole file. When a write fails the mutation
/// stays in memory and [`TaskStore::save`] can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    path: Option<PathBuf>,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, AppError> {
        let path = path.into();
        let tasks = csv_store::load_tasks(&path)?;
        Ok(Self {
            path: Some(path),
            tasks,
        })
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            tasks: Vec::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// One past the largest id currently stored.
    pub fn next_id(&self) -> Result<u32, AppError> {
        let max = self.tasks.iter().map(|task| task.id).max().unwrap_or(0);
        max.checked_add(1)
            .ok_or_else(|| AppError::invalid_data("task ids exhausted"))
    }

    pub fn add(&mut self, description: &str, date: &str) -> Result<Task, AppError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("description is required"));
        }
        let date = dates::parse_date(date)?;

        let task = Task {
            id: self.next_id()?,
            description: trimmed.to_string(),
            date,
            status: TaskStatus::Pending,
            completion_date: None,
        };

        self.tasks.push(task.clone());
        info!("added task {} for {}", task.id, task.date);
        self.save()?;

        Ok(task)
    }

    pub fn complete(&mut self, id: u32) -> Result<Task, AppError> {
        let today = dates::today()?;
        self.complete_on(id, &today)
    }

    /// Marks the task completed on `today`. Completing an already completed
    /// task changes nothing and does not touch the file.
    pub fn complete_on(&mut self, id: u32, today: &str) -> Result<Task, AppError> {
        let today = dates::parse_date(today)?;
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::invalid_input("task not found"))?;

        if task.status == TaskStatus::Completed {
            return Ok(task.clone());
        }

        task.status = TaskStatus::Completed;
        task.completion_date = Some(today);
        let updated = task.clone();

        info!("completed task {id}");
        self.save()?;

        Ok(updated)
    }

    /// Removes the task if present. An unknown id is not an error.
    pub fn delete(&mut self, id: u32) -> Result<Option<Task>, AppError> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(None);
        };

        let removed = self.tasks.remove(index);
        info!("deleted task {id}");
        self.save()?;

        Ok(Some(removed))
    }

    pub fn save(&self) -> Result<(), AppError> {
        match self.path.as_deref() {
            Some(path) => csv_store::save_tasks(path, &self.tasks),
            None => Ok(()),
        }
    }
}
