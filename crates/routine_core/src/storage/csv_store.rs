use crate::config;
use crate::error::AppError;
use crate::model::Task;
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const HEADER: [&str; 5] = ["id", "descricao", "data", "status", "data_conclusao"];
const STORE_FILE_NAME: &str = "rotinas_diarias.csv";
const STORE_ENV_VAR: &str = "ROUTINE_STORE_PATH";

/// Resolves the data file using the on-disk configuration.
pub fn store_path() -> Result<PathBuf, AppError> {
    let configured = config::load_config_with_fallback().config.store_path;
    resolve_store_path(configured.as_deref())
}

/// `ROUTINE_STORE_PATH` wins over `configured`, which wins over the per-user
/// default location.
pub fn resolve_store_path(configured: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    Ok(config::app_dir()?.join(STORE_FILE_NAME))
}

fn csv_error(err: csv::Error) -> AppError {
    if err.is_io_error() {
        AppError::io(err.to_string())
    } else {
        AppError::invalid_data(err.to_string())
    }
}

/// Reads every row of the table. A missing file is an empty store; any bad
/// row fails the whole load.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        debug!("no task file at {}, starting empty", path.display());
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut tasks = Vec::new();
    let mut seen_ids = HashSet::new();
    for (index, row) in reader.deserialize::<Task>().enumerate() {
        let task = row.map_err(csv_error)?;
        let line = index + 2;

        if task.id == 0 {
            return Err(AppError::invalid_data(format!(
                "line {line}: id must be positive"
            )));
        }
        if task.description.trim().is_empty() {
            return Err(AppError::invalid_data(format!(
                "line {line}: description is empty"
            )));
        }
        if !task.is_consistent() {
            return Err(AppError::invalid_data(format!(
                "line {line}: completion date does not match status"
            )));
        }
        if !seen_ids.insert(task.id) {
            return Err(AppError::invalid_data(format!(
                "line {line}: duplicate id {}",
                task.id
            )));
        }

        tasks.push(task);
    }

    debug!("loaded {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

/// Rewrites the whole file: header first, then one row per task. Tasks that
/// could not be read back unchanged are refused before anything is written.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(task) = tasks.iter().find(|task| !task.is_consistent()) {
        return Err(AppError::invalid_data(format!(
            "task {}: completion date does not match status",
            task.id
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;
    writer.write_record(HEADER).map_err(csv_error)?;
    for task in tasks {
        writer.serialize(task).map_err(csv_error)?;
    }
    writer.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    debug!("saved {} tasks to {}", tasks.len(), path.display());
    Ok(())
}
