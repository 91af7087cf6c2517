//! Daily routine tracking: dated to-do items kept in a flat CSV file, with
//! per-day completion statistics.

pub mod config;
pub mod dates;
pub mod error;
pub mod model;
pub mod stats;
pub mod storage;
pub mod task_api;

pub use error::AppError;
pub use model::{Task, TaskStatus};
pub use storage::TaskStore;
