use serde::{Deserialize, Serialize};

/// A single to-do item belonging to one calendar day.
///
/// Field names on the wire are the column names of the persisted table
/// (`id,descricao,data,status,data_conclusao`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "data")]
    pub date: String,
    pub status: TaskStatus,
    #[serde(rename = "data_conclusao", default)]
    pub completion_date: Option<String>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// A completion date is present exactly when the task is completed. An
    /// empty date is never valid; a pending task carries `None`.
    pub fn is_consistent(&self) -> bool {
        match (self.status, self.completion_date.as_deref()) {
            (TaskStatus::Pending, None) => true,
            (TaskStatus::Completed, Some(date)) => !date.is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Concluída")]
    Completed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}
