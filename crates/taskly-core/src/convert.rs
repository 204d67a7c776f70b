// ── Wire ↔ domain conversions ──

use taskly_api::{TaskRecord, TaskUpdate};

use crate::model::{Task, TaskId, TaskPatch};

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: TaskId::from(record.id),
            title: record.title,
            description: record.description,
            is_completed: record.is_completed,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<TaskPatch> for TaskUpdate {
    fn from(patch: TaskPatch) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            is_completed: patch.is_completed,
        }
    }
}
