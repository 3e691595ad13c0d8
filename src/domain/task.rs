//! Task domain model
//!
//! Tasks are follow-up work items attached to a customer. Status is the only
//! field that changes after creation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::{format_date, EntityId, EntityKind};

#[derive(Debug, Error, PartialEq)]
#[error("Invalid task status: '{0}' (expected PENDING, COMPLETED or OVERDUE)")]
pub struct InvalidTaskStatus(pub String);

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Overdue,
}

impl TaskStatus {
    /// All statuses in declaration order
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::Completed,
        TaskStatus::Overdue,
    ];

    /// Canonical (uppercase) name as stored on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Overdue => "OVERDUE",
        }
    }

    /// Returns true if this task still awaits work
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidTaskStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidTaskStatus(s.to_string()))
    }
}

/// Fields supplied by the caller when creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub customer_id: EntityId,
    pub title: String,
    pub description: String,
    /// Free-form; not validated as a calendar date
    pub due_date: String,
    pub assigned_to: String,
}

/// A task attached to a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (`TASK_...`)
    pub id: EntityId,

    /// Customer this task belongs to (not validated)
    pub customer_id: EntityId,

    pub title: String,
    pub description: String,
    pub due_date: String,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created (`YYYY-MM-DD HH:MM:SS`)
    pub created_date: String,

    pub assigned_to: String,
}

impl Task {
    /// Creates a pending task with a fresh ID and creation date stamped from `at`
    pub fn new(params: NewTask, at: NaiveDateTime) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Task, at),
            customer_id: params.customer_id,
            title: params.title,
            description: params.description,
            due_date: params.due_date,
            status: TaskStatus::Pending,
            created_date: format_date(at),
            assigned_to: params.assigned_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_task() -> Task {
        let at = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        Task::new(
            NewTask {
                customer_id: EntityId::from("CUST_20241231080000"),
                title: "Send proposal".to_string(),
                description: "Pricing for Q1".to_string(),
                due_date: "2025-01-01".to_string(),
                assigned_to: "admin".to_string(),
            },
            at,
        )
    }

    #[test]
    fn new_task_is_pending() {
        let task = make_task();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.status.is_pending());
        assert_eq!(task.id.as_str(), "TASK_20241231081500");
        assert_eq!(task.created_date, "2024-12-31 08:15:00");
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!("pending".parse(), Ok(TaskStatus::Pending));
        assert_eq!("Completed".parse(), Ok(TaskStatus::Completed));
        assert_eq!("OVERDUE".parse(), Ok(TaskStatus::Overdue));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn status_display_is_canonical() {
        assert_eq!(TaskStatus::Overdue.to_string(), "OVERDUE");
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }
}
