//! Notification events
//!
//! The store fires one [`Event`] after each committed mutation. Events carry a
//! few human-readable fields, never the full entity.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::communication::CommunicationType;
use super::id::DATE_FORMAT;
use super::task::TaskStatus;

/// Something that happened in the CRM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    CustomerCreated {
        name: String,
    },
    CommunicationLogged {
        customer_name: String,
        #[serde(rename = "type")]
        kind: CommunicationType,
    },
    TaskCreated {
        title: String,
        due_date: String,
    },
    TaskStatusUpdated {
        title: String,
        status: TaskStatus,
    },
    /// Any other event, rendered generically
    Other {
        name: String,
    },
}

impl Event {
    /// Returns the event name
    pub fn name(&self) -> &str {
        match self {
            Event::CustomerCreated { .. } => "customer_created",
            Event::CommunicationLogged { .. } => "communication_logged",
            Event::TaskCreated { .. } => "task_created",
            Event::TaskStatusUpdated { .. } => "task_status_updated",
            Event::Other { name } => name,
        }
    }

    /// Returns the human-readable message for this event
    pub fn message(&self) -> String {
        match self {
            Event::CustomerCreated { name } => format!("New customer added: {}", name),
            Event::CommunicationLogged {
                customer_name,
                kind,
            } => format!("Communication logged with {}: {}", customer_name, kind),
            Event::TaskCreated { title, due_date } => {
                format!("New task created: {} (Due: {})", title, due_date)
            }
            Event::TaskStatusUpdated { title, status } => {
                format!("Task status updated: {} ({})", title, status)
            }
            Event::Other { name } => format!("System event: {}", name),
        }
    }

    /// Renders the console notification line, stamped with `at`
    pub fn render(&self, at: NaiveDateTime) -> String {
        format!("[{}] {}", at.format(DATE_FORMAT), self.message())
    }
}

/// A registered event listener
pub type Listener = Box<dyn FnMut(&Event)>;
