//! Domain models for the CRM
//!
//! Contains the records, their identifiers, events and reports without any
//! I/O concerns.

mod id;
mod customer;
mod communication;
mod task;
mod event;
pub mod report;

pub use id::{format_date, EntityId, EntityKind, DATE_FORMAT};
pub use customer::{Customer, NewCustomer};
pub use communication::{Communication, CommunicationType, InvalidCommunicationType, NewCommunication};
pub use task::{InvalidTaskStatus, NewTask, Task, TaskStatus};
pub use event::{Event, Listener};
