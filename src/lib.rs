//! CRM CLI - Customer relationship management backed by CSV files
//!
//! Tracks customers, the communications logged with them and follow-up
//! tasks. Records live in three CSV tables inside a data directory; every
//! mutation rewrites the affected table.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    Communication, CommunicationType, Customer, EntityId, EntityKind, Event, Task, TaskStatus,
};
pub use storage::{Config, CrmStore};
