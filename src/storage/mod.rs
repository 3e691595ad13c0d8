//! # Storage Layer
//!
//! Persistence layer for the CRM with plain CSV files.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Customers | CSV, header + one row per customer | `<data_dir>/customers.csv` |
//! | Communications | CSV | `<data_dir>/communications.csv` |
//! | Tasks | CSV | `<data_dir>/tasks.csv` |
//! | Config | TOML | `~/.config/crm-cli/config.toml` |
//!
//! ## Persistence Model
//!
//! - Tables are loaded into memory once, when [`CrmStore`] opens
//! - Every mutation rewrites the affected table in full
//! - Writes go to a locked temp file (`fs2`) which is renamed into place
//! - A failed write undoes the in-memory change
//!
//! ## Key Types
//!
//! - [`CrmStore`] - In-memory data set with create/query/update operations
//! - [`CsvTable`] - Read/write one entity type as CSV
//! - [`Config`] - User configuration

mod csv;
mod record;
mod table;
mod config;
mod crm;

pub use csv::{format_line, parse_line, split_records};
pub use record::{CsvRecord, RecordError};
pub use table::CsvTable;
pub use config::{Config, ConfigError, OutputFormat};
pub use crm::{CrmStore, CustomerDetail};
