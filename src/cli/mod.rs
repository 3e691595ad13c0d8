//! # Command-Line Interface
//!
//! User-facing CLI commands, the interactive menu and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Data directory setup | `init` |
//! | Menu | Interactive session | `menu` (default) |
//! | Customer | Customer records | `customer add`, `customer search`, `customer show` |
//! | Communication | Interaction log | `comm log`, `comm list` |
//! | Task | Follow-ups | `task add`, `task pending`, `task status` |
//! | Report | Summaries | `report activity`, `report tasks`, `report comms` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The menu always renders text.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! crm --verbose task pending
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod customer;
mod communication;
mod task;
mod report;
mod menu;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
