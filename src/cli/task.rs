//! Task CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::communication::require_customer;
use super::output::Output;
use crate::domain::{NewTask, Task, TaskStatus};
use crate::storage::{Config, CrmStore};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task for a customer
    ///
    /// Examples:
    ///   crm task add CUST_20250101090000 --title "Send proposal" --due 2025-02-01
    Add {
        /// Customer ID
        customer_id: String,

        /// Task title
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Due date (free-form, e.g. YYYY-MM-DD)
        #[arg(long, default_value = "")]
        due: String,

        /// Assignee (defaults to the configured default assignee)
        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// List tasks for a customer
    List {
        /// Customer ID
        customer_id: String,
    },

    /// List all pending tasks
    Pending,

    /// Change a task's status
    Status {
        /// Task ID
        id: String,

        /// PENDING, COMPLETED or OVERDUE (case-insensitive)
        status: TaskStatus,
    },
}

pub fn run(cmd: TaskCommands, store: &mut CrmStore, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            customer_id,
            title,
            description,
            due,
            assigned_to,
        } => {
            let customer = require_customer(store, &customer_id)?;
            let params = NewTask {
                customer_id: customer.id.clone(),
                title,
                description,
                due_date: due,
                assigned_to: assigned_to.unwrap_or_else(|| config.default_assignee.clone()),
            };

            let task = store.create_task(params)?;
            if output.is_json() {
                output.data(&task);
            } else {
                output.success(&format!("Task created: {} - {}", task.id, task.title));
            }
            Ok(())
        }
        TaskCommands::List { customer_id } => {
            let customer = require_customer(store, &customer_id)?;
            let tasks = store.tasks_for(&customer_id);
            if !output.is_json() {
                println!("Tasks for {} ({} total):", customer.name, tasks.len());
            }
            print_tasks(output, &tasks, "No tasks found.");
            Ok(())
        }
        TaskCommands::Pending => {
            print_pending(store, output);
            Ok(())
        }
        TaskCommands::Status { id, status } => set_status(store, output, &id, status),
    }
}

fn set_status(store: &mut CrmStore, output: &Output, id: &str, status: TaskStatus) -> Result<()> {
    let previous = store
        .task_by_id(id)
        .map(|t| t.status)
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;

    output.verbose_ctx("status", &format!("{}: {} -> {}", id, previous, status));
    store.update_task_status(id, status)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "previous": previous,
            "status": status,
        }));
    } else {
        output.success(&format!("Task {} is now {}", id, status));
    }
    Ok(())
}

/// Prints task blocks, or `empty` when there are none
pub(super) fn print_tasks(output: &Output, tasks: &[&Task], empty: &str) {
    if output.is_json() {
        output.data(&tasks);
        return;
    }

    if tasks.is_empty() {
        println!("{}", empty);
        return;
    }

    for t in tasks {
        println!();
        println!("ID: {}", t.id);
        println!("Title: {}", t.title);
        println!("Description: {}", t.description);
        println!("Status: {}", t.status);
        println!("Due Date: {}", t.due_date);
        println!("Assigned To: {}", t.assigned_to);
        println!("Created: {}", t.created_date);
        println!("---");
    }
}

/// Prints every pending task with its customer's name
pub(super) fn print_pending(store: &CrmStore, output: &Output) {
    let pending = store.pending_tasks();

    if output.is_json() {
        let items: Vec<_> = pending
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "customer": store.customer_name(&t.customer_id),
                    "title": t.title,
                    "due_date": t.due_date,
                    "assigned_to": t.assigned_to,
                })
            })
            .collect();
        output.data(&items);
    } else if pending.is_empty() {
        println!("No pending tasks found.");
    } else {
        println!("Pending Tasks ({} total):", pending.len());
        for t in pending {
            println!();
            println!("Task ID: {}", t.id);
            println!("Customer: {}", store.customer_name(&t.customer_id));
            println!("Title: {}", t.title);
            println!("Due Date: {}", t.due_date);
            println!("Assigned To: {}", t.assigned_to);
            println!("---");
        }
    }
}
