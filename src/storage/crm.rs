//! In-memory CRM store
//!
//! Holds the three entity sequences loaded from a data directory. Every
//! mutation appends or edits in memory, rewrites the affected table in full,
//! and then notifies the registered listener. If the rewrite fails the
//! in-memory change is undone, so memory and disk never diverge.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use serde::Serialize;

use super::record::CsvRecord;
use super::table::CsvTable;
use crate::domain::report::{self, CommunicationFrequency, CustomerActivity, TaskCompletion};
use crate::domain::{
    Communication, Customer, EntityId, Event, Listener, NewCommunication, NewCustomer, NewTask,
    Task, TaskStatus,
};

/// A customer with everything attached to it
#[derive(Debug, Serialize)]
pub struct CustomerDetail<'a> {
    #[serde(flatten)]
    pub customer: &'a Customer,
    pub communications: Vec<&'a Communication>,
    pub tasks: Vec<&'a Task>,
}

/// The CRM data set for one data directory
pub struct CrmStore {
    data_dir: PathBuf,
    customer_table: CsvTable<Customer>,
    communication_table: CsvTable<Communication>,
    task_table: CsvTable<Task>,
    customers: Vec<Customer>,
    communications: Vec<Communication>,
    tasks: Vec<Task>,
    listener: Option<Listener>,
}

/// Appends `row`, persists the full sequence, and rolls back on failure
fn append_and_save<T: CsvRecord + Clone>(
    rows: &mut Vec<T>,
    table: &CsvTable<T>,
    row: T,
) -> Result<T> {
    rows.push(row.clone());
    if let Err(err) = table.write_all(rows) {
        rows.pop();
        return Err(err);
    }
    Ok(row)
}

impl CrmStore {
    /// Opens the data directory, creating it and header-only tables if
    /// absent, and loads every table into memory
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();

        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let customer_table = CsvTable::<Customer>::in_dir(&data_dir);
        let communication_table = CsvTable::<Communication>::in_dir(&data_dir);
        let task_table = CsvTable::<Task>::in_dir(&data_dir);

        for created in [
            customer_table.ensure()?,
            communication_table.ensure()?,
            task_table.ensure()?,
        ] {
            if created {
                info!("Initialized empty table in {}", data_dir.display());
            }
        }

        let store = Self {
            customers: customer_table.read_all()?,
            communications: communication_table.read_all()?,
            tasks: task_table.read_all()?,
            data_dir,
            customer_table,
            communication_table,
            task_table,
            listener: None,
        };

        debug!(
            "Opened CRM data at {}: {} customers, {} communications, {} tasks",
            store.data_dir.display(),
            store.customers.len(),
            store.communications.len(),
            store.tasks.len()
        );

        Ok(store)
    }

    /// Returns the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Registers the listener notified after each committed mutation,
    /// replacing any previous one
    pub fn set_listener(&mut self, listener: impl FnMut(&Event) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    fn emit(&mut self, event: Event) {
        debug!("Event: {}", event.name());
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }

    // -------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------

    /// Creates a customer stamped with the current time
    pub fn create_customer(&mut self, params: NewCustomer) -> Result<Customer> {
        self.create_customer_at(params, Local::now().naive_local())
    }

    /// Creates a customer stamped with `at`
    pub fn create_customer_at(&mut self, params: NewCustomer, at: NaiveDateTime) -> Result<Customer> {
        let customer = append_and_save(
            &mut self.customers,
            &self.customer_table,
            Customer::new(params, at),
        )
        .context("Failed to save customers")?;

        self.emit(Event::CustomerCreated {
            name: customer.name.clone(),
        });
        Ok(customer)
    }

    /// All customers, in storage order
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Finds a customer by exact ID
    pub fn customer_by_id(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Case-insensitive substring search over name, email and company
    pub fn search_customers(&self, term: &str) -> Vec<&Customer> {
        let needle = term.to_lowercase();
        self.customers.iter().filter(|c| c.matches(&needle)).collect()
    }

    /// A customer together with its communications and tasks
    pub fn customer_detail(&self, id: &str) -> Option<CustomerDetail<'_>> {
        let customer = self.customer_by_id(id)?;
        Some(CustomerDetail {
            customer,
            communications: self.communications_for(id),
            tasks: self.tasks_for(id),
        })
    }

    // -------------------------------------------------------------------
    // Communications
    // -------------------------------------------------------------------

    /// Logs a communication stamped with the current time
    ///
    /// The customer reference is not checked.
    pub fn log_communication(&mut self, params: NewCommunication) -> Result<Communication> {
        self.log_communication_at(params, Local::now().naive_local())
    }

    /// Logs a communication stamped with `at`
    pub fn log_communication_at(
        &mut self,
        params: NewCommunication,
        at: NaiveDateTime,
    ) -> Result<Communication> {
        let comm = append_and_save(
            &mut self.communications,
            &self.communication_table,
            Communication::new(params, at),
        )
        .context("Failed to save communications")?;

        let customer_name = self
            .customer_by_id(comm.customer_id.as_str())
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        self.emit(Event::CommunicationLogged {
            customer_name,
            kind: comm.kind,
        });
        Ok(comm)
    }

    /// All communications, in storage order
    pub fn communications(&self) -> &[Communication] {
        &self.communications
    }

    /// Communications referencing the given customer
    pub fn communications_for(&self, customer_id: &str) -> Vec<&Communication> {
        self.communications
            .iter()
            .filter(|m| m.customer_id == customer_id)
            .collect()
    }

    // -------------------------------------------------------------------
    // Tasks
    // -------------------------------------------------------------------

    /// Creates a pending task stamped with the current time
    ///
    /// The customer reference is not checked.
    pub fn create_task(&mut self, params: NewTask) -> Result<Task> {
        self.create_task_at(params, Local::now().naive_local())
    }

    /// Creates a pending task stamped with `at`
    pub fn create_task_at(&mut self, params: NewTask, at: NaiveDateTime) -> Result<Task> {
        let task = append_and_save(&mut self.tasks, &self.task_table, Task::new(params, at))
            .context("Failed to save tasks")?;

        self.emit(Event::TaskCreated {
            title: task.title.clone(),
            due_date: task.due_date.clone(),
        });
        Ok(task)
    }

    /// All tasks, in storage order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Finds a task by exact ID
    pub fn task_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks referencing the given customer
    pub fn tasks_for(&self, customer_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.customer_id == customer_id)
            .collect()
    }

    /// Tasks still pending
    pub fn pending_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status.is_pending()).collect()
    }

    /// Sets a task's status and rewrites the task table
    ///
    /// Returns `Ok(false)` without touching anything when no task has the ID.
    pub fn update_task_status(&mut self, id: &str, status: TaskStatus) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            debug!("update_task_status: no task {}", id);
            return Ok(false);
        };

        let previous = std::mem::replace(&mut self.tasks[index].status, status);
        if let Err(err) = self.task_table.write_all(&self.tasks) {
            self.tasks[index].status = previous;
            return Err(err).context("Failed to save tasks");
        }

        let title = self.tasks[index].title.clone();
        self.emit(Event::TaskStatusUpdated { title, status });
        Ok(true)
    }

    /// Returns the customer name for a task's reference, or "Unknown"
    pub fn customer_name(&self, customer_id: &EntityId) -> &str {
        self.customer_by_id(customer_id.as_str())
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown")
    }

    // -------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------

    /// Communication and task counts per customer
    pub fn activity_report(&self) -> Vec<CustomerActivity> {
        report::customer_activity(&self.customers, &self.communications, &self.tasks)
    }

    /// Task counts by status with completion rate
    pub fn task_completion_report(&self) -> TaskCompletion {
        report::task_completion(&self.tasks)
    }

    /// Communication counts by type with percentages
    pub fn communication_frequency_report(&self) -> CommunicationFrequency {
        report::communication_frequency(&self.customers, &self.communications)
    }
}
