//! Interactive menu
//!
//! A nested, numbered text menu over the same store operations as the
//! subcommands. Non-numeric choices reprompt; end of input exits.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use super::communication::print_communications;
use super::customer::{print_customers, print_detail};
use super::output::{Output, OutputFormat};
use super::{report, task};
use crate::domain::{CommunicationType, Customer, NewCommunication, NewCustomer, NewTask, TaskStatus};
use crate::storage::{Config, CrmStore};

/// Whether the session continues after a menu action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Outcome of asking for a customer ID
#[derive(Debug)]
enum Lookup {
    Found(Customer),
    Missing,
    Eof,
}

/// Line-based prompt reader
struct Prompter<R> {
    input: R,
}

impl<R: BufRead> Prompter<R> {
    /// Prints `prompt` and reads one trimmed line; `None` at end of input
    fn line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .context("Failed to read input")?;
        if read == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    /// Reads a number, reprompting until one is entered
    fn number(&mut self, prompt: &str) -> Result<Option<u32>> {
        loop {
            let Some(line) = self.line(prompt)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => println!("Please enter a valid number."),
            }
        }
    }
}

/// Runs the menu on standard input
pub fn run(store: &mut CrmStore, config: &Config, output: &Output) -> Result<()> {
    let stdin = io::stdin();
    run_with(store, config, output, stdin.lock())
}

/// Runs the menu on any line source
pub fn run_with<R: BufRead>(
    store: &mut CrmStore,
    config: &Config,
    output: &Output,
    input: R,
) -> Result<()> {
    let output = Output::new(OutputFormat::Text, output.is_verbose());
    let mut menu = Menu {
        store,
        config,
        output,
        prompt: Prompter { input },
    };

    println!("Welcome to the CRM");
    println!("==================");
    menu.main()
}

struct Menu<'a, R> {
    store: &'a mut CrmStore,
    config: &'a Config,
    output: Output,
    prompt: Prompter<R>,
}

/// Unwraps a prompt result, leaving the session at end of input
macro_rules! ask {
    ($expr:expr) => {
        match $expr? {
            Some(value) => value,
            None => return Ok(Flow::Quit),
        }
    };
}

impl<R: BufRead> Menu<'_, R> {
    fn main(&mut self) -> Result<()> {
        loop {
            println!();
            println!("=== MAIN MENU ===");
            println!("1. Customer Management");
            println!("2. Communication Tracking");
            println!("3. Task Management");
            println!("4. Reports");
            println!("5. Exit");

            let flow = match self.prompt.number("Enter your choice: ")? {
                None | Some(5) => Flow::Quit,
                Some(1) => self.customers()?,
                Some(2) => self.communications()?,
                Some(3) => self.tasks()?,
                Some(4) => self.reports()?,
                Some(_) => {
                    println!("Invalid choice. Please try again.");
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                println!("Thank you for using the CRM. Goodbye!");
                return Ok(());
            }
        }
    }

    /// Reports a failed save without ending the session
    fn report_failure(&self, result: Result<()>) {
        if let Err(err) = result {
            self.output.error(&format!("{:#}", err));
        }
    }

    fn find_customer(&mut self) -> Result<Lookup> {
        let Some(id) = self.prompt.line("Customer ID: ")? else {
            return Ok(Lookup::Eof);
        };
        match self.store.customer_by_id(&id) {
            Some(customer) => Ok(Lookup::Found(customer.clone())),
            None => {
                println!("Customer not found.");
                Ok(Lookup::Missing)
            }
        }
    }

    // -------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------

    fn customers(&mut self) -> Result<Flow> {
        loop {
            println!();
            println!("=== CUSTOMER MANAGEMENT ===");
            println!("1. Add New Customer");
            println!("2. Search Customers");
            println!("3. View All Customers");
            println!("4. View Customer Details");
            println!("5. Back to Main Menu");

            match ask!(self.prompt.number("Enter your choice: ")) {
                1 => {
                    let params = NewCustomer {
                        name: ask!(self.prompt.line("Name: ")),
                        email: ask!(self.prompt.line("Email: ")),
                        phone: ask!(self.prompt.line("Phone: ")),
                        company: ask!(self.prompt.line("Company: ")),
                        notes: ask!(self.prompt.line("Notes: ")),
                    };
                    let result = self.store.create_customer(params).map(|c| {
                        println!("Customer added successfully! ({})", c.id);
                    });
                    self.report_failure(result);
                }
                2 => {
                    let term = ask!(self
                        .prompt
                        .line("Enter search term (name, email, or company): "));
                    let results = self.store.search_customers(&term);
                    print_customers(&self.output, &results, "No customers found matching your search.");
                }
                3 => {
                    let all: Vec<&Customer> = self.store.customers().iter().collect();
                    print_customers(&self.output, &all, "No customers found.");
                }
                4 => {
                    let id = ask!(self.prompt.line("Enter Customer ID: "));
                    match self.store.customer_detail(&id) {
                        Some(detail) => print_detail(&self.output, &detail),
                        None => println!("Customer not found."),
                    }
                }
                5 => return Ok(Flow::Continue),
                _ => println!("Invalid choice. Please try again."),
            }
        }
    }

    // -------------------------------------------------------------------
    // Communications
    // -------------------------------------------------------------------

    fn communications(&mut self) -> Result<Flow> {
        loop {
            println!();
            println!("=== COMMUNICATION TRACKING ===");
            println!("1. Log New Communication");
            println!("2. View Communications by Customer");
            println!("3. Back to Main Menu");

            match ask!(self.prompt.number("Enter your choice: ")) {
                1 => {
                    let customer = match self.find_customer()? {
                        Lookup::Found(customer) => customer,
                        Lookup::Missing => continue,
                        Lookup::Eof => return Ok(Flow::Quit),
                    };
                    println!("Customer: {} ({})", customer.name, customer.company);

                    println!("Communication Types:");
                    for (i, kind) in CommunicationType::ALL.iter().enumerate() {
                        println!("{}. {}", i + 1, kind);
                    }
                    let choice = ask!(self.prompt.number("Select communication type: "));
                    let kind = match choice
                        .checked_sub(1)
                        .and_then(|i| CommunicationType::ALL.get(i as usize).copied())
                    {
                        Some(kind) => kind,
                        None => {
                            println!("Invalid choice. Using OTHER.");
                            CommunicationType::Other
                        }
                    };

                    let params = NewCommunication {
                        customer_id: customer.id,
                        kind,
                        subject: ask!(self.prompt.line("Subject: ")),
                        notes: ask!(self.prompt.line("Notes: ")),
                        tags: ask!(self.prompt.line("Tags (comma-separated): ")),
                    };
                    let result = self.store.log_communication(params).map(|_| {
                        println!("Communication logged successfully!");
                    });
                    self.report_failure(result);
                }
                2 => {
                    let customer = match self.find_customer()? {
                        Lookup::Found(customer) => customer,
                        Lookup::Missing => continue,
                        Lookup::Eof => return Ok(Flow::Quit),
                    };
                    let comms = self.store.communications_for(customer.id.as_str());
                    print_communications(&self.output, &customer, &comms);
                }
                3 => return Ok(Flow::Continue),
                _ => println!("Invalid choice. Please try again."),
            }
        }
    }

    // -------------------------------------------------------------------
    // Tasks
    // -------------------------------------------------------------------

    fn tasks(&mut self) -> Result<Flow> {
        loop {
            println!();
            println!("=== TASK MANAGEMENT ===");
            println!("1. Create New Task");
            println!("2. View Tasks by Customer");
            println!("3. View All Pending Tasks");
            println!("4. Update Task Status");
            println!("5. Back to Main Menu");

            match ask!(self.prompt.number("Enter your choice: ")) {
                1 => {
                    let customer = match self.find_customer()? {
                        Lookup::Found(customer) => customer,
                        Lookup::Missing => continue,
                        Lookup::Eof => return Ok(Flow::Quit),
                    };
                    println!("Customer: {} ({})", customer.name, customer.company);

                    let title = ask!(self.prompt.line("Task Title: "));
                    let description = ask!(self.prompt.line("Description: "));
                    let due_date = ask!(self.prompt.line("Due Date (YYYY-MM-DD): "));
                    let assigned = ask!(self.prompt.line(&format!(
                        "Assigned To [{}]: ",
                        self.config.default_assignee
                    )));
                    let assigned_to = if assigned.is_empty() {
                        self.config.default_assignee.clone()
                    } else {
                        assigned
                    };

                    let params = NewTask {
                        customer_id: customer.id,
                        title,
                        description,
                        due_date,
                        assigned_to,
                    };
                    let result = self.store.create_task(params).map(|_| {
                        println!("Task created successfully!");
                    });
                    self.report_failure(result);
                }
                2 => {
                    let customer = match self.find_customer()? {
                        Lookup::Found(customer) => customer,
                        Lookup::Missing => continue,
                        Lookup::Eof => return Ok(Flow::Quit),
                    };
                    let tasks = self.store.tasks_for(customer.id.as_str());
                    println!("Tasks for {} ({} total):", customer.name, tasks.len());
                    task::print_tasks(&self.output, &tasks, "No tasks found.");
                }
                3 => task::print_pending(self.store, &self.output),
                4 => {
                    let id = ask!(self.prompt.line("Task ID: "));
                    let Some(current) = self.store.task_by_id(&id) else {
                        println!("Task not found.");
                        continue;
                    };
                    println!("Current Task: {} (Status: {})", current.title, current.status);

                    println!("New Status Options:");
                    for (i, status) in TaskStatus::ALL.iter().enumerate() {
                        println!("{}. {}", i + 1, status);
                    }
                    let choice = ask!(self.prompt.number("Select new status: "));
                    let Some(status) = choice
                        .checked_sub(1)
                        .and_then(|i| TaskStatus::ALL.get(i as usize).copied())
                    else {
                        println!("Invalid choice.");
                        continue;
                    };

                    let result = self.store.update_task_status(&id, status).map(|_| {
                        println!("Task status updated successfully!");
                    });
                    self.report_failure(result);
                }
                5 => return Ok(Flow::Continue),
                _ => println!("Invalid choice. Please try again."),
            }
        }
    }

    // -------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------

    fn reports(&mut self) -> Result<Flow> {
        loop {
            println!();
            println!("=== REPORTING ===");
            println!("1. Customer Activity Report");
            println!("2. Task Completion Report");
            println!("3. Communication Frequency Report");
            println!("4. Back to Main Menu");

            match ask!(self.prompt.number("Enter your choice: ")) {
                1 => report::activity(self.store, &self.output),
                2 => report::task_completion(self.store, &self.output),
                3 => report::communication_frequency(self.store, &self.output),
                4 => return Ok(Flow::Continue),
                _ => println!("Invalid choice. Please try again."),
            }
        }
    }
}
