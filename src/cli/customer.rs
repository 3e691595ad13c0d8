//! Customer CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Customer, NewCustomer};
use crate::storage::{CrmStore, CustomerDetail};

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Add a customer
    Add {
        /// Customer name
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        company: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List all customers
    List,

    /// Search customers by name, email or company (case-insensitive)
    Search {
        /// Text to look for
        term: String,
    },

    /// Show a customer with its communications and tasks
    Show {
        /// Customer ID
        id: String,
    },
}

pub fn run(cmd: CustomerCommands, store: &mut CrmStore, output: &Output) -> Result<()> {
    match cmd {
        CustomerCommands::Add {
            name,
            email,
            phone,
            company,
            notes,
        } => add_customer(
            store,
            output,
            NewCustomer {
                name,
                email,
                phone,
                company,
                notes,
            },
        ),
        CustomerCommands::List => {
            let customers: Vec<&Customer> = store.customers().iter().collect();
            print_customers(output, &customers, "No customers found.");
            Ok(())
        }
        CustomerCommands::Search { term } => {
            output.verbose_ctx("search", &format!("Searching customers for: {}", term));
            let results = store.search_customers(&term);
            print_customers(output, &results, "No customers found matching your search.");
            Ok(())
        }
        CustomerCommands::Show { id } => {
            let detail = store
                .customer_detail(&id)
                .ok_or_else(|| anyhow::anyhow!("Customer not found: {}", id))?;
            print_detail(output, &detail);
            Ok(())
        }
    }
}

fn add_customer(store: &mut CrmStore, output: &Output, params: NewCustomer) -> Result<()> {
    let customer = store.create_customer(params)?;

    if output.is_json() {
        output.data(&customer);
    } else {
        output.success(&format!("Customer added: {} - {}", customer.id, customer.name));
    }

    Ok(())
}

/// Prints one line per customer, or `empty` when there are none
pub(super) fn print_customers(output: &Output, customers: &[&Customer], empty: &str) {
    if output.is_json() {
        output.data(&customers);
    } else if customers.is_empty() {
        println!("{}", empty);
    } else {
        for c in customers {
            println!(
                "ID: {} | Name: {} | Email: {} | Company: {}",
                c.id, c.name, c.email, c.company
            );
        }
    }
}

/// Prints a customer with its communications and tasks
pub(super) fn print_detail(output: &Output, detail: &CustomerDetail<'_>) {
    if output.is_json() {
        output.data(detail);
        return;
    }

    let c = detail.customer;
    println!("ID: {}", c.id);
    println!("Name: {}", c.name);
    println!("Email: {}", c.email);
    println!("Phone: {}", c.phone);
    println!("Company: {}", c.company);
    println!("Notes: {}", c.notes);
    println!("Created: {}", c.created_date);

    println!();
    println!("Communications ({}):", detail.communications.len());
    for m in &detail.communications {
        println!("  - {} | {} | {}", m.date, m.kind, m.subject);
    }

    println!("Tasks ({}):", detail.tasks.len());
    for t in &detail.tasks {
        println!(
            "  - {} | {} | {} | Due: {}",
            t.title, t.status, t.assigned_to, t.due_date
        );
    }
}
