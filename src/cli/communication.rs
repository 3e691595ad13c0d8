//! Communication CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Communication, CommunicationType, Customer, NewCommunication};
use crate::storage::CrmStore;

#[derive(Subcommand)]
pub enum CommunicationCommands {
    /// Log a communication with a customer
    Log {
        /// Customer ID
        customer_id: String,

        /// PHONE, EMAIL, MEETING or OTHER (case-insensitive)
        #[arg(long = "type", short = 't', default_value = "OTHER")]
        kind: CommunicationType,

        #[arg(long, default_value = "")]
        subject: String,

        #[arg(long, default_value = "")]
        notes: String,

        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },

    /// List communications for a customer
    List {
        /// Customer ID
        customer_id: String,
    },
}

pub fn run(cmd: CommunicationCommands, store: &mut CrmStore, output: &Output) -> Result<()> {
    match cmd {
        CommunicationCommands::Log {
            customer_id,
            kind,
            subject,
            notes,
            tags,
        } => {
            let customer = require_customer(store, &customer_id)?;
            let params = NewCommunication {
                customer_id: customer.id.clone(),
                kind,
                subject,
                notes,
                tags,
            };

            let comm = store.log_communication(params)?;
            if output.is_json() {
                output.data(&comm);
            } else {
                output.success(&format!("Communication logged: {}", comm.id));
            }
            Ok(())
        }
        CommunicationCommands::List { customer_id } => {
            let customer = require_customer(store, &customer_id)?;
            let comms = store.communications_for(&customer_id);
            print_communications(output, customer, &comms);
            Ok(())
        }
    }
}

/// Looks up a customer, failing with "Customer not found" when absent
pub(super) fn require_customer<'a>(store: &'a CrmStore, id: &str) -> Result<&'a Customer> {
    store
        .customer_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("Customer not found: {}", id))
}

/// Prints every communication of a customer
pub(super) fn print_communications(output: &Output, customer: &Customer, comms: &[&Communication]) {
    if output.is_json() {
        output.data(&comms);
        return;
    }

    println!(
        "Communications for {} ({} total):",
        customer.name,
        comms.len()
    );
    if comms.is_empty() {
        println!("No communications found.");
        return;
    }

    for m in comms {
        println!();
        println!("ID: {}", m.id);
        println!("Type: {}", m.kind);
        println!("Date: {}", m.date);
        println!("Subject: {}", m.subject);
        println!("Notes: {}", m.notes);
        println!("Tags: {}", m.tags);
        println!("---");
    }
}
