//! Report commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::storage::CrmStore;

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Communications and tasks per customer
    Activity,

    /// Task counts by status and completion rate
    Tasks,

    /// Communication counts by type
    Comms,
}

pub fn run(cmd: ReportCommands, store: &CrmStore, output: &Output) -> Result<()> {
    match cmd {
        ReportCommands::Activity => activity(store, output),
        ReportCommands::Tasks => task_completion(store, output),
        ReportCommands::Comms => communication_frequency(store, output),
    }
    Ok(())
}

pub(super) fn activity(store: &CrmStore, output: &Output) {
    let report = store.activity_report();
    if output.is_json() {
        output.data(&report);
        return;
    }

    println!("=== CUSTOMER ACTIVITY REPORT ===");
    for row in &report {
        println!("Customer: {} ({})", row.name, row.company);
        println!("  Communications: {}", row.communications);
        println!("  Tasks: {}", row.tasks);
        println!();
    }
}

pub(super) fn task_completion(store: &CrmStore, output: &Output) {
    let report = store.task_completion_report();
    if output.is_json() {
        output.data(&report);
        return;
    }

    println!("=== TASK COMPLETION REPORT ===");
    println!("Pending Tasks: {}", report.pending);
    println!("Completed Tasks: {}", report.completed);
    println!("Overdue Tasks: {}", report.overdue);
    println!("Total Tasks: {}", report.total);
    println!("Completion Rate: {:.1}%", report.completion_rate);
}

pub(super) fn communication_frequency(store: &CrmStore, output: &Output) {
    let report = store.communication_frequency_report();
    if output.is_json() {
        output.data(&report);
        return;
    }

    println!("=== COMMUNICATION FREQUENCY REPORT ===");
    println!("Total Communications: {}", report.total);
    println!();
    println!("By Type:");
    for entry in &report.by_type {
        println!("  {}: {} ({:.1}%)", entry.kind, entry.count, entry.percentage);
    }
    println!();
    println!(
        "Average Communications per Customer: {:.1}",
        report.average_per_customer
    );
}
