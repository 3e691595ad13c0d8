//! Read-time aggregations over customers, communications and tasks
//!
//! Reports keep no state of their own. Every ratio is 0 when its denominator
//! is 0.

use serde::Serialize;

use super::communication::{Communication, CommunicationType};
use super::customer::Customer;
use super::id::EntityId;
use super::task::{Task, TaskStatus};

/// Activity counts for one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerActivity {
    pub customer_id: EntityId,
    pub name: String,
    pub company: String,
    pub communications: usize,
    pub tasks: usize,
}

/// Task totals by status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCompletion {
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
    pub total: usize,
    /// completed / total * 100
    pub completion_rate: f64,
}

/// Count and share of one communication type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeFrequency {
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub count: usize,
    pub percentage: f64,
}

/// Communication totals by type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunicationFrequency {
    pub total: usize,
    /// One entry per type, in declaration order
    pub by_type: Vec<TypeFrequency>,
    pub average_per_customer: f64,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Per-customer communication and task counts, in customer order
pub fn customer_activity(
    customers: &[Customer],
    communications: &[Communication],
    tasks: &[Task],
) -> Vec<CustomerActivity> {
    customers
        .iter()
        .map(|c| CustomerActivity {
            customer_id: c.id.clone(),
            name: c.name.clone(),
            company: c.company.clone(),
            communications: communications
                .iter()
                .filter(|m| m.customer_id == c.id)
                .count(),
            tasks: tasks.iter().filter(|t| t.customer_id == c.id).count(),
        })
        .collect()
}

/// Counts tasks by status and computes the completion rate
pub fn task_completion(tasks: &[Task]) -> TaskCompletion {
    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();

    let completed = count(TaskStatus::Completed);
    TaskCompletion {
        pending: count(TaskStatus::Pending),
        completed,
        overdue: count(TaskStatus::Overdue),
        total: tasks.len(),
        completion_rate: percent(completed, tasks.len()),
    }
}

/// Counts communications by type
///
/// Only communications attached to a known customer are counted.
pub fn communication_frequency(
    customers: &[Customer],
    communications: &[Communication],
) -> CommunicationFrequency {
    let counted: Vec<&Communication> = communications
        .iter()
        .filter(|m| customers.iter().any(|c| c.id == m.customer_id))
        .collect();
    let total = counted.len();

    let by_type = CommunicationType::ALL
        .into_iter()
        .map(|kind| {
            let count = counted.iter().filter(|m| m.kind == kind).count();
            TypeFrequency {
                kind,
                count,
                percentage: percent(count, total),
            }
        })
        .collect();

    let average_per_customer = if customers.is_empty() {
        0.0
    } else {
        total as f64 / customers.len() as f64
    };

    CommunicationFrequency {
        total,
        by_type,
        average_per_customer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCommunication, NewCustomer, NewTask};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, sec)
            .unwrap()
    }

    fn customer(name: &str, sec: u32) -> Customer {
        Customer::new(
            NewCustomer {
                name: name.to_string(),
                ..Default::default()
            },
            at(sec),
        )
    }

    fn comm(customer: &Customer, kind: CommunicationType, sec: u32) -> Communication {
        Communication::new(
            NewCommunication {
                customer_id: customer.id.clone(),
                kind,
                ..Default::default()
            },
            at(sec),
        )
    }

    fn task(customer: &Customer, status: TaskStatus, sec: u32) -> Task {
        let mut task = Task::new(
            NewTask {
                customer_id: customer.id.clone(),
                title: format!("task {}", sec),
                ..Default::default()
            },
            at(sec),
        );
        task.status = status;
        task
    }

    #[test]
    fn completion_rate_is_zero_without_tasks() {
        let report = task_completion(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.completion_rate, 0.0);
    }

    #[test]
    fn completion_rate_counts_completed_share() {
        let c = customer("Acme", 0);
        let tasks = vec![
            task(&c, TaskStatus::Completed, 1),
            task(&c, TaskStatus::Pending, 2),
            task(&c, TaskStatus::Overdue, 3),
            task(&c, TaskStatus::Completed, 4),
        ];

        let report = task_completion(&tasks);
        assert_eq!(report.pending, 1);
        assert_eq!(report.completed, 2);
        assert_eq!(report.overdue, 1);
        assert_eq!(report.total, 4);
        assert_eq!(report.completion_rate, 50.0);
    }

    #[test]
    fn frequency_is_zero_without_data() {
        let report = communication_frequency(&[], &[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.average_per_customer, 0.0);
        assert_eq!(report.by_type.len(), 4);
        assert!(report.by_type.iter().all(|t| t.percentage == 0.0));
    }

    #[test]
    fn frequency_percentages_and_average() {
        let a = customer("A", 0);
        let b = customer("B", 1);
        let comms = vec![
            comm(&a, CommunicationType::Phone, 2),
            comm(&a, CommunicationType::Phone, 3),
            comm(&b, CommunicationType::Email, 4),
            comm(&b, CommunicationType::Meeting, 5),
        ];

        let report = communication_frequency(&[a, b], &comms);
        assert_eq!(report.total, 4);
        assert_eq!(report.average_per_customer, 2.0);

        let phone = &report.by_type[0];
        assert_eq!(phone.kind, CommunicationType::Phone);
        assert_eq!(phone.count, 2);
        assert_eq!(phone.percentage, 50.0);

        let other = &report.by_type[3];
        assert_eq!(other.kind, CommunicationType::Other);
        assert_eq!(other.count, 0);
    }

    #[test]
    fn frequency_ignores_orphaned_communications() {
        let a = customer("A", 0);
        let ghost = customer("Ghost", 1);
        let comms = vec![
            comm(&a, CommunicationType::Phone, 2),
            comm(&ghost, CommunicationType::Phone, 3),
        ];

        let report = communication_frequency(std::slice::from_ref(&a), &comms);
        assert_eq!(report.total, 1);
        assert_eq!(report.average_per_customer, 1.0);
    }

    #[test]
    fn activity_counts_per_customer() {
        let a = customer("A", 0);
        let b = customer("B", 1);
        let comms = vec![comm(&a, CommunicationType::Phone, 2)];
        let tasks = vec![
            task(&a, TaskStatus::Pending, 3),
            task(&b, TaskStatus::Pending, 4),
            task(&b, TaskStatus::Completed, 5),
        ];

        let report = customer_activity(&[a, b], &comms, &tasks);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "A");
        assert_eq!(report[0].communications, 1);
        assert_eq!(report[0].tasks, 1);
        assert_eq!(report[1].communications, 0);
        assert_eq!(report[1].tasks, 2);
    }
}
