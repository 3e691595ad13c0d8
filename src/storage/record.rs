//! Flat string-array mapping for each entity type
//!
//! | File | Header |
//! |------|--------|
//! | `customers.csv` | `id,name,email,phone,company,notes,created_date` |
//! | `communications.csv` | `id,customer_id,type,date,subject,notes,tags` |
//! | `tasks.csv` | `id,customer_id,title,description,due_date,status,created_date,assigned_to` |

use thiserror::Error;

use crate::domain::{
    Communication, Customer, EntityId, InvalidCommunicationType, InvalidTaskStatus, Task,
};

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error(transparent)]
    CommunicationType(#[from] InvalidCommunicationType),

    #[error(transparent)]
    TaskStatus(#[from] InvalidTaskStatus),
}

/// An entity that maps to one CSV row
pub trait CsvRecord: Sized {
    /// Fixed header line columns
    const HEADER: &'static [&'static str];

    /// File name inside the data directory
    const FILE_NAME: &'static str;

    /// Serializes to one field per header column
    fn to_fields(&self) -> Vec<String>;

    /// Builds an entity from parsed fields; extra trailing fields are ignored
    fn from_fields(fields: &[String]) -> Result<Self, RecordError>;
}

fn require(fields: &[String], expected: usize) -> Result<(), RecordError> {
    if fields.len() < expected {
        return Err(RecordError::TooFewFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

impl CsvRecord for Customer {
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "phone",
        "company",
        "notes",
        "created_date",
    ];
    const FILE_NAME: &'static str = "customers.csv";

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.company.clone(),
            self.notes.clone(),
            self.created_date.clone(),
        ]
    }

    fn from_fields(f: &[String]) -> Result<Self, RecordError> {
        require(f, Self::HEADER.len())?;
        Ok(Customer {
            id: EntityId::from(f[0].as_str()),
            name: f[1].clone(),
            email: f[2].clone(),
            phone: f[3].clone(),
            company: f[4].clone(),
            notes: f[5].clone(),
            created_date: f[6].clone(),
        })
    }
}

impl CsvRecord for Communication {
    const HEADER: &'static [&'static str] = &[
        "id",
        "customer_id",
        "type",
        "date",
        "subject",
        "notes",
        "tags",
    ];
    const FILE_NAME: &'static str = "communications.csv";

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.customer_id.to_string(),
            self.kind.to_string(),
            self.date.clone(),
            self.subject.clone(),
            self.notes.clone(),
            self.tags.clone(),
        ]
    }

    fn from_fields(f: &[String]) -> Result<Self, RecordError> {
        require(f, Self::HEADER.len())?;
        Ok(Communication {
            id: EntityId::from(f[0].as_str()),
            customer_id: EntityId::from(f[1].as_str()),
            kind: f[2].parse()?,
            date: f[3].clone(),
            subject: f[4].clone(),
            notes: f[5].clone(),
            tags: f[6].clone(),
        })
    }
}

impl CsvRecord for Task {
    const HEADER: &'static [&'static str] = &[
        "id",
        "customer_id",
        "title",
        "description",
        "due_date",
        "status",
        "created_date",
        "assigned_to",
    ];
    const FILE_NAME: &'static str = "tasks.csv";

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.customer_id.to_string(),
            self.title.clone(),
            self.description.clone(),
            self.due_date.clone(),
            self.status.to_string(),
            self.created_date.clone(),
            self.assigned_to.clone(),
        ]
    }

    fn from_fields(f: &[String]) -> Result<Self, RecordError> {
        require(f, Self::HEADER.len())?;
        Ok(Task {
            id: EntityId::from(f[0].as_str()),
            customer_id: EntityId::from(f[1].as_str()),
            title: f[2].clone(),
            description: f[3].clone(),
            due_date: f[4].clone(),
            status: f[5].parse()?,
            created_date: f[6].clone(),
            assigned_to: f[7].clone(),
        })
    }
}
