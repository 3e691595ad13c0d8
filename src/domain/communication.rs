//! Communication domain model
//!
//! Communications are an append-only log of contacts with a customer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::{format_date, EntityId, EntityKind};

#[derive(Debug, Error, PartialEq)]
#[error("Invalid communication type: '{0}' (expected PHONE, EMAIL, MEETING or OTHER)")]
pub struct InvalidCommunicationType(pub String);

/// Channel a communication took place over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunicationType {
    Phone,
    Email,
    Meeting,
    #[default]
    Other,
}

impl CommunicationType {
    /// All types in declaration order
    pub const ALL: [CommunicationType; 4] = [
        CommunicationType::Phone,
        CommunicationType::Email,
        CommunicationType::Meeting,
        CommunicationType::Other,
    ];

    /// Canonical (uppercase) name as stored on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationType::Phone => "PHONE",
            CommunicationType::Email => "EMAIL",
            CommunicationType::Meeting => "MEETING",
            CommunicationType::Other => "OTHER",
        }
    }
}

impl fmt::Display for CommunicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommunicationType {
    type Err = InvalidCommunicationType;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidCommunicationType(s.to_string()))
    }
}

/// Fields supplied by the caller when logging a communication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommunication {
    pub customer_id: EntityId,
    pub kind: CommunicationType,
    pub subject: String,
    pub notes: String,
    /// Free-text, comma separated; stored unparsed
    pub tags: String,
}

/// A logged communication with a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Communication {
    /// Unique identifier (`COMM_...`)
    pub id: EntityId,

    /// Customer this communication belongs to (not validated)
    pub customer_id: EntityId,

    #[serde(rename = "type")]
    pub kind: CommunicationType,

    /// When the communication was logged (`YYYY-MM-DD HH:MM:SS`)
    pub date: String,

    pub subject: String,
    pub notes: String,
    pub tags: String,
}

impl Communication {
    /// Creates a communication with a fresh ID and date stamped from `at`
    pub fn new(params: NewCommunication, at: NaiveDateTime) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Communication, at),
            customer_id: params.customer_id,
            kind: params.kind,
            date: format_date(at),
            subject: params.subject,
            notes: params.notes,
            tags: params.tags,
        }
    }
}
