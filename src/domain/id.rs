//! Entity ID system for customers, communications and tasks
//!
//! ID Format: `{PREFIX}_{yyyyMMddHHmmss}`
//! - Customers: `CUST_20250101093000`
//! - Communications: `COMM_20250101093000`
//! - Tasks: `TASK_20250101093000`
//!
//! The timestamp has one-second granularity. Two entities of the same kind
//! created within the same second receive the same ID; nothing detects this.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp layout embedded in generated IDs
pub const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Timestamp layout for `created_date` / `date` fields
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The kind of entity an ID belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Communication,
    Task,
}

impl EntityKind {
    /// Returns the ID prefix for this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Customer => "CUST",
            EntityKind::Communication => "COMM",
            EntityKind::Task => "TASK",
        }
    }
}

/// Identifier of a customer, communication or task
///
/// IDs loaded from disk are kept verbatim, even when they do not follow the
/// generated format, so hand-edited files still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a new ID of the given kind stamped with `at`
    pub fn generate(kind: EntityKind, at: NaiveDateTime) -> Self {
        Self(format!(
            "{}_{}",
            kind.prefix(),
            at.format(ID_TIMESTAMP_FORMAT)
        ))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Formats a creation timestamp the way it is stored on disk
pub fn format_date(at: NaiveDateTime) -> String {
    at.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn generated_ids_carry_prefix() {
        let ts = at(9, 30, 0);

        assert_eq!(
            EntityId::generate(EntityKind::Customer, ts).as_str(),
            "CUST_20250102093000"
        );
        assert_eq!(
            EntityId::generate(EntityKind::Communication, ts).as_str(),
            "COMM_20250102093000"
        );
        assert_eq!(
            EntityId::generate(EntityKind::Task, ts).as_str(),
            "TASK_20250102093000"
        );
    }

    #[test]
    fn ids_differ_across_seconds() {
        let id1 = EntityId::generate(EntityKind::Task, at(9, 30, 0));
        let id2 = EntityId::generate(EntityKind::Task, at(9, 30, 1));

        assert_ne!(id1, id2);
    }

    #[test]
    fn ids_collide_within_a_second() {
        let ts = at(9, 30, 0);
        let id1 = EntityId::generate(EntityKind::Task, ts);
        let id2 = EntityId::generate(EntityKind::Task, ts + chrono::Duration::milliseconds(500));

        assert_eq!(id1, id2);
    }

    #[test]
    fn loaded_ids_are_kept_verbatim() {
        let id = EntityId::from("legacy-42");
        assert_eq!(id.as_str(), "legacy-42");
        assert_eq!(id, "legacy-42");
    }

    #[test]
    fn date_format_is_second_granular() {
        assert_eq!(format_date(at(7, 5, 3)), "2025-01-02 07:05:03");
    }
}
