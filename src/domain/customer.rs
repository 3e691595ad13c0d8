//! Customer domain model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::{format_date, EntityId, EntityKind};

/// Fields supplied by the caller when creating a customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub notes: String,
}

/// A customer record
///
/// Customers are immutable once created and are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (`CUST_...`)
    pub id: EntityId,

    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub notes: String,

    /// When the customer was created (`YYYY-MM-DD HH:MM:SS`)
    pub created_date: String,
}

impl Customer {
    /// Creates a customer with a fresh ID and creation date stamped from `at`
    pub fn new(params: NewCustomer, at: NaiveDateTime) -> Self {
        Self {
            id: EntityId::generate(EntityKind::Customer, at),
            name: params.name,
            email: params.email,
            phone: params.phone,
            company: params.company,
            notes: params.notes,
            created_date: format_date(at),
        }
    }

    /// Case-insensitive substring match over name, email and company
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.company.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_customer() -> Customer {
        let at = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(10, 11, 12)
            .unwrap();
        Customer::new(
            NewCustomer {
                name: "Jane Doe".to_string(),
                email: "jane@Example.com".to_string(),
                phone: "555-0100".to_string(),
                company: "Acme Corp".to_string(),
                notes: String::new(),
            },
            at,
        )
    }

    #[test]
    fn new_customer_is_stamped() {
        let customer = make_customer();
        assert_eq!(customer.id.as_str(), "CUST_20250304101112");
        assert_eq!(customer.created_date, "2025-03-04 10:11:12");
        assert_eq!(customer.name, "Jane Doe");
    }

    #[test]
    fn matches_name_email_and_company() {
        let customer = make_customer();
        assert!(customer.matches("jane"));
        assert!(customer.matches("example.com"));
        assert!(customer.matches("acme"));
        assert!(!customer.matches("555"));
        assert!(!customer.matches("globex"));
    }
}
