use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::error::DomainError;

/// Targeted invite: a pending offer of a reservation to a known guest.
/// At most one per (event, guest). Accepting converts it into a booking
/// and consumes the invite.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Invite {
    pub id: String,
    pub event_id: String,
    /// Strong: the invite is retracted if the host account is removed.
    pub host_id: String,
    pub guest_id: String,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    pub fn new(event_id: String, host_id: String, guest_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            host_id,
            guest_id,
            created_at: Utc::now(),
        }
    }
}

/// A contact an open invite was shared with. The first and last names may
/// be empty; the email is what identifies the contact within the invite.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Contact {
    pub fn new(first_name: String, last_name: String, email: String) -> Result<Self, DomainError> {
        validate_email(&email)?;
        Ok(Self { first_name, last_name, email })
    }
}

/// Sanity check only, not RFC 5322. Caveat emptor.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::InvalidEmail);
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(DomainError::InvalidEmail);
    }

    Ok(())
}

/// Untargeted, shareable invite. Holds a bounded contact list deduplicated
/// by email; whoever registers with a listed email may accept, which
/// converts the contact into a booking and removes it from the list.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenInvite {
    pub id: String,
    pub event_id: String,
    /// Strong: the open invite is retracted if the host account is removed.
    pub host_id: String,
    pub contacts: Vec<Contact>,
    pub created_at: DateTime<Utc>,
}

impl OpenInvite {
    pub fn new(event_id: String, host_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            host_id,
            contacts: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds only if the email is not yet present; a duplicate is silently
    /// ignored rather than rejected. The list length is capped by `limit`.
    pub fn add_contact(&mut self, contact: Contact, limit: usize) -> Result<(), DomainError> {
        if self.contacts.len() >= limit {
            return Err(DomainError::ContactLimitReached);
        }

        if self.find_contact(&contact.email).is_none() {
            self.contacts.push(contact);
        }

        Ok(())
    }

    pub fn find_contact(&self, email: &str) -> Option<usize> {
        self.contacts.iter().position(|c| c.email == email)
    }

    /// Consumes the matching contact, or yields None when the email was
    /// never invited (or already consumed).
    pub fn remove_contact(&mut self, email: &str) -> Option<Contact> {
        self.find_contact(email).map(|i| self.contacts.remove(i))
    }
}

impl FromRow<'_, SqliteRow> for OpenInvite {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let contacts_json: String = row.try_get("contacts_json")?;
        let contacts =
            serde_json::from_str(&contacts_json).map_err(|e| sqlx::Error::ColumnDecode {
                index: "contacts_json".into(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            event_id: row.try_get("event_id")?,
            host_id: row.try_get("host_id")?,
            contacts,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(email: &str) -> Contact {
        Contact::new(String::new(), String::new(), email.into()).unwrap()
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(Contact::new("A".into(), "B".into(), "not-an-email".into()).is_err());
        assert!(Contact::new("A".into(), "B".into(), "@example.com".into()).is_err());
        assert!(Contact::new("A".into(), "B".into(), "a@nodot".into()).is_err());
        assert!(Contact::new("A".into(), "B".into(), "a@example.com".into()).is_ok());
    }

    #[test]
    fn duplicate_contact_emails_are_silently_ignored() {
        let mut oi = OpenInvite::new("e".into(), "h".into());
        oi.add_contact(contact("a@example.com"), 16).unwrap();
        oi.add_contact(contact("a@example.com"), 16).unwrap();
        assert_eq!(oi.contacts.len(), 1);
    }

    #[test]
    fn contact_list_is_capped() {
        let mut oi = OpenInvite::new("e".into(), "h".into());
        oi.add_contact(contact("a@example.com"), 2).unwrap();
        oi.add_contact(contact("b@example.com"), 2).unwrap();
        assert_eq!(
            oi.add_contact(contact("c@example.com"), 2).unwrap_err(),
            DomainError::ContactLimitReached
        );
    }

    #[test]
    fn accepting_removes_the_contact() {
        let mut oi = OpenInvite::new("e".into(), "h".into());
        oi.add_contact(contact("a@example.com"), 16).unwrap();
        let removed = oi.remove_contact("a@example.com").unwrap();
        assert_eq!(removed.email, "a@example.com");
        assert!(oi.contacts.is_empty());
        assert!(oi.remove_contact("a@example.com").is_none());
    }
}
