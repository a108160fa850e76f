//! Local list updates after master-data mutations.
//!
//! The list changes only when the mutation succeeded. A failure leaves it
//! exactly as rendered and comes back as an error notification.

use serde::Serialize;

use crate::error::Result;
use crate::models::MasterEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient toast shown after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub detail: Option<String>,
}

impl Notification {
    fn success(title: String) -> Self {
        Self {
            kind: NotificationKind::Success,
            title,
            detail: None,
        }
    }

    fn error(title: String, detail: String) -> Self {
        Self {
            kind: NotificationKind::Error,
            title,
            detail: Some(detail),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

pub fn apply_created<E: MasterEntity>(items: &mut Vec<E>, outcome: Result<E>) -> Notification {
    match outcome {
        Ok(created) => {
            items.push(created);
            Notification::success(format!("{} created", E::LABEL))
        }
        Err(err) => Notification::error(
            format!("Failed to create {}", E::LABEL.to_lowercase()),
            err.user_message(),
        ),
    }
}

/// Replaces the record with the same id; a record no longer in the list is appended.
pub fn apply_updated<E: MasterEntity>(items: &mut Vec<E>, outcome: Result<E>) -> Notification {
    match outcome {
        Ok(updated) => {
            match items.iter_mut().find(|item| item.id() == updated.id()) {
                Some(slot) => *slot = updated,
                None => items.push(updated),
            }
            Notification::success(format!("{} updated", E::LABEL))
        }
        Err(err) => Notification::error(
            format!("Failed to update {}", E::LABEL.to_lowercase()),
            err.user_message(),
        ),
    }
}

pub fn apply_deleted<E: MasterEntity>(items: &mut Vec<E>, id: &str, outcome: Result<()>) -> Notification {
    match outcome {
        Ok(()) => {
            items.retain(|item| item.id() != id);
            Notification::success(format!("{} deleted", E::LABEL))
        }
        Err(err) => Notification::error(
            format!("Failed to delete {}", E::LABEL.to_lowercase()),
            err.user_message(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsoleError;
    use crate::models::{ClaimType, MasterRecord};

    fn claim_type(id: &str, name: &str, risk: f64) -> ClaimType {
        ClaimType {
            claim_type_id: id.into(),
            claim_type_name: name.into(),
            risk_percentage: risk,
            is_active: true,
            created_date: None,
            created_by: None,
        }
    }

    #[test]
    fn successful_mutations_update_the_list() {
        let mut items = vec![claim_type("1", "Theft", 30.0)];

        let note = apply_created(&mut items, Ok(claim_type("2", "Flood", 20.0)));
        assert_eq!(note.title, "Claim type created");
        assert_eq!(items.len(), 2);

        let note = apply_updated(&mut items, Ok(claim_type("1", "Theft", 45.0)));
        assert!(!note.is_error());
        assert_eq!(items[0].value_number(), Some(45.0));

        let note = apply_deleted(&mut items, "2", Ok(()));
        assert_eq!(note.title, "Claim type deleted");
        assert_eq!(items.iter().map(|i| i.id()).collect::<Vec<_>>(), vec!["1"]);
    }

    #[test]
    fn failed_mutations_leave_the_list_untouched() {
        let mut items = vec![claim_type("1", "Theft", 30.0)];
        let before = items.clone();

        let forbidden = || ConsoleError::Forbidden {
            message: "Forbidden - claim_config.update required".into(),
        };

        let note = apply_created(&mut items, Err(forbidden()));
        assert!(note.is_error());
        assert_eq!(note.title, "Failed to create claim type");
        assert!(note.detail.as_deref().unwrap().starts_with("Forbidden - claim_config.update required"));

        apply_updated::<ClaimType>(&mut items, Err(forbidden()));
        apply_deleted::<ClaimType>(&mut items, "1", Err(forbidden()));
        assert_eq!(items, before);
    }
}
