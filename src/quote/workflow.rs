//! Client-side authorization for quotation status transitions.
//!
//! ```text
//! Saved(1) --submit--> PendingApproval(2) --approve--> Approved(3)
//!                              |
//!                              +--reject--> Rejected(4) --resubmit--> Resubmitted(5)
//!                                               ^                         |
//!                                               +---------reject----------+--reapprove--> ReApproved(6)
//! ```
//!
//! The backend stays authoritative; this only decides which buttons a user sees.

use crate::error::{AppError, Result};
use crate::models::{QuotationStatus, SalesPersonType, User};
use std::fmt;

/// User-triggered operation on a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Submit,
    Resubmit,
    Edit,
    Delete,
    Approve,
    ReApprove,
    Reject,
    Print,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Resubmit => "Resubmit",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
            Self::Approve => "Approve",
            Self::ReApprove => "Approve",
            Self::Reject => "Reject",
            Self::Print => "Print",
        }
    }

    /// Re-approval and rejection must carry a reason.
    pub fn requires_reason(self) -> bool {
        matches!(self, Self::ReApprove | Self::Reject)
    }

    /// Sent to the submit endpoint rather than the approval endpoint.
    pub fn is_submission(self) -> bool {
        matches!(self, Self::Submit | Self::Resubmit)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who is acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub role: SalesPersonType,
    pub salesperson_code: String,
}

impl Actor {
    pub fn from_user(user: &User) -> Self {
        Self {
            role: user.sales_p_type,
            salesperson_code: user.sales_p_code.clone(),
        }
    }

    pub fn is_approver(&self) -> bool {
        self.role.is_approver()
    }

    /// Owner of the quotation, or an approver (who manage every quotation).
    pub fn is_creator_equivalent(&self, owner_code: &str) -> bool {
        self.is_approver() || (!owner_code.is_empty() && self.salesperson_code == owner_code)
    }
}

/// Actions `actor` may take on a quotation in `status` owned by `owner_code`.
pub fn permitted_actions(status: QuotationStatus, actor: &Actor, owner_code: &str) -> Vec<Action> {
    use QuotationStatus::*;

    let creator = actor.is_creator_equivalent(owner_code);
    match status {
        Saved if creator => vec![Action::Submit, Action::Edit, Action::Delete],
        Rejected if creator => vec![Action::Resubmit, Action::Edit],
        PendingApproval if actor.is_approver() => vec![Action::Approve, Action::Reject],
        Resubmitted if actor.is_approver() => vec![Action::ReApprove, Action::Reject],
        Approved | ReApproved => vec![Action::Print],
        _ => Vec::new(),
    }
}

/// Status after `action`, or an error when the gate refuses it.
///
/// Edit, Delete and Print leave the status unchanged.
pub fn transition(
    status: QuotationStatus,
    action: Action,
    actor: &Actor,
    owner_code: &str,
    reason: Option<&str>,
) -> Result<QuotationStatus> {
    if !permitted_actions(status, actor, owner_code).contains(&action) {
        return Err(AppError::forbidden(format!(
            "{action} is not available for a {status} quotation"
        )));
    }

    if action.requires_reason() && reason.is_none_or(|r| r.trim().is_empty()) {
        return Err(AppError::validation(format!("A reason is required to {}", action.label().to_lowercase())));
    }

    Ok(match action {
        Action::Submit => QuotationStatus::PendingApproval,
        Action::Resubmit => QuotationStatus::Resubmitted,
        Action::Approve => QuotationStatus::Approved,
        Action::ReApprove => QuotationStatus::ReApproved,
        Action::Reject => QuotationStatus::Rejected,
        Action::Edit | Action::Delete | Action::Print => status,
    })
}

/// Edit and delete of customers, items and salespersons. Creation is open to everyone.
pub fn can_manage_catalog(role: SalesPersonType) -> bool {
    role.is_approver()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approver() -> Actor {
        Actor {
            role: SalesPersonType::Approver,
            salesperson_code: "SP01".to_string(),
        }
    }

    fn member(code: &str) -> Actor {
        Actor {
            role: SalesPersonType::Member,
            salesperson_code: code.to_string(),
        }
    }

    #[test]
    fn test_pending_requires_approver() {
        let actions = permitted_actions(QuotationStatus::PendingApproval, &approver(), "SP05");
        assert_eq!(actions, vec![Action::Approve, Action::Reject]);

        assert!(permitted_actions(QuotationStatus::PendingApproval, &member("SP05"), "SP05").is_empty());
    }

    #[test]
    fn test_resubmitted_targets() {
        let actor = approver();
        let next: Vec<_> = permitted_actions(QuotationStatus::Resubmitted, &actor, "SP05")
            .into_iter()
            .map(|a| transition(QuotationStatus::Resubmitted, a, &actor, "SP05", Some("ok")).unwrap())
            .collect();
        assert_eq!(next, vec![QuotationStatus::ReApproved, QuotationStatus::Rejected]);
    }

    #[test]
    fn test_creator_actions() {
        let owner = member("SP05");
        assert_eq!(
            permitted_actions(QuotationStatus::Saved, &owner, "SP05"),
            vec![Action::Submit, Action::Edit, Action::Delete]
        );
        assert_eq!(
            permitted_actions(QuotationStatus::Rejected, &owner, "SP05"),
            vec![Action::Resubmit, Action::Edit]
        );
    }

    #[test]
    fn test_other_member_sees_nothing() {
        assert!(permitted_actions(QuotationStatus::Saved, &member("SP06"), "SP05").is_empty());
        assert!(permitted_actions(QuotationStatus::Saved, &member(""), "").is_empty());
    }

    #[test]
    fn test_print_for_everyone() {
        assert_eq!(
            permitted_actions(QuotationStatus::ReApproved, &member("SP09"), "SP05"),
            vec![Action::Print]
        );
    }

    #[test]
    fn test_reason_required() {
        let actor = approver();
        let err = transition(QuotationStatus::PendingApproval, Action::Reject, &actor, "SP05", Some("  "));
        assert!(matches!(err, Err(AppError::Validation(_))));

        let ok = transition(QuotationStatus::PendingApproval, Action::Approve, &actor, "SP05", None);
        assert_eq!(ok.unwrap(), QuotationStatus::Approved);
    }

    #[test]
    fn test_forbidden_transition() {
        let err = transition(QuotationStatus::Approved, Action::Submit, &approver(), "SP01", None);
        assert!(matches!(err, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_catalog_management() {
        assert!(can_manage_catalog(SalesPersonType::Approver));
        assert!(!can_manage_catalog(SalesPersonType::Member));
    }
}
