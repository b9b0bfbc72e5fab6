//! Form statuses and approval actions.
//!
//! Both sets are closed and mirrored by CHECK constraints on
//! `forms.current_status` and `approvals.action`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The lifecycle status of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStatus {
    Pending,
    Approved,
    Rejected,
    InReview,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Pending => "pending",
            FormStatus::Approved => "approved",
            FormStatus::Rejected => "rejected",
            FormStatus::InReview => "in_review",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(FormStatus::Pending),
            "approved" => Ok(FormStatus::Approved),
            "rejected" => Ok(FormStatus::Rejected),
            "in_review" => Ok(FormStatus::InReview),
            other => Err(CoreError::Validation(format!(
                "Unknown form status '{other}'"
            ))),
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FormStatus::Approved | FormStatus::Rejected)
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision recorded against a form at one approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalAction {
    Approved,
    Rejected,
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Approved => "approved",
            ApprovalAction::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "approved" => Ok(ApprovalAction::Approved),
            "rejected" => Ok(ApprovalAction::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown approval action '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
