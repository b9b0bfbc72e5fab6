//! The approval workflow engine.
//!
//! A pure function from (role, action) to the form's next status and step.
//! Callers are responsible for the side effects: an approval record must be
//! appended and the form updated atomically (see `FormRepo::record_decision`
//! in the db crate), and only forms currently in `pending` status at the
//! caller's step may be acted on.

use crate::error::CoreError;
use crate::role::Role;
use crate::status::{ApprovalAction, FormStatus};

/// The outcome of one approval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The step the decision was made at (the acting role's step).
    pub step: i32,
    /// The form's status after the decision is applied.
    pub status: FormStatus,
    /// The form's step after the decision is applied. `None` for terminal
    /// transitions: the form keeps whatever step it was at, which may be
    /// below the acting role's own step (a fresh submission sits at step 1
    /// until the first approver acts).
    pub next_step: Option<i32>,
}

impl Transition {
    /// Whether this transition ends the workflow.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Compute the next status and step for a form, given the acting role and
/// its decision.
///
/// - A role with no position in the approval chain may not act at all.
/// - A rejection at any step is terminal; the step does not change.
/// - An approval by Production Head (the last step) is terminal.
/// - Any other approval keeps the form pending and advances it to the
///   next step.
pub fn decide(role: Role, action: ApprovalAction) -> Result<Transition, CoreError> {
    let step = role.approval_step().ok_or_else(|| {
        CoreError::Forbidden(format!("Role '{role}' cannot act on approvals"))
    })?;

    let transition = match action {
        ApprovalAction::Rejected => Transition {
            step,
            status: FormStatus::Rejected,
            next_step: None,
        },
        ApprovalAction::Approved if role == Role::ProductionHead => Transition {
            step,
            status: FormStatus::Approved,
            next_step: None,
        },
        ApprovalAction::Approved => Transition {
            step,
            status: FormStatus::Pending,
            next_step: Some(step + 1),
        },
    };
    Ok(transition)
}
