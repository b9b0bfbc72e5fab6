//! The closed set of user roles and their approval-chain positions.
//!
//! Role names must match the CHECK constraint on `users.role` in the
//! `create_users_table` migration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The step a form starts at when submitted (the Initiator's own step).
pub const INITIAL_STEP: i32 = 1;

/// The step of the first approval in the chain.
pub const FIRST_APPROVAL_STEP: i32 = 2;

/// A user role. The set is closed: the database constrains `users.role` to
/// exactly these six values, and every dispatch on role is an exhaustive
/// `match` rather than a string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Initiator,
    ProductionHead,
    Operator,
    User,
    Approver,
}

impl Role {
    /// The database representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Initiator => "Initiator",
            Role::ProductionHead => "Production Head",
            Role::Operator => "Operator",
            Role::User => "User",
            Role::Approver => "Approver",
        }
    }

    /// Parse a role from its database representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Initiator" => Ok(Role::Initiator),
            "Production Head" => Ok(Role::ProductionHead),
            "Operator" => Ok(Role::Operator),
            "User" => Ok(Role::User),
            "Approver" => Ok(Role::Approver),
            other => Err(CoreError::Validation(format!("Unknown role '{other}'"))),
        }
    }

    /// The approval-chain step this role acts at, or `None` if the role
    /// takes no part in approvals.
    ///
    /// The chain is fixed: Initiator submits at step 1, then
    /// User (2) -> Approver (3) -> Production Head (4).
    pub fn approval_step(&self) -> Option<i32> {
        match self {
            Role::User => Some(2),
            Role::Approver => Some(3),
            Role::ProductionHead => Some(4),
            Role::Admin | Role::Initiator | Role::Operator => None,
        }
    }

    /// The step values at which forms wait for this role's decision.
    ///
    /// Freshly submitted forms sit at [`INITIAL_STEP`] and are owed the
    /// first approval, so the step-2 role also picks those up. Every later
    /// role acts only on its own mapped step.
    pub fn pending_steps(&self) -> Option<&'static [i32]> {
        match self.approval_step() {
            Some(FIRST_APPROVAL_STEP) => Some(&[INITIAL_STEP, FIRST_APPROVAL_STEP]),
            Some(3) => Some(&[3]),
            Some(4) => Some(&[4]),
            _ => None,
        }
    }

    /// Whether a form sitting at `current_step` is waiting on this role.
    pub fn acts_at(&self, current_step: i32) -> bool {
        self.pending_steps()
            .is_some_and(|steps| steps.contains(&current_step))
    }

    /// Whether this role may create new forms.
    pub fn can_initiate(&self) -> bool {
        matches!(self, Role::Initiator | Role::Admin)
    }

    /// Whether this role may create users and read the audit trail.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// All roles, in approval-chain order where applicable.
    pub const ALL: &'static [Role] = &[
        Role::Admin,
        Role::Initiator,
        Role::ProductionHead,
        Role::Operator,
        Role::User,
        Role::Approver,
    ];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
