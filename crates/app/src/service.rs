//! The service operations a front end calls.
//!
//! Every operation takes an explicit [`Session`] and goes through the
//! repositories; input is validated before any persistence call, and
//! authorization failures are recorded in the audit trail.

use formline_core::audit::action_types;
use formline_core::error::CoreError;
use formline_core::role::Role;
use formline_core::status::{ApprovalAction, FormStatus};
use formline_core::types::DbId;
use formline_core::workflow::decide;
use formline_db::models::approval::{ApprovalHistoryItem, CreateApproval};
use formline_db::models::audit::{AuditTrailItem, CreateAuditEntry};
use formline_db::models::form::{CreateForm, Form, PendingForm};
use formline_db::models::user::{CreateUser, UserSummary};
use formline_db::repositories::{ApprovalRepo, AuditRepo, FormRepo, UserRepo};
use formline_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::password::{hash_password, validate_new_password, verify_password};
use crate::session::Session;

/// Default number of audit entries returned by [`FormService::audit_trail`].
const DEFAULT_AUDIT_LIMIT: i64 = 100;

/// Form-approval service operations.
pub struct FormService {
    pool: DbPool,
}

impl FormService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Authenticate with username + password, returning a session context.
    ///
    /// Unknown usernames and wrong passwords produce the same message so
    /// the login form cannot be used to probe for accounts. Failed
    /// attempts against existing accounts are audited.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Session> {
        let user = UserRepo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid username or password".into(),
                ))
            })?;

        if !user.is_active {
            return Err(CoreError::Forbidden("Account is deactivated".into()).into());
        }

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;

        if !password_valid {
            // Best effort, like `deny`: the caller must still see the
            // authentication error.
            if let Err(err) = self
                .audit(Some(user.id), action_types::LOGIN_FAILED, None)
                .await
            {
                tracing::warn!(user_id = user.id, error = %err, "Failed to audit login failure");
            }
            return Err(CoreError::Unauthorized("Invalid username or password".into()).into());
        }

        let role = Role::parse(&user.role)?;
        self.audit(Some(user.id), action_types::LOGIN, None).await?;

        tracing::info!(user_id = user.id, username = %user.username, "User logged in");

        Ok(Session {
            user_id: user.id,
            username: user.username,
            role,
        })
    }

    // ── Forms ────────────────────────────────────────────────────────

    /// Create a new form. Initiator (or Admin) only.
    ///
    /// The payload must be a JSON object; title is required. Nothing is
    /// persisted when validation fails.
    pub async fn create_form(
        &self,
        session: &Session,
        title: &str,
        description: Option<&str>,
        payload: serde_json::Value,
    ) -> AppResult<Form> {
        if !session.role.can_initiate() {
            self.deny(session, "create_form").await;
            return Err(CoreError::Forbidden(format!(
                "Role '{}' cannot create forms",
                session.role
            ))
            .into());
        }

        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("Form title is required".into()).into());
        }
        if !payload.is_object() {
            return Err(
                CoreError::Validation("Form payload must be a JSON object".into()).into(),
            );
        }

        let form = FormRepo::create(
            &self.pool,
            &CreateForm {
                title: title.to_string(),
                description: description
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(String::from),
                form_data: payload,
                created_by: session.user_id,
            },
        )
        .await?;

        // Payloads are caller-supplied; scrub credential-shaped fields
        // before they reach the audit trail.
        let redacted = formline_core::audit::redact_sensitive_fields(&form.form_data);
        self.audit(
            Some(session.user_id),
            action_types::FORM_CREATE,
            Some(format!(
                "Created form '{}' (id {}): {redacted}",
                form.title, form.id
            )),
        )
        .await?;

        tracing::info!(user_id = session.user_id, form_id = form.id, "Form created");

        Ok(form)
    }

    /// Record an approve/reject decision on a form and advance it.
    ///
    /// The caller's role must hold the form's current step, and the form
    /// must still be `pending`: terminal forms hard-reject further
    /// actions. The approval row and the form update commit in one
    /// transaction; when two decisions race for the same step, the first
    /// commit wins and the second caller gets a conflict.
    pub async fn submit_decision(
        &self,
        session: &Session,
        form_id: DbId,
        action: ApprovalAction,
        comment: Option<&str>,
    ) -> AppResult<Form> {
        // 1. The role must map to an approval step at all.
        let transition = match decide(session.role, action) {
            Ok(t) => t,
            Err(err) => {
                self.deny(session, "submit_decision").await;
                return Err(err.into());
            }
        };

        // 2. The form must exist and still be pending.
        let form = FormRepo::find_by_id(&self.pool, form_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Form",
                id: form_id,
            })?;

        let status = FormStatus::parse(&form.current_status)?;
        if status != FormStatus::Pending {
            return Err(CoreError::Conflict(format!(
                "Form {form_id} is {status} and accepts no further decisions"
            ))
            .into());
        }

        // 3. The form must be waiting on the caller's step.
        if !session.role.acts_at(form.current_step) {
            self.deny(session, "submit_decision").await;
            return Err(CoreError::Forbidden(format!(
                "Form {form_id} is at step {} and is not waiting on role '{}'",
                form.current_step, session.role
            ))
            .into());
        }

        // 4. Append the approval record and apply the transition,
        //    atomically. A `None` here means another decision landed
        //    between our read and the update.
        let approval = CreateApproval {
            form_id,
            user_id: session.user_id,
            step_number: transition.step,
            action: action.as_str().to_string(),
            comments: comment
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
        };
        let expected_steps = session.role.pending_steps().ok_or_else(|| {
            CoreError::Forbidden(format!("Role '{}' cannot act on approvals", session.role))
        })?;

        let updated = FormRepo::record_decision(
            &self.pool,
            &approval,
            expected_steps,
            transition.status,
            transition.next_step,
        )
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "Form {form_id} was already acted on at step {}",
                transition.step
            ))
        })?;

        let action_type = match action {
            ApprovalAction::Approved => action_types::FORM_APPROVE,
            ApprovalAction::Rejected => action_types::FORM_REJECT,
        };
        self.audit(
            Some(session.user_id),
            action_type,
            Some(format!(
                "Form {form_id} {action} at step {}",
                transition.step
            )),
        )
        .await?;

        tracing::info!(
            user_id = session.user_id,
            form_id,
            action = action.as_str(),
            step = transition.step,
            new_status = %transition.status,
            "Decision recorded"
        );

        Ok(updated)
    }

    /// Forms waiting on the caller's role, oldest first.
    pub async fn pending_queue(&self, session: &Session) -> AppResult<Vec<PendingForm>> {
        let steps = match session.role.pending_steps() {
            Some(steps) => steps,
            None => {
                self.deny(session, "pending_queue").await;
                return Err(CoreError::Forbidden(format!(
                    "Role '{}' has no approval queue",
                    session.role
                ))
                .into());
            }
        };
        Ok(FormRepo::list_pending_at_steps(&self.pool, steps).await?)
    }

    /// Forms created by the caller, most recently updated first.
    pub async fn my_forms(&self, session: &Session) -> AppResult<Vec<Form>> {
        Ok(FormRepo::list_by_creator(&self.pool, session.user_id).await?)
    }

    /// The decision history of one form, in chain order.
    pub async fn approval_history(
        &self,
        _session: &Session,
        form_id: DbId,
    ) -> AppResult<Vec<ApprovalHistoryItem>> {
        FormRepo::find_by_id(&self.pool, form_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Form",
                id: form_id,
            })?;
        Ok(ApprovalRepo::history_for_form(&self.pool, form_id).await?)
    }

    // ── User management (Admin) ──────────────────────────────────────

    /// Create a user account. Admin only. The password is hashed before
    /// it leaves this function; neither it nor its hash is audited.
    pub async fn create_user(
        &self,
        session: &Session,
        username: &str,
        password: &str,
        role: Role,
        email: Option<&str>,
    ) -> AppResult<UserSummary> {
        if !session.role.can_manage_users() {
            self.deny(session, "create_user").await;
            return Err(CoreError::Forbidden(format!(
                "Role '{}' cannot manage users",
                session.role
            ))
            .into());
        }

        let username = username.trim();
        if username.is_empty() {
            return Err(CoreError::Validation("Username is required".into()).into());
        }
        validate_new_password(password).map_err(CoreError::Validation)?;

        let password_hash = hash_password(password)
            .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;

        let user = UserRepo::create(
            &self.pool,
            &CreateUser {
                username: username.to_string(),
                password_hash,
                role: role.as_str().to_string(),
                email: email
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(String::from),
            },
        )
        .await?;

        self.audit(
            Some(session.user_id),
            action_types::USER_CREATE,
            Some(format!("Created user '{}' with role {}", user.username, role)),
        )
        .await?;

        tracing::info!(
            user_id = session.user_id,
            created_id = user.id,
            role = %role,
            "User created"
        );

        Ok(UserSummary {
            id: user.id,
            username: user.username,
            role: user.role,
            email: user.email,
            is_active: user.is_active,
            created_at: user.created_at,
        })
    }

    /// List all user accounts. Admin only.
    pub async fn list_users(&self, session: &Session) -> AppResult<Vec<UserSummary>> {
        if !session.role.can_manage_users() {
            self.deny(session, "list_users").await;
            return Err(
                CoreError::Forbidden(format!("Role '{}' cannot manage users", session.role))
                    .into(),
            );
        }
        Ok(UserRepo::list(&self.pool).await?)
    }

    /// The most recent audit entries, newest first. Admin only.
    pub async fn audit_trail(
        &self,
        session: &Session,
        limit: Option<i64>,
    ) -> AppResult<Vec<AuditTrailItem>> {
        if !session.role.can_manage_users() {
            self.deny(session, "audit_trail").await;
            return Err(CoreError::Forbidden(format!(
                "Role '{}' cannot read the audit trail",
                session.role
            ))
            .into());
        }
        let limit = limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, 1000);
        Ok(AuditRepo::list_recent(&self.pool, limit).await?)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Append one audit entry.
    async fn audit(
        &self,
        user_id: Option<DbId>,
        action: &str,
        details: Option<String>,
    ) -> AppResult<()> {
        AuditRepo::append(
            &self.pool,
            &CreateAuditEntry {
                user_id,
                action: action.to_string(),
                details,
            },
        )
        .await?;
        Ok(())
    }

    /// Audit a refused operation before surfacing the authorization error.
    /// Best effort: a failed audit insert is logged and must not mask the
    /// Forbidden error the caller is about to return.
    async fn deny(&self, session: &Session, operation: &str) {
        let result = self
            .audit(
                Some(session.user_id),
                action_types::ACCESS_DENIED,
                Some(format!(
                    "Role '{}' refused for operation '{operation}'",
                    session.role
                )),
            )
            .await;
        if let Err(err) = result {
            tracing::warn!(
                user_id = session.user_id,
                operation,
                error = %err,
                "Failed to audit refused operation"
            );
        }
    }
}
