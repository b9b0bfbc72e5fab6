//! Repository for the `forms` table, including the transactional
//! decision-recording operation the workflow engine relies on.

use formline_core::status::FormStatus;
use formline_core::types::DbId;
use sqlx::PgPool;

use crate::models::approval::CreateApproval;
use crate::models::form::{CreateForm, Form, PendingForm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, form_data, created_by, \
    current_status, current_step, created_at, updated_at";

/// Provides operations for forms.
pub struct FormRepo;

impl FormRepo {
    /// Insert a new form. Status and step take their column defaults
    /// (`pending`, step 1).
    pub async fn create(pool: &PgPool, input: &CreateForm) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (title, description, form_data, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.form_data)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a form by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all forms created by a user, most recently updated first.
    pub async fn list_by_creator(pool: &PgPool, user_id: DbId) -> Result<Vec<Form>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM forms WHERE created_by = $1 ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List pending forms sitting at any of the given steps, joined with
    /// the creator's username, oldest first.
    pub async fn list_pending_at_steps(
        pool: &PgPool,
        steps: &[i32],
    ) -> Result<Vec<PendingForm>, sqlx::Error> {
        sqlx::query_as::<_, PendingForm>(
            "SELECT f.id, f.title, u.username AS created_by_username,
                    f.current_status, f.current_step, f.created_at
             FROM forms f
             JOIN users u ON f.created_by = u.id
             WHERE f.current_status = 'pending'
               AND f.current_step = ANY($1)
             ORDER BY f.created_at ASC",
        )
        .bind(steps)
        .fetch_all(pool)
        .await
    }

    /// Record an approval decision and advance the form, atomically.
    ///
    /// One transaction inserts the approval row and applies the status/step
    /// update. The update is guarded: it only matches when the form is
    /// still `pending` at one of `expected_steps`, so two decisions racing
    /// for the same step cannot both land -- the loser matches zero rows,
    /// the whole transaction rolls back (approval row included), and
    /// `None` is returned for the caller to surface as a conflict.
    ///
    /// `new_step: None` leaves `current_step` untouched. Terminal
    /// decisions pass `None`: a rejection must not move a form that is
    /// still at a step below the acting role's own.
    pub async fn record_decision(
        pool: &PgPool,
        approval: &CreateApproval,
        expected_steps: &[i32],
        new_status: FormStatus,
        new_step: Option<i32>,
    ) -> Result<Option<Form>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO approvals (form_id, user_id, step_number, action, comments)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(approval.form_id)
        .bind(approval.user_id)
        .bind(approval.step_number)
        .bind(&approval.action)
        .bind(&approval.comments)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE forms SET
                current_status = $2,
                current_step = COALESCE($3, current_step),
                updated_at = NOW()
             WHERE id = $1
               AND current_status = 'pending'
               AND current_step = ANY($4)
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Form>(&query)
            .bind(approval.form_id)
            .bind(new_status.as_str())
            .bind(new_step)
            .bind(expected_steps)
            .fetch_optional(&mut *tx)
            .await?;

        match updated {
            Some(form) => {
                tx.commit().await?;
                Ok(Some(form))
            }
            None => {
                tx.rollback().await?;
                tracing::debug!(
                    form_id = approval.form_id,
                    step = approval.step_number,
                    "Decision guard matched no pending row; transaction rolled back"
                );
                Ok(None)
            }
        }
    }
}
