//! End-to-end approval-chain scenarios through the service layer.

use assert_matches::assert_matches;
use formline_core::error::CoreError;
use formline_core::role::Role;
use formline_core::status::ApprovalAction;
use serde_json::json;
use sqlx::PgPool;

use formline_app::bootstrap::{
    ensure_default_admin, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME,
};
use formline_app::error::AppError;
use formline_app::service::FormService;
use formline_app::session::Session;

const TEST_PASSWORD: &str = "password-123";

/// Bootstrap the database and return the service plus an admin session.
async fn setup(pool: PgPool) -> (FormService, Session) {
    ensure_default_admin(&pool).await.unwrap();
    let service = FormService::new(pool);
    let admin = service
        .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .await
        .unwrap();
    (service, admin)
}

/// Create a user with the given role and log them in.
async fn login_as(
    service: &FormService,
    admin: &Session,
    username: &str,
    role: Role,
) -> Session {
    service
        .create_user(admin, username, TEST_PASSWORD, role, None)
        .await
        .unwrap();
    service.login(username, TEST_PASSWORD).await.unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_full_chain_ends_approved(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let initiator = login_as(&service, &admin, "init", Role::Initiator).await;
    let user = login_as(&service, &admin, "user1", Role::User).await;
    let approver = login_as(&service, &admin, "appr1", Role::Approver).await;
    let head = login_as(&service, &admin, "head1", Role::ProductionHead).await;

    let form = service
        .create_form(&initiator, "New production line", None, json!({"line": 4}))
        .await
        .unwrap();
    assert_eq!(form.current_status, "pending");
    assert_eq!(form.current_step, 1);

    // The freshly submitted form is waiting on the first approver.
    let queue = service.pending_queue(&user).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, form.id);

    let form = service
        .submit_decision(&user, form.id, ApprovalAction::Approved, Some("fine"))
        .await
        .unwrap();
    assert_eq!(form.current_status, "pending");
    assert_eq!(form.current_step, 3);

    let queue = service.pending_queue(&approver).await.unwrap();
    assert_eq!(queue.len(), 1);

    let form = service
        .submit_decision(&approver, form.id, ApprovalAction::Approved, None)
        .await
        .unwrap();
    assert_eq!(form.current_step, 4);

    let form = service
        .submit_decision(&head, form.id, ApprovalAction::Approved, Some("go"))
        .await
        .unwrap();
    assert_eq!(form.current_status, "approved");
    assert_eq!(form.current_step, 4);

    let history = service.approval_history(&initiator, form.id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(
        history.iter().map(|h| h.step_number).collect::<Vec<_>>(),
        vec![2, 3, 4]
    );
    assert_eq!(history[2].approved_by, "head1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rejection_is_terminal(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let initiator = login_as(&service, &admin, "init", Role::Initiator).await;
    let user = login_as(&service, &admin, "user1", Role::User).await;
    let approver = login_as(&service, &admin, "appr1", Role::Approver).await;
    let head = login_as(&service, &admin, "head1", Role::ProductionHead).await;

    let form = service
        .create_form(&initiator, "Doomed request", None, json!({}))
        .await
        .unwrap();

    let form = service
        .submit_decision(&user, form.id, ApprovalAction::Approved, None)
        .await
        .unwrap();
    assert_eq!(form.current_step, 3);

    let form = service
        .submit_decision(&approver, form.id, ApprovalAction::Rejected, Some("no"))
        .await
        .unwrap();
    assert_eq!(form.current_status, "rejected");
    assert_eq!(form.current_step, 3, "rejection must not advance the step");

    // A terminal form hard-rejects any further decision.
    let err = service
        .submit_decision(&head, form.id, ApprovalAction::Approved, None)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Conflict(_)));

    let history = service.approval_history(&initiator, form.id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_rejection_of_fresh_form_keeps_initial_step(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let initiator = login_as(&service, &admin, "init", Role::Initiator).await;
    let user = login_as(&service, &admin, "user1", Role::User).await;

    let form = service
        .create_form(&initiator, "Incomplete request", None, json!({}))
        .await
        .unwrap();
    assert_eq!(form.current_step, 1);

    // The first approver rejects before the form ever advances.
    let form = service
        .submit_decision(&user, form.id, ApprovalAction::Rejected, Some("missing data"))
        .await
        .unwrap();
    assert_eq!(form.current_status, "rejected");
    assert_eq!(form.current_step, 1, "a terminal decision must not move the step");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_decision_at_wrong_step_is_refused(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let initiator = login_as(&service, &admin, "init", Role::Initiator).await;
    let head = login_as(&service, &admin, "head1", Role::ProductionHead).await;

    let form = service
        .create_form(&initiator, "Too early", None, json!({}))
        .await
        .unwrap();

    // Production Head acts at step 4; the form is at step 1.
    let err = service
        .submit_decision(&head, form.id, ApprovalAction::Approved, None)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

    // No approval record may exist for the refused attempt.
    let history = service.approval_history(&initiator, form.id).await.unwrap();
    assert!(history.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_approver_at_advanced_step_is_refused(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let initiator = login_as(&service, &admin, "init", Role::Initiator).await;
    let first = login_as(&service, &admin, "user1", Role::User).await;
    let second = login_as(&service, &admin, "user2", Role::User).await;

    let form = service
        .create_form(&initiator, "Contended", None, json!({}))
        .await
        .unwrap();

    service
        .submit_decision(&first, form.id, ApprovalAction::Approved, None)
        .await
        .unwrap();

    // The form has moved past the User step; the second approver is told
    // so. (The in-flight race between read and commit is covered at the
    // repository level by the guarded transaction.)
    let err = service
        .submit_decision(&second, form.id, ApprovalAction::Approved, None)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

    let history = service.approval_history(&initiator, form.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_roles_outside_the_chain_cannot_act(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let initiator = login_as(&service, &admin, "init", Role::Initiator).await;
    let operator = login_as(&service, &admin, "oper", Role::Operator).await;

    let form = service
        .create_form(&initiator, "Untouchable", None, json!({}))
        .await
        .unwrap();

    let err = service
        .submit_decision(&operator, form.id, ApprovalAction::Approved, None)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

    let err = service.pending_queue(&operator).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

    // Refused attempts leave an audit trace.
    let trail = service.audit_trail(&admin, None).await.unwrap();
    assert!(trail
        .iter()
        .any(|e| e.action == "access_denied" && e.username.as_deref() == Some("oper")));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refusal_survives_audit_write_failure(pool: PgPool) {
    let (service, admin) = setup(pool.clone()).await;
    let operator = login_as(&service, &admin, "oper", Role::Operator).await;

    // Break the audit trail out from under the service. The denied
    // caller must still see Forbidden, not a database error.
    sqlx::query("DROP TABLE audit_log")
        .execute(&pool)
        .await
        .unwrap();

    let err = service.pending_queue(&operator).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_only_initiators_create_forms(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let user = login_as(&service, &admin, "user1", Role::User).await;

    let err = service
        .create_form(&user, "Not allowed", None, json!({}))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_input_is_rejected_before_persistence(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let initiator = login_as(&service, &admin, "init", Role::Initiator).await;

    let err = service
        .create_form(&initiator, "   ", None, json!({}))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(_)));

    let err = service
        .create_form(&initiator, "Bad payload", None, json!([1, 2, 3]))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Validation(_)));

    let forms = service.my_forms(&initiator).await.unwrap();
    assert!(forms.is_empty(), "nothing may be persisted on validation failure");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_username_surfaces_as_conflict(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    login_as(&service, &admin, "sam", Role::User).await;

    let err = service
        .create_user(&admin, "sam", TEST_PASSWORD, Role::Approver, None)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_management_is_admin_only(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let user = login_as(&service, &admin, "user1", Role::User).await;

    let err = service
        .create_user(&user, "mallory", TEST_PASSWORD, Role::Admin, None)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

    let err = service.list_users(&user).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

    let err = service.audit_trail(&user, None).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Forbidden(_)));

    let users = service.list_users(&admin).await.unwrap();
    assert_eq!(users.len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_audit_trail_records_the_whole_session(pool: PgPool) {
    let (service, admin) = setup(pool).await;
    let initiator = login_as(&service, &admin, "init", Role::Initiator).await;
    let user = login_as(&service, &admin, "user1", Role::User).await;

    let form = service
        .create_form(
            &initiator,
            "Audited",
            None,
            json!({"x": 1, "password": "hunter2"}),
        )
        .await
        .unwrap();
    service
        .submit_decision(&user, form.id, ApprovalAction::Approved, None)
        .await
        .unwrap();

    let trail = service.audit_trail(&admin, Some(50)).await.unwrap();
    let actions: Vec<&str> = trail.iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&"login"));
    assert!(actions.contains(&"user_create"));
    assert!(actions.contains(&"form_create"));
    assert!(actions.contains(&"form_approve"));

    // No audit entry may carry a password, including payload fields.
    for entry in &trail {
        let details = entry.details.as_deref().unwrap_or("");
        assert!(!details.contains(TEST_PASSWORD));
        assert!(!details.contains("hunter2"));
    }
    let create_entry = trail
        .iter()
        .find(|e| e.action == "form_create")
        .expect("form creation must be audited");
    assert!(create_entry
        .details
        .as_deref()
        .unwrap_or("")
        .contains("[REDACTED]"));
}
