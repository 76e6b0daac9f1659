use axum::http::StatusCode;
use sea_orm::EntityTrait;
use serde_json::{Value, json};

use ave_accounts::domain::repository::{PermissionRepository, UserRepository};
use ave_accounts::domain::types::ExtraFields;
use ave_accounts_schema::outbox_mails;
use ave_testing::auth::MockAuth;

use crate::helpers::{
    create_group, create_staff, create_superuser, create_user, permission_id, setup_state,
    test_server,
};

#[tokio::test]
async fn should_reject_missing_identity() {
    let state = setup_state().await;
    let server = test_server(&state);

    let response = server.get("/admin/accounts/user").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_unknown_actor() {
    let state = setup_state().await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(404).header();

    let response = server.get("/admin").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_non_staff() {
    let state = setup_state().await;
    let user = create_user(&state, "alice", ExtraFields::default()).await;
    let view = permission_id(&state.db, "view_user").await;
    state
        .permission_repo()
        .set_user_permissions(user.id, &[view])
        .await
        .unwrap();
    let server = test_server(&state);
    let (name, value) = MockAuth::new(user.id).header();

    let response = server
        .get("/admin/accounts/user")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_list_registered_models_for_superuser() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    let response = server.get("/admin").add_header(name, value).await;

    response.assert_status_ok();
    let body: Value = response.json();
    let model = &body["models"][0];
    assert_eq!(model["app_label"], "accounts");
    assert_eq!(model["model_name"], "user");
    assert_eq!(
        model["list_display"],
        json!(["username", "email", "is_staff", "is_active", "last_login"])
    );
    assert_eq!(model["fieldsets"][0]["name"], Value::Null);
    assert_eq!(model["add_form"], "UserCreationForm");
    assert_eq!(model["form"], "UserChangeForm");
}

#[tokio::test]
async fn should_hide_models_without_module_permissions() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff").await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(staff.id).header();

    let response = server.get("/admin").add_header(name, value).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["models"], json!([]));
}

#[tokio::test]
async fn should_list_users_with_list_display_columns() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    create_user(&state, "alice", ExtraFields::default()).await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    let response = server
        .get("/admin/accounts/user")
        .add_query_param("per-page", 1)
        .add_query_param("page", 2)
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["columns"],
        json!(["username", "email", "is_staff", "is_active", "last_login"])
    );
    assert_eq!(body["total"], 2);
    assert_eq!(body["per-page"], 1);
    let row = &body["results"][0];
    assert_eq!(row["username"], "alice");
    assert_eq!(row["email"], "alice@example.com");
    assert_eq!(row["is_staff"], false);
    assert_eq!(row["last_login"], Value::Null);
    assert!(row.get("password").is_none());
}

#[tokio::test]
async fn should_add_user_through_creation_form() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    let response = server
        .post("/admin/accounts/user")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "username": "bob",
            "email": "bob@Example.COM",
            "full_name": "Bob Example",
            "user_type": "IS_CUSTOMER_USER",
            "password1": "pw123",
            "password2": "pw123",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["display"], "bob");
    assert_eq!(body["user_type_display"], "Представитель клиента");
    let fields = &body["fieldsets"][0]["fields"];
    assert_eq!(fields["email"], "bob@example.com");
    assert_eq!(fields["user_type"], "IS_CUSTOMER_USER");
    assert_eq!(fields["groups"], json!([]));
    let summary = fields["password"].as_str().unwrap();
    assert!(summary.starts_with("algorithm: argon2id"));
    assert!(!summary.contains("pw123"));

    let duplicate = server
        .post("/admin/accounts/user")
        .add_header(name, value)
        .json(&json!({
            "username": "bobby",
            "email": "bob@example.com",
            "password1": "pw",
            "password2": "pw",
        }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
    assert_eq!(duplicate.json::<Value>()["kind"], "CONSTRAINT_VIOLATION");
}

#[tokio::test]
async fn should_reject_mismatched_passwords() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    let response = server
        .post("/admin/accounts/user")
        .add_header(name, value)
        .json(&json!({
            "username": "bob",
            "email": "bob@example.com",
            "password1": "one",
            "password2": "two",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "PASSWORD_MISMATCH");
}

#[tokio::test]
async fn should_change_user_and_assignments() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let alice = create_user(&state, "alice", ExtraFields::default()).await;
    let group = create_group(&state.db, "editors", &["change_user"]).await;
    let view = permission_id(&state.db, "view_user").await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    let response = server
        .patch(&format!("/admin/accounts/user/{}", alice.id))
        .add_header(name, value)
        .json(&json!({
            "full_name": "Alice Liddell",
            "is_staff": true,
            "user_type": "IS_EMPLOYEE_USER",
            "groups": [group],
            "user_permissions": [view],
        }))
        .await;

    response.assert_status_ok();
    let fields = &response.json::<Value>()["fieldsets"][0]["fields"];
    assert_eq!(fields["full_name"], "Alice Liddell");
    assert_eq!(fields["is_staff"], true);
    assert_eq!(fields["groups"], json!([group]));
    assert_eq!(fields["user_permissions"], json!([view]));

    let alice = state.user_repo().find_by_id(alice.id).await.unwrap().unwrap();
    let checker = state.permission_checker();
    assert!(checker
        .has_perms(&alice, &["accounts.view_user", "accounts.change_user"])
        .await
        .unwrap());
}

#[tokio::test]
async fn should_leave_user_unchanged_when_assignment_is_rejected() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let alice = create_user(&state, "alice", ExtraFields::default()).await;
    let editors = create_group(&state.db, "editors", &["change_user"]).await;
    let view = permission_id(&state.db, "view_user").await;
    let perms = state.permission_repo();
    perms.set_groups(alice.id, &[editors]).await.unwrap();
    perms.set_user_permissions(alice.id, &[view]).await.unwrap();
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    let unknown_group = server
        .patch(&format!("/admin/accounts/user/{}", alice.id))
        .add_header(name.clone(), value.clone())
        .json(&json!({ "is_staff": true, "full_name": "Changed", "groups": [999] }))
        .await;
    let unknown_permission = server
        .patch(&format!("/admin/accounts/user/{}", alice.id))
        .add_header(name, value)
        .json(&json!({ "is_staff": true, "groups": [], "user_permissions": [999] }))
        .await;

    unknown_group.assert_status(StatusCode::CONFLICT);
    unknown_permission.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        unknown_permission.json::<Value>()["kind"],
        "CONSTRAINT_VIOLATION"
    );
    let stored = state.user_repo().find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(stored, alice);
    let groups = perms.user_groups(alice.id).await.unwrap();
    assert_eq!(groups.iter().map(|g| g.id).collect::<Vec<_>>(), vec![editors]);
    let direct = perms.user_permissions(alice.id).await.unwrap();
    assert_eq!(direct.iter().map(|p| p.id).collect::<Vec<_>>(), vec![view]);
}

#[tokio::test]
async fn should_leave_user_type_label_empty_for_unknown_default() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let alice = create_user(&state, "alice", ExtraFields::default()).await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    let response = server
        .get(&format!("/admin/accounts/user/{}", alice.id))
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["fieldsets"][0]["fields"]["user_type"], "unknown");
    assert!(body["user_type_display"].is_null());
}

#[tokio::test]
async fn should_reject_unknown_user_type_on_change() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let alice = create_user(&state, "alice", ExtraFields::default()).await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    let response = server
        .patch(&format!("/admin/accounts/user/{}", alice.id))
        .add_header(name, value)
        .json(&json!({ "user_type": "unknown" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_USER_TYPE");
}

#[tokio::test]
async fn should_gate_delete_on_delete_permission() {
    let state = setup_state().await;
    let staff = create_staff(&state, "viewer").await;
    let view = permission_id(&state.db, "view_user").await;
    state
        .permission_repo()
        .set_user_permissions(staff.id, &[view])
        .await
        .unwrap();
    let alice = create_user(&state, "alice", ExtraFields::default()).await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(staff.id).header();
    let path = format!("/admin/accounts/user/{}", alice.id);

    server
        .get(&path)
        .add_header(name.clone(), value.clone())
        .await
        .assert_status_ok();
    server
        .delete(&path)
        .add_header(name, value)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let root = create_superuser(&state, "root").await;
    let (name, value) = MockAuth::new(root.id).header();
    server
        .delete(&path)
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let gone = server.get(&path).add_header(name, value).await;
    gone.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(gone.json::<Value>()["kind"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn should_reset_password_and_deactivate() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let alice = create_user(&state, "alice", ExtraFields::default()).await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    server
        .post(&format!("/admin/accounts/user/{}/password", alice.id))
        .add_header(name.clone(), value.clone())
        .json(&json!({ "password": "n3w-secret" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .post(&format!("/admin/accounts/user/{}/deactivate", alice.id))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let alice = state.user_repo().find_by_id(alice.id).await.unwrap().unwrap();
    let hasher = state.hasher();
    assert!(alice.check_password(&hasher, "n3w-secret").await.unwrap());
    assert!(!alice.check_password(&hasher, "secret").await.unwrap());
    assert!(!alice.is_active);
}

#[tokio::test]
async fn should_queue_admin_mail() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;
    let alice = create_user(&state, "alice", ExtraFields::default()).await;
    let server = test_server(&state);
    let (name, value) = MockAuth::new(root.id).header();

    server
        .post(&format!("/admin/accounts/user/{}/email", alice.id))
        .add_header(name, value)
        .json(&json!({
            "subject": "Hello",
            "message": "Your account is ready",
            "from_email": "support@ave.example",
        }))
        .await
        .assert_status(StatusCode::ACCEPTED);

    let rows = outbox_mails::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].from_email, "support@ave.example");
    assert_eq!(rows[0].recipients, json!(["alice@example.com"]));
}

#[tokio::test]
async fn should_serve_health_checks() {
    let state = setup_state().await;
    let server = test_server(&state);

    server.get("/healthz").await.assert_status_ok();
    let response = server.get("/readyz").await;
    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
}
