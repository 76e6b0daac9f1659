use sea_orm::EntityTrait;

use ave_accounts::domain::repository::UserRepository;
use ave_accounts::domain::types::ExtraFields;
use ave_accounts::error::AccountsServiceError;
use ave_accounts::usecase::manager::UserManager;
use ave_accounts::usecase::user::{EmailUserInput, EmailUserUseCase};
use ave_accounts_schema::outbox_mails;
use ave_domain::pagination::PageRequest;
use ave_domain::user::UserType;

use crate::helpers::{create_user, setup_state};

async fn user_count(state: &ave_accounts::state::AppState) -> u64 {
    state
        .user_repo()
        .list(PageRequest::default())
        .await
        .unwrap()
        .total
}

#[tokio::test]
async fn should_persist_hashed_user_with_normalized_domain() {
    let state = setup_state().await;

    let user = state
        .manager()
        .create_user(
            "alice",
            "Alice@Example.com",
            Some("pw123"),
            ExtraFields::default(),
        )
        .await
        .unwrap();

    assert!(user.id > 0);
    assert_eq!(user.email, "Alice@example.com");
    assert!(user.is_active);
    assert!(!user.is_staff);
    assert!(!user.is_superuser);
    assert_eq!(user.user_type, UserType::Unknown);
    assert_ne!(user.password, "pw123");
    assert!(user.password.starts_with("$argon2id$"));
    assert!(user.check_password(&state.hasher(), "pw123").await.unwrap());

    let stored = state.user_repo().find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored, user);
    assert_eq!(stored.get_full_name(), "");
    assert_eq!(stored.get_short_name(), "Alice@example.com");
}

#[tokio::test]
async fn should_reject_duplicate_email_with_storage_message() {
    let state = setup_state().await;
    create_user(&state, "alice", ExtraFields::default()).await;

    let result = state
        .manager()
        .create_user(
            "bob",
            "alice@example.com",
            Some("pw"),
            ExtraFields::default(),
        )
        .await;

    match result {
        Err(AccountsServiceError::ConstraintViolation(message)) => {
            assert!(!message.is_empty());
        }
        other => panic!("expected ConstraintViolation, got {other:?}"),
    }
    assert_eq!(user_count(&state).await, 1);
}

#[tokio::test]
async fn should_reject_duplicate_username() {
    let state = setup_state().await;
    create_user(&state, "alice", ExtraFields::default()).await;

    let result = state
        .manager()
        .create_user(
            "alice",
            "other@example.com",
            Some("pw"),
            ExtraFields::default(),
        )
        .await;

    assert!(matches!(
        result,
        Err(AccountsServiceError::ConstraintViolation(_))
    ));
}

#[tokio::test]
async fn should_not_write_when_email_empty() {
    let state = setup_state().await;

    let result = state
        .manager()
        .create_user("carol", "", Some("pw"), ExtraFields::default())
        .await;

    assert!(matches!(result, Err(AccountsServiceError::EmailRequired)));
    assert_eq!(user_count(&state).await, 0);
}

#[tokio::test]
async fn should_create_superuser_and_reject_explicit_non_staff() {
    let state = setup_state().await;

    let root = state
        .manager()
        .create_superuser("root", "root@example.com", Some("pw"), ExtraFields::default())
        .await
        .unwrap();
    assert!(root.is_staff && root.is_superuser && root.is_active);

    let result = state
        .manager()
        .create_superuser(
            "root2",
            "root2@example.com",
            Some("pw"),
            ExtraFields {
                is_staff: Some(false),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::SuperuserMustBeStaff)
    ));
    assert_eq!(user_count(&state).await, 1);
}

#[tokio::test]
async fn should_store_unusable_password_when_none_given() {
    let state = setup_state().await;

    let user = state
        .manager()
        .create_user("dave", "dave@example.com", None, ExtraFields::default())
        .await
        .unwrap();

    assert!(!user.has_usable_password());
    assert!(!user.check_password(&state.hasher(), "").await.unwrap());
}

#[tokio::test]
async fn should_enforce_required_fields_in_strict_mode() {
    let state = setup_state().await;
    let manager = UserManager {
        users: state.user_repo(),
        hasher: state.hasher(),
        strict_required_fields: true,
    };

    let result = manager
        .create_user("erin", "erin@example.com", Some("pw"), ExtraFields::default())
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::FullNameRequired)
    ));

    let user = manager
        .create_user(
            "erin",
            "erin@example.com",
            Some("pw"),
            ExtraFields {
                full_name: Some("Erin Example".into()),
                user_type: Some(UserType::Employee),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(user.user_type, UserType::Employee);
    assert_eq!(user_count(&state).await, 1);
}

#[tokio::test]
async fn should_queue_mail_in_outbox_with_default_sender() {
    let state = setup_state().await;
    let user = create_user(&state, "frank", ExtraFields::default()).await;

    let uc = EmailUserUseCase {
        users: state.user_repo(),
        mailer: state.mailer(),
    };
    uc.execute(
        user.id,
        EmailUserInput {
            subject: "Welcome".into(),
            message: "Hello Frank".into(),
            from_email: None,
        },
    )
    .await
    .unwrap();

    let rows = outbox_mails::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subject, "Welcome");
    assert_eq!(rows[0].from_email, "webmaster@localhost");
    assert_eq!(rows[0].recipients, serde_json::json!(["frank@example.com"]));
    assert!(rows[0].sent_at.is_none());
}
