use ave_accounts::domain::repository::PermissionRepository;
use ave_accounts::domain::types::ExtraFields;
use ave_accounts::error::AccountsServiceError;
use ave_accounts::usecase::user::DeactivateUserUseCase;

use crate::helpers::{create_group, create_superuser, create_user, permission_id, setup_state};

#[tokio::test]
async fn should_inherit_group_permissions() {
    let state = setup_state().await;
    let user = create_user(&state, "alice", ExtraFields::default()).await;
    let group = create_group(&state.db, "viewers", &["view_user"]).await;

    state
        .permission_repo()
        .set_groups(user.id, &[group])
        .await
        .unwrap();

    let checker = state.permission_checker();
    assert!(checker.has_perm(&user, "accounts.view_user").await.unwrap());
    assert!(!checker.has_perm(&user, "accounts.delete_user").await.unwrap());
    assert!(checker.get_user_permissions(&user).await.unwrap().is_empty());
    assert_eq!(
        checker
            .get_group_permissions(&user)
            .await
            .unwrap()
            .into_iter()
            .collect::<Vec<_>>(),
        vec!["accounts.view_user".to_owned()]
    );
    assert!(checker.has_module_perms(&user, "accounts").await.unwrap());
    assert!(!checker.has_module_perms(&user, "billing").await.unwrap());
}

#[tokio::test]
async fn should_replace_direct_permissions() {
    let state = setup_state().await;
    let user = create_user(&state, "bob", ExtraFields::default()).await;
    let view = permission_id(&state.db, "view_user").await;
    let change = permission_id(&state.db, "change_user").await;
    let perms = state.permission_repo();

    perms.set_user_permissions(user.id, &[view, change]).await.unwrap();
    perms.set_user_permissions(user.id, &[change]).await.unwrap();

    let checker = state.permission_checker();
    assert!(checker
        .has_perms(&user, &["accounts.change_user"])
        .await
        .unwrap());
    assert!(!checker
        .has_perms(&user, &["accounts.change_user", "accounts.view_user"])
        .await
        .unwrap());
}

#[tokio::test]
async fn should_grant_nothing_to_inactive_users() {
    let state = setup_state().await;
    let user = create_user(&state, "carol", ExtraFields::default()).await;
    let view = permission_id(&state.db, "view_user").await;
    state
        .permission_repo()
        .set_user_permissions(user.id, &[view])
        .await
        .unwrap();

    let user = DeactivateUserUseCase {
        users: state.user_repo(),
    }
    .execute(user.id)
    .await
    .unwrap();

    let checker = state.permission_checker();
    assert!(checker.get_all_permissions(&user).await.unwrap().is_empty());
    assert!(!checker.has_perm(&user, "accounts.view_user").await.unwrap());
}

#[tokio::test]
async fn should_grant_everything_to_active_superusers() {
    let state = setup_state().await;
    let root = create_superuser(&state, "root").await;

    let checker = state.permission_checker();
    assert!(checker.has_perm(&root, "billing.refund").await.unwrap());
    assert!(checker.has_module_perms(&root, "billing").await.unwrap());
}

#[tokio::test]
async fn should_reject_unknown_group_ids() {
    let state = setup_state().await;
    let user = create_user(&state, "dave", ExtraFields::default()).await;

    let result = state.permission_repo().set_groups(user.id, &[999]).await;

    assert!(matches!(
        result,
        Err(AccountsServiceError::ConstraintViolation(_))
    ));
    assert!(state
        .permission_repo()
        .user_groups(user.id)
        .await
        .unwrap()
        .is_empty());
}
