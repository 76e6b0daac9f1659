use std::sync::Arc;

use axum_test::TestServer;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter,
};

use ave_accounts::admin::AdminSite;
use ave_accounts::domain::types::{ExtraFields, User};
use ave_accounts::router::build_router;
use ave_accounts::state::AppState;
use ave_accounts_migration::{Migrator, MigratorTrait};
use ave_accounts_schema::{auth_group_permissions, auth_groups, auth_permissions};

/// In-memory SQLite with every migration applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    db
}

pub async fn setup_state() -> AppState {
    AppState {
        db: setup_db().await,
        admin_site: Arc::new(AdminSite::bootstrap().unwrap()),
        default_from_email: "webmaster@localhost".to_owned(),
        strict_required_fields: false,
    }
}

pub fn test_server(state: &AppState) -> TestServer {
    TestServer::new(build_router(state.clone())).unwrap()
}

pub async fn create_user(state: &AppState, username: &str, extra: ExtraFields) -> User {
    state
        .manager()
        .create_user(
            username,
            &format!("{username}@example.com"),
            Some("secret"),
            extra,
        )
        .await
        .unwrap()
}

pub async fn create_staff(state: &AppState, username: &str) -> User {
    create_user(
        state,
        username,
        ExtraFields {
            is_staff: Some(true),
            ..Default::default()
        },
    )
    .await
}

pub async fn create_superuser(state: &AppState, username: &str) -> User {
    state
        .manager()
        .create_superuser(
            username,
            &format!("{username}@example.com"),
            Some("secret"),
            ExtraFields::default(),
        )
        .await
        .unwrap()
}

/// Id of a seeded `accounts.<codename>` permission.
pub async fn permission_id(db: &DatabaseConnection, codename: &str) -> i32 {
    auth_permissions::Entity::find()
        .filter(auth_permissions::Column::AppLabel.eq("accounts"))
        .filter(auth_permissions::Column::Codename.eq(codename))
        .one(db)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("permission accounts.{codename} not seeded"))
        .id
}

/// Create a group holding the given seeded permissions.
pub async fn create_group(db: &DatabaseConnection, name: &str, codenames: &[&str]) -> i32 {
    let group = auth_groups::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    for codename in codenames {
        auth_group_permissions::ActiveModel {
            group_id: Set(group.id),
            permission_id: Set(permission_id(db, codename).await),
        }
        .insert(db)
        .await
        .unwrap();
    }
    group.id
}
