use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::admin::AdminSite;
use crate::infra::db::{DbPermissionRepository, DbUserRepository};
use crate::infra::mail::OutboxMailer;
use crate::infra::password::Argon2Hasher;
use crate::usecase::manager::UserManager;
use crate::usecase::permission::PermissionChecker;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub admin_site: Arc<AdminSite>,
    pub default_from_email: String,
    pub strict_required_fields: bool,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn permission_repo(&self) -> DbPermissionRepository {
        DbPermissionRepository {
            db: self.db.clone(),
        }
    }

    pub fn permission_checker(&self) -> PermissionChecker<DbPermissionRepository> {
        PermissionChecker {
            perms: self.permission_repo(),
        }
    }

    pub fn hasher(&self) -> Argon2Hasher {
        Argon2Hasher
    }

    pub fn mailer(&self) -> OutboxMailer {
        OutboxMailer {
            db: self.db.clone(),
            default_from_email: self.default_from_email.clone(),
        }
    }

    pub fn manager(&self) -> UserManager<DbUserRepository, Argon2Hasher> {
        UserManager {
            users: self.user_repo(),
            hasher: self.hasher(),
            strict_required_fields: self.strict_required_fields,
        }
    }
}
