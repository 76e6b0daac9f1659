use tracing::info;

use crate::admin::{UserChangeForm, UserCreationForm};
use crate::domain::repository::{PasswordPort, PermissionRepository, UserRepository};
use crate::domain::types::{Group, Permission, User};
use crate::error::AccountsServiceError;
use crate::usecase::manager::UserManager;
use crate::usecase::permission::PermissionChecker;
use crate::usecase::user::load_user;

// ── AuthorizeAdmin ───────────────────────────────────────────────────────────

/// Gate for admin endpoints: the caller must exist, be active staff and,
/// when `permission` is given, hold it.
pub struct AuthorizeAdminUseCase<R: UserRepository, P: PermissionRepository> {
    pub users: R,
    pub checker: PermissionChecker<P>,
}

impl<R: UserRepository, P: PermissionRepository> AuthorizeAdminUseCase<R, P> {
    pub async fn execute(
        &self,
        actor_id: i32,
        permission: Option<&str>,
    ) -> Result<User, AccountsServiceError> {
        let actor = self
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or(AccountsServiceError::Unauthorized)?;
        if !actor.is_active || !actor.is_staff {
            return Err(AccountsServiceError::Forbidden);
        }
        if let Some(perm) = permission {
            if !self.checker.has_perm(&actor, perm).await? {
                return Err(AccountsServiceError::Forbidden);
            }
        }
        Ok(actor)
    }
}

// ── AddUser ──────────────────────────────────────────────────────────────────

/// The admin "add" view: clean the creation form, then go through the manager.
pub struct AddUserUseCase<R: UserRepository, H: PasswordPort> {
    pub manager: UserManager<R, H>,
}

impl<R: UserRepository, H: PasswordPort> AddUserUseCase<R, H> {
    pub async fn execute(&self, form: UserCreationForm) -> Result<User, AccountsServiceError> {
        let cleaned = form.clean()?;
        self.manager
            .create_user(
                &cleaned.username,
                &cleaned.email,
                Some(&cleaned.password),
                cleaned.extra,
            )
            .await
    }
}

// ── UserDetail ───────────────────────────────────────────────────────────────

pub struct UserDetail {
    pub user: User,
    pub groups: Vec<Group>,
    pub user_permissions: Vec<Permission>,
}

pub struct UserDetailUseCase<R: UserRepository, P: PermissionRepository> {
    pub users: R,
    pub perms: P,
}

impl<R: UserRepository, P: PermissionRepository> UserDetailUseCase<R, P> {
    pub async fn execute(&self, user_id: i32) -> Result<UserDetail, AccountsServiceError> {
        let user = load_user(&self.users, user_id).await?;
        let groups = self.perms.user_groups(user_id).await?;
        let user_permissions = self.perms.user_permissions(user_id).await?;
        Ok(UserDetail {
            user,
            groups,
            user_permissions,
        })
    }
}

// ── ChangeUser ───────────────────────────────────────────────────────────────

/// The admin "change" view. Scalar fields and any group or permission
/// replacement are written in one unit; a rejected write leaves the stored
/// user as it was.
pub struct ChangeUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> ChangeUserUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i32,
        form: UserChangeForm,
    ) -> Result<User, AccountsServiceError> {
        let mut user = load_user(&self.users, user_id).await?;
        let assignments = form.apply(&mut user)?;
        self.users.save_with_assignments(&user, &assignments).await?;
        info!(user_id, "user changed via admin");
        Ok(user)
    }
}
