use chrono::Utc;
use tracing::{info, warn};

use ave_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{MailPort, PasswordPort, UserRepository};
use crate::domain::types::User;
use crate::error::AccountsServiceError;

pub(crate) async fn load_user<R: UserRepository>(
    users: &R,
    user_id: i32,
) -> Result<User, AccountsServiceError> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or(AccountsServiceError::UserNotFound)
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Page<User>, AccountsServiceError> {
        self.users.list(page.clamped()).await
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

/// Password reset: assign a new hash, then save.
pub struct SetPasswordUseCase<R: UserRepository, H: PasswordPort> {
    pub users: R,
    pub hasher: H,
}

impl<R: UserRepository, H: PasswordPort> SetPasswordUseCase<R, H> {
    /// `password: None` disables password login for the user.
    pub async fn execute(
        &self,
        user_id: i32,
        password: Option<&str>,
    ) -> Result<(), AccountsServiceError> {
        let mut user = load_user(&self.users, user_id).await?;
        match password {
            Some(raw) => user.set_password(&self.hasher, raw).await?,
            None => user.set_unusable_password(),
        }
        self.users.save(&user).await?;
        info!(user_id, "password changed");
        Ok(())
    }
}

// ── DeactivateUser ───────────────────────────────────────────────────────────

/// Accounts are deactivated rather than soft-deleted.
pub struct DeactivateUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> DeactivateUserUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<User, AccountsServiceError> {
        let mut user = load_user(&self.users, user_id).await?;
        user.is_active = false;
        self.users.save(&user).await?;
        info!(user_id, "user deactivated");
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<(), AccountsServiceError> {
        if !self.users.delete(user_id).await? {
            return Err(AccountsServiceError::UserNotFound);
        }
        info!(user_id, "user deleted");
        Ok(())
    }
}

// ── RecordLogin ──────────────────────────────────────────────────────────────

/// Stamp `last_login` once the caller's login flow has accepted the user.
pub struct RecordLoginUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> RecordLoginUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<User, AccountsServiceError> {
        let mut user = load_user(&self.users, user_id).await?;
        if !user.is_active {
            warn!(user_id, "login recorded for inactive user");
        }
        user.last_login = Some(Utc::now());
        self.users.save(&user).await?;
        Ok(user)
    }
}

// ── EmailUser ────────────────────────────────────────────────────────────────

pub struct EmailUserInput {
    pub subject: String,
    pub message: String,
    pub from_email: Option<String>,
}

pub struct EmailUserUseCase<R: UserRepository, M: MailPort> {
    pub users: R,
    pub mailer: M,
}

impl<R: UserRepository, M: MailPort> EmailUserUseCase<R, M> {
    pub async fn execute(
        &self,
        user_id: i32,
        input: EmailUserInput,
    ) -> Result<(), AccountsServiceError> {
        let user = load_user(&self.users, user_id).await?;
        user.email_user(
            &self.mailer,
            &input.subject,
            &input.message,
            input.from_email.as_deref(),
        )
        .await
    }
}
