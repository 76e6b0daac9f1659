#![allow(async_fn_in_trait)]

use ave_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Assignments, Group, NewUser, OutgoingMail, Permission, User};
use crate::error::AccountsServiceError;

/// Persistence for accounts. Uniqueness of `username`/`email` is enforced by
/// storage; duplicates surface as `ConstraintViolation`.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AccountsServiceError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, AccountsServiceError>;

    /// Single durable write. Returns the stored user with its id.
    async fn insert(&self, user: &NewUser) -> Result<User, AccountsServiceError>;

    /// Write every field of an existing user back.
    async fn save(&self, user: &User) -> Result<(), AccountsServiceError>;

    /// `save` plus the present assignment sets, all or nothing.
    async fn save_with_assignments(
        &self,
        user: &User,
        assignments: &Assignments,
    ) -> Result<(), AccountsServiceError>;

    /// Hard delete. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, AccountsServiceError>;

    /// Users ordered by id.
    async fn list(&self, page: PageRequest) -> Result<Page<User>, AccountsServiceError>;
}

/// Group and permission lookup for the permissions capability.
pub trait PermissionRepository: Send + Sync {
    /// Permissions granted to the user directly.
    async fn user_permissions(&self, user_id: i32)
    -> Result<Vec<Permission>, AccountsServiceError>;

    /// Permissions granted through the user's groups.
    async fn group_permissions(
        &self,
        user_id: i32,
    ) -> Result<Vec<Permission>, AccountsServiceError>;

    async fn user_groups(&self, user_id: i32) -> Result<Vec<Group>, AccountsServiceError>;

    /// Replace the user's group memberships.
    async fn set_groups(&self, user_id: i32, group_ids: &[i32])
    -> Result<(), AccountsServiceError>;

    /// Replace the user's direct permissions.
    async fn set_user_permissions(
        &self,
        user_id: i32,
        permission_ids: &[i32],
    ) -> Result<(), AccountsServiceError>;
}

/// One-way salted password hashing.
pub trait PasswordPort: Send + Sync {
    async fn hash(&self, raw: &str) -> Result<String, AccountsServiceError>;
    async fn verify(&self, raw: &str, encoded: &str) -> Result<bool, AccountsServiceError>;
}

/// Outbound mail collaborator.
pub trait MailPort: Send + Sync {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), AccountsServiceError>;
}
