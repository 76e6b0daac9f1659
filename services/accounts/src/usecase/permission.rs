use std::collections::BTreeSet;

use crate::domain::repository::PermissionRepository;
use crate::domain::types::User;
use crate::error::AccountsServiceError;

/// Permission checks composed over a [`PermissionRepository`].
///
/// Inactive users hold no permissions; active superusers hold all of them.
pub struct PermissionChecker<P: PermissionRepository> {
    pub perms: P,
}

impl<P: PermissionRepository> PermissionChecker<P> {
    pub async fn get_user_permissions(
        &self,
        user: &User,
    ) -> Result<BTreeSet<String>, AccountsServiceError> {
        if !user.is_active {
            return Ok(BTreeSet::new());
        }
        let perms = self.perms.user_permissions(user.id).await?;
        Ok(perms.iter().map(|p| p.key()).collect())
    }

    pub async fn get_group_permissions(
        &self,
        user: &User,
    ) -> Result<BTreeSet<String>, AccountsServiceError> {
        if !user.is_active {
            return Ok(BTreeSet::new());
        }
        let perms = self.perms.group_permissions(user.id).await?;
        Ok(perms.iter().map(|p| p.key()).collect())
    }

    pub async fn get_all_permissions(
        &self,
        user: &User,
    ) -> Result<BTreeSet<String>, AccountsServiceError> {
        let mut all = self.get_user_permissions(user).await?;
        all.extend(self.get_group_permissions(user).await?);
        Ok(all)
    }

    pub async fn has_perm(&self, user: &User, perm: &str) -> Result<bool, AccountsServiceError> {
        if user.is_active && user.is_superuser {
            return Ok(true);
        }
        Ok(self.get_all_permissions(user).await?.contains(perm))
    }

    pub async fn has_perms(
        &self,
        user: &User,
        perms: &[&str],
    ) -> Result<bool, AccountsServiceError> {
        if user.is_active && user.is_superuser {
            return Ok(true);
        }
        let all = self.get_all_permissions(user).await?;
        Ok(perms.iter().all(|p| all.contains(*p)))
    }

    /// Whether the user holds any permission in `app_label`.
    pub async fn has_module_perms(
        &self,
        user: &User,
        app_label: &str,
    ) -> Result<bool, AccountsServiceError> {
        if user.is_active && user.is_superuser {
            return Ok(true);
        }
        let prefix = format!("{app_label}.");
        Ok(self
            .get_all_permissions(user)
            .await?
            .iter()
            .any(|p| p.starts_with(&prefix)))
    }
}
