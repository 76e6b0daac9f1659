use tracing::info;

use ave_domain::user::UserType;

use crate::domain::repository::{PasswordPort, UserRepository};
use crate::domain::types::{
    EMAIL_MAX_LEN, ExtraFields, FULL_NAME_MAX_LEN, MOBILE_MAX_LEN, NewUser, User,
    check_max_len, normalize_email, unusable_password, validate_username,
};
use crate::error::AccountsServiceError;

/// Validated construction of accounts: validate, normalize, hash, persist.
pub struct UserManager<R, H>
where
    R: UserRepository,
    H: PasswordPort,
{
    pub users: R,
    pub hasher: H,
    /// Also require `full_name` and a real `user_type` at creation.
    pub strict_required_fields: bool,
}

impl<R, H> UserManager<R, H>
where
    R: UserRepository,
    H: PasswordPort,
{
    /// Create and save a user. `password: None` stores an unusable password.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<User, AccountsServiceError> {
        if email.is_empty() {
            return Err(AccountsServiceError::EmailRequired);
        }
        let full_name = extra.full_name.unwrap_or_default();
        let user_type = extra.user_type.unwrap_or_default();
        if self.strict_required_fields {
            if full_name.trim().is_empty() {
                return Err(AccountsServiceError::FullNameRequired);
            }
            if !user_type.is_choice() {
                return Err(AccountsServiceError::UserTypeRequired);
            }
        }
        if !validate_username(username) {
            return Err(AccountsServiceError::InvalidUsername);
        }

        let email = normalize_email(email);
        check_max_len("email", &email, EMAIL_MAX_LEN)?;
        check_max_len("full_name", &full_name, FULL_NAME_MAX_LEN)?;
        if let Some(ref mobile) = extra.mobile {
            check_max_len("mobile", mobile, MOBILE_MAX_LEN)?;
        }

        let password = match password {
            Some(raw) => self.hasher.hash(raw).await?,
            None => unusable_password(),
        };

        let user = self
            .users
            .insert(&NewUser {
                password,
                is_superuser: extra.is_superuser.unwrap_or(false),
                username: username.to_owned(),
                email,
                full_name,
                mobile: extra.mobile,
                user_type,
                is_active: extra.is_active.unwrap_or(true),
                is_staff: extra.is_staff.unwrap_or(false),
            })
            .await?;

        info!(
            user_id = user.id,
            is_staff = user.is_staff,
            is_superuser = user.is_superuser,
            "user created"
        );
        Ok(user)
    }

    /// Create and save a superuser. The privilege flags default to `true`;
    /// an explicit `false` is rejected.
    pub async fn create_superuser(
        &self,
        username: &str,
        email: &str,
        password: Option<&str>,
        mut extra: ExtraFields,
    ) -> Result<User, AccountsServiceError> {
        let is_staff = *extra.is_staff.get_or_insert(true);
        let is_superuser = *extra.is_superuser.get_or_insert(true);
        extra.is_active.get_or_insert(true);

        if !is_staff {
            return Err(AccountsServiceError::SuperuserMustBeStaff);
        }
        if !is_superuser {
            return Err(AccountsServiceError::SuperuserMustBeSuperuser);
        }
        self.create_user(username, email, password, extra).await
    }
}

/// Strict-mode helper for callers that collect a user type as text.
pub fn parse_user_type(value: &str) -> Result<UserType, AccountsServiceError> {
    value
        .parse::<UserType>()
        .ok()
        .filter(|t| t.is_choice())
        .ok_or(AccountsServiceError::InvalidUserType)
}
