use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use ave_domain::user::UserType;

use crate::domain::repository::{MailPort, PasswordPort};
use crate::error::AccountsServiceError;

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const FULL_NAME_MAX_LEN: usize = 255;
pub const MOBILE_MAX_LEN: usize = 20;

/// Stored passwords starting with this marker never verify.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Persisted account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    /// PHC-encoded hash, or an unusable marker.
    pub password: String,
    pub last_login: Option<DateTime<Utc>>,
    pub is_superuser: bool,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub mobile: Option<String>,
    pub user_type: UserType,
    pub is_active: bool,
    pub is_staff: bool,
}

/// Account about to be inserted; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub password: String,
    pub is_superuser: bool,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub mobile: Option<String>,
    pub user_type: UserType,
    pub is_active: bool,
    pub is_staff: bool,
}

impl User {
    pub fn get_full_name(&self) -> &str {
        &self.full_name
    }

    pub fn get_short_name(&self) -> &str {
        &self.email
    }

    pub fn has_usable_password(&self) -> bool {
        is_usable_password(&self.password)
    }

    /// Replace the stored hash. The caller still has to save the user.
    pub async fn set_password<H: PasswordPort>(
        &mut self,
        hasher: &H,
        raw: &str,
    ) -> Result<(), AccountsServiceError> {
        self.password = hasher.hash(raw).await?;
        Ok(())
    }

    pub fn set_unusable_password(&mut self) {
        self.password = unusable_password();
    }

    pub async fn check_password<H: PasswordPort>(
        &self,
        hasher: &H,
        raw: &str,
    ) -> Result<bool, AccountsServiceError> {
        if !self.has_usable_password() {
            return Ok(false);
        }
        hasher.verify(raw, &self.password).await
    }

    /// Send a mail to this user alone. Delivery is the mailer's concern.
    pub async fn email_user<M: MailPort>(
        &self,
        mailer: &M,
        subject: &str,
        message: &str,
        from_email: Option<&str>,
    ) -> Result<(), AccountsServiceError> {
        mailer
            .send_mail(&OutgoingMail {
                subject: subject.to_owned(),
                message: message.to_owned(),
                from_email: from_email.map(str::to_owned),
                recipients: vec![self.email.clone()],
            })
            .await
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// Optional fields accepted by the manager's creation routines.
///
/// `None` means "use the default"; `create_superuser` fills the privilege
/// flags before delegating.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtraFields {
    pub full_name: Option<String>,
    pub mobile: Option<String>,
    pub user_type: Option<UserType>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// A grantable permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: i32,
    pub app_label: String,
    pub codename: String,
    pub name: String,
}

impl Permission {
    /// `"{app_label}.{codename}"`, the form used by permission checks.
    pub fn key(&self) -> String {
        format!("{}.{}", self.app_label, self.codename)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i32,
    pub name: String,
}

/// Replacement group and direct-permission sets. `None` leaves a set as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    pub groups: Option<Vec<i32>>,
    pub user_permissions: Option<Vec<i32>>,
}

/// Mail handed to the mail collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub message: String,
    /// `None` falls back to the configured default sender.
    pub from_email: Option<String>,
    pub recipients: Vec<String>,
}

/// Lower-case the domain part of an address (split on the last `@`).
/// Input without `@` is returned unchanged.
pub fn normalize_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}

/// Unicode letters and digits plus `@ . + - _`, 1-150 characters.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if len == 0 || len > USERNAME_MAX_LEN {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

pub fn is_usable_password(encoded: &str) -> bool {
    !encoded.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

pub fn unusable_password() -> String {
    format!("{UNUSABLE_PASSWORD_PREFIX}{}", Uuid::new_v4().simple())
}

/// Reject values longer than their column allows.
pub fn check_max_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), AccountsServiceError> {
    if value.chars().count() > max {
        return Err(AccountsServiceError::FieldTooLong(field));
    }
    Ok(())
}
