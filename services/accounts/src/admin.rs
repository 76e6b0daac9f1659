//! Declarative admin-panel configuration.
//!
//! [`ModelAdmin`] values only describe which columns a list view shows, how
//! the edit form is grouped and which forms back "add" and "change". The
//! [`AdminSite`] registry is built once at bootstrap and carried in
//! `AppState`; nothing registers itself at import time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use ave_core::serde::rfc3339_ms;
use ave_domain::user::UserType;

use crate::domain::types::{
    Assignments, EMAIL_MAX_LEN, ExtraFields, FULL_NAME_MAX_LEN, User, check_max_len,
    is_usable_password, normalize_email, validate_username,
};
use crate::error::AccountsServiceError;

/// A titled group of fields on the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fieldset {
    pub name: Option<&'static str>,
    pub fields: &'static [&'static str],
}

/// Admin configuration for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelAdmin {
    pub app_label: &'static str,
    pub model_name: &'static str,
    pub verbose_name: &'static str,
    pub list_display: &'static [&'static str],
    pub fieldsets: &'static [Fieldset],
    /// Form backing the "add" view.
    pub add_form: &'static str,
    /// Form backing the "change" view.
    pub form: &'static str,
}

impl ModelAdmin {
    /// Registry key, `"{app_label}.{model_name}"`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }

    /// `"{app_label}.{action}_{model_name}"`, e.g. `accounts.change_user`.
    pub fn permission(&self, action: &str) -> String {
        format!("{}.{}_{}", self.app_label, action, self.model_name)
    }
}

pub const USER_ADMIN: ModelAdmin = ModelAdmin {
    app_label: "accounts",
    model_name: "user",
    verbose_name: "Пользователь",
    list_display: &["username", "email", "is_staff", "is_active", "last_login"],
    fieldsets: &[Fieldset {
        name: None,
        fields: &[
            "username",
            "email",
            "full_name",
            "is_staff",
            "is_active",
            "groups",
            "password",
            "user_type",
            "user_permissions",
        ],
    }],
    add_form: "UserCreationForm",
    form: "UserChangeForm",
};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("model {0} is already registered")]
    AlreadyRegistered(String),
}

/// Registry of models exposed through the admin endpoints.
#[derive(Debug, Clone, Default)]
pub struct AdminSite {
    registry: BTreeMap<String, ModelAdmin>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// The site the service runs with. Call once during startup.
    pub fn bootstrap() -> Result<Self, AdminError> {
        let mut site = Self::new();
        site.register(USER_ADMIN)?;
        Ok(site)
    }

    pub fn register(&mut self, admin: ModelAdmin) -> Result<(), AdminError> {
        let key = admin.key();
        if self.registry.contains_key(&key) {
            return Err(AdminError::AlreadyRegistered(key));
        }
        tracing::debug!(model = %key, "admin model registered");
        self.registry.insert(key, admin);
        Ok(())
    }

    pub fn get(&self, app_label: &str, model_name: &str) -> Option<&ModelAdmin> {
        self.registry.get(&format!("{app_label}.{model_name}"))
    }

    pub fn is_registered(&self, app_label: &str, model_name: &str) -> bool {
        self.get(app_label, model_name).is_some()
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelAdmin> {
        self.registry.values()
    }
}

// ── Field rendering ──────────────────────────────────────────────────────────

/// Human-readable summary of a stored password; never the hash itself.
pub fn password_summary(encoded: &str) -> String {
    if !is_usable_password(encoded) {
        return "No password set.".to_owned();
    }
    // PHC: $<algorithm>$v=<version>$<params>$<salt>$<hash>
    let parts: Vec<&str> = encoded.split('$').collect();
    match parts.as_slice() {
        ["", algorithm, _version, params, _salt, hash] => {
            let shown: String = hash.chars().take(6).collect();
            format!("algorithm: {algorithm} params: {params} hash: {shown}**********")
        }
        _ => "Invalid password format or unknown hashing algorithm.".to_owned(),
    }
}

/// Value of one admin field for `user`; `None` for names the user model lacks.
///
/// `groups` and `user_permissions` come from the permissions capability.
pub fn user_field_value(
    user: &User,
    field: &str,
    groups: &[i32],
    user_permissions: &[i32],
) -> Option<Value> {
    let value = match field {
        "id" => json!(user.id),
        "username" => json!(user.username),
        "email" => json!(user.email),
        "full_name" => json!(user.full_name),
        "mobile" => json!(user.mobile),
        "user_type" => json!(user.user_type),
        "is_active" => json!(user.is_active),
        "is_staff" => json!(user.is_staff),
        "is_superuser" => json!(user.is_superuser),
        "last_login" => json!(user.last_login.as_ref().map(rfc3339_ms)),
        "password" => json!(password_summary(&user.password)),
        "groups" => json!(groups),
        "user_permissions" => json!(user_permissions),
        _ => return None,
    };
    Some(value)
}

/// One changelist row: the `list_display` columns plus the id.
pub fn list_row(admin: &ModelAdmin, user: &User) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert("id".to_owned(), json!(user.id));
    for field in admin.list_display {
        if let Some(value) = user_field_value(user, field, &[], &[]) {
            row.insert((*field).to_owned(), value);
        }
    }
    row
}

// ── Forms ────────────────────────────────────────────────────────────────────

/// Backs the "add" view.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreationForm {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub user_type: Option<UserType>,
    pub password1: String,
    pub password2: String,
}

/// Cleaned "add" form: arguments for `UserManager::create_user`.
#[derive(Debug)]
pub struct CleanedCreation {
    pub username: String,
    pub email: String,
    pub password: String,
    pub extra: ExtraFields,
}

impl UserCreationForm {
    pub fn clean(self) -> Result<CleanedCreation, AccountsServiceError> {
        if self.password1.is_empty() {
            return Err(AccountsServiceError::MissingData);
        }
        if self.password1 != self.password2 {
            return Err(AccountsServiceError::PasswordMismatch);
        }
        if let Some(user_type) = self.user_type {
            if !user_type.is_choice() {
                return Err(AccountsServiceError::InvalidUserType);
            }
        }
        Ok(CleanedCreation {
            username: self.username,
            email: self.email,
            password: self.password1,
            extra: ExtraFields {
                full_name: self.full_name,
                mobile: self.mobile,
                user_type: self.user_type,
                ..Default::default()
            },
        })
    }
}

/// Backs the "change" view: the edit fieldset minus `password`, which is
/// read-only here and changed through the password endpoint. Absent fields
/// are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChangeForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub groups: Option<Vec<i32>>,
    pub user_type: Option<UserType>,
    pub user_permissions: Option<Vec<i32>>,
}

impl UserChangeForm {
    fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.is_staff.is_none()
            && self.is_active.is_none()
            && self.groups.is_none()
            && self.user_type.is_none()
            && self.user_permissions.is_none()
    }

    /// Validate every field, then copy the present ones onto `user`.
    /// `user` is untouched when validation fails.
    pub fn apply(self, user: &mut User) -> Result<Assignments, AccountsServiceError> {
        if self.is_empty() {
            return Err(AccountsServiceError::MissingData);
        }
        if let Some(ref username) = self.username {
            if !validate_username(username) {
                return Err(AccountsServiceError::InvalidUsername);
            }
        }
        let email = match self.email {
            Some(ref email) if email.is_empty() => {
                return Err(AccountsServiceError::EmailRequired);
            }
            Some(ref email) => {
                let email = normalize_email(email);
                check_max_len("email", &email, EMAIL_MAX_LEN)?;
                Some(email)
            }
            None => None,
        };
        if let Some(ref full_name) = self.full_name {
            check_max_len("full_name", full_name, FULL_NAME_MAX_LEN)?;
        }
        if let Some(user_type) = self.user_type {
            if !user_type.is_choice() {
                return Err(AccountsServiceError::InvalidUserType);
            }
        }

        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(is_staff) = self.is_staff {
            user.is_staff = is_staff;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        if let Some(user_type) = self.user_type {
            user.user_type = user_type;
        }
        Ok(Assignments {
            groups: self.groups,
            user_permissions: self.user_permissions,
        })
    }
}
