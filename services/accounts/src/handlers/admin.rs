use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ave_auth_types::identity::IdentityHeaders;
use ave_domain::pagination::PageRequest;

use crate::admin::{
    ModelAdmin, USER_ADMIN, UserChangeForm, UserCreationForm, list_row, user_field_value,
};
use crate::domain::types::User;
use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::admin::{
    AddUserUseCase, AuthorizeAdminUseCase, ChangeUserUseCase, UserDetail, UserDetailUseCase,
};
use crate::usecase::user::{
    DeactivateUserUseCase, DeleteUserUseCase, EmailUserInput, EmailUserUseCase,
    ListUsersUseCase, SetPasswordUseCase,
};

fn user_admin(state: &AppState) -> Result<&ModelAdmin, AccountsServiceError> {
    state
        .admin_site
        .get(USER_ADMIN.app_label, USER_ADMIN.model_name)
        .ok_or(AccountsServiceError::ModelNotRegistered)
}

/// Resolve the acting user and enforce staff status plus `action` on the
/// user model (`view`, `add`, `change`, `delete`).
async fn authorize(
    state: &AppState,
    identity: IdentityHeaders,
    action: Option<&str>,
) -> Result<User, AccountsServiceError> {
    let permission = match action {
        Some(action) => Some(user_admin(state)?.permission(action)),
        None => None,
    };
    let usecase = AuthorizeAdminUseCase {
        users: state.user_repo(),
        checker: state.permission_checker(),
    };
    usecase
        .execute(identity.user_id, permission.as_deref())
        .await
}

// ── GET /admin ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminIndexResponse {
    pub models: Vec<ModelAdmin>,
}

/// Registered models the acting user holds any permission for.
pub async fn admin_index(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<AdminIndexResponse>, AccountsServiceError> {
    let actor = authorize(&state, identity, None).await?;
    let checker = state.permission_checker();
    let mut models = Vec::new();
    for admin in state.admin_site.models() {
        if checker.has_module_perms(&actor, admin.app_label).await? {
            models.push(*admin);
        }
    }
    Ok(Json(AdminIndexResponse { models }))
}

// ── GET /admin/accounts/user ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ChangelistResponse {
    pub columns: &'static [&'static str],
    pub results: Vec<Map<String, Value>>,
    pub total: u64,
    pub page: u32,
    #[serde(rename = "per-page")]
    pub per_page: u32,
}

pub async fn user_changelist(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<ChangelistResponse>, AccountsServiceError> {
    authorize(&state, identity, Some("view")).await?;
    let admin = user_admin(&state)?;
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let page = usecase.execute(page).await?.map(|u| list_row(admin, &u));
    Ok(Json(ChangelistResponse {
        columns: admin.list_display,
        results: page.items,
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    }))
}

// ── GET /admin/accounts/user/{id} ────────────────────────────────────────────

#[derive(Serialize)]
pub struct FieldsetResponse {
    pub name: Option<&'static str>,
    pub fields: Map<String, Value>,
}

#[derive(Serialize)]
pub struct UserDetailResponse {
    pub id: i32,
    pub display: String,
    #[serde(serialize_with = "ave_core::serde::opt_to_rfc3339_ms")]
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    /// Choice label of `user_type`; `None` for the `unknown` default.
    pub user_type_display: Option<&'static str>,
    pub fieldsets: Vec<FieldsetResponse>,
}

fn detail_response(admin: &ModelAdmin, detail: UserDetail) -> UserDetailResponse {
    let group_ids: Vec<i32> = detail.groups.iter().map(|g| g.id).collect();
    let permission_ids: Vec<i32> = detail.user_permissions.iter().map(|p| p.id).collect();
    let fieldsets = admin
        .fieldsets
        .iter()
        .map(|fieldset| FieldsetResponse {
            name: fieldset.name,
            fields: fieldset
                .fields
                .iter()
                .filter_map(|field| {
                    user_field_value(&detail.user, field, &group_ids, &permission_ids)
                        .map(|value| ((*field).to_owned(), value))
                })
                .collect(),
        })
        .collect();
    UserDetailResponse {
        id: detail.user.id,
        display: detail.user.to_string(),
        last_login: detail.user.last_login,
        user_type_display: detail.user.user_type.label(),
        fieldsets,
    }
}

async fn load_detail(
    state: &AppState,
    user_id: i32,
) -> Result<UserDetailResponse, AccountsServiceError> {
    let usecase = UserDetailUseCase {
        users: state.user_repo(),
        perms: state.permission_repo(),
    };
    let detail = usecase.execute(user_id).await?;
    Ok(detail_response(user_admin(state)?, detail))
}

pub async fn user_detail(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserDetailResponse>, AccountsServiceError> {
    authorize(&state, identity, Some("view")).await?;
    Ok(Json(load_detail(&state, user_id).await?))
}

// ── POST /admin/accounts/user ────────────────────────────────────────────────

pub async fn user_add(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(form): Json<UserCreationForm>,
) -> Result<(StatusCode, Json<UserDetailResponse>), AccountsServiceError> {
    authorize(&state, identity, Some("add")).await?;
    let usecase = AddUserUseCase {
        manager: state.manager(),
    };
    let user = usecase.execute(form).await?;
    Ok((StatusCode::CREATED, Json(load_detail(&state, user.id).await?)))
}

// ── PATCH /admin/accounts/user/{id} ──────────────────────────────────────────

pub async fn user_change(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(form): Json<UserChangeForm>,
) -> Result<Json<UserDetailResponse>, AccountsServiceError> {
    authorize(&state, identity, Some("change")).await?;
    let usecase = ChangeUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(user_id, form).await?;
    Ok(Json(load_detail(&state, user_id).await?))
}

// ── DELETE /admin/accounts/user/{id} ─────────────────────────────────────────

pub async fn user_delete(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, AccountsServiceError> {
    authorize(&state, identity, Some("delete")).await?;
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /admin/accounts/user/{id}/password ──────────────────────────────────

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    /// `null` disables password login.
    pub password: Option<String>,
}

pub async fn user_set_password(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<SetPasswordRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    authorize(&state, identity, Some("change")).await?;
    let usecase = SetPasswordUseCase {
        users: state.user_repo(),
        hasher: state.hasher(),
    };
    usecase.execute(user_id, body.password.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /admin/accounts/user/{id}/deactivate ────────────────────────────────

pub async fn user_deactivate(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, AccountsServiceError> {
    authorize(&state, identity, Some("change")).await?;
    let usecase = DeactivateUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /admin/accounts/user/{id}/email ─────────────────────────────────────

#[derive(Deserialize)]
pub struct EmailUserRequest {
    pub subject: String,
    pub message: String,
    pub from_email: Option<String>,
}

pub async fn user_email(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<EmailUserRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    authorize(&state, identity, Some("change")).await?;
    let usecase = EmailUserUseCase {
        users: state.user_repo(),
        mailer: state.mailer(),
    };
    usecase
        .execute(
            user_id,
            EmailUserInput {
                subject: body.subject,
                message: body.message,
                from_email: body.from_email,
            },
        )
        .await?;
    Ok(StatusCode::ACCEPTED)
}
