use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionError, TransactionTrait,
};
use tracing::warn;

use ave_accounts_schema::{
    auth_group_permissions, auth_groups, auth_permissions, user_groups, user_permissions, users,
};
use ave_core::sea_ext::DbErrExt;
use ave_domain::pagination::{Page, PageRequest};
use ave_domain::user::UserType;

use crate::domain::repository::{PermissionRepository, UserRepository};
use crate::domain::types::{Assignments, Group, NewUser, Permission, User};
use crate::error::AccountsServiceError;

/// Constraint rejections pass through with the driver's message; anything
/// else becomes an internal error tagged with `context`.
fn storage_error(context: &'static str, err: DbErr) -> AccountsServiceError {
    match err.constraint_violation() {
        Some(message) => AccountsServiceError::ConstraintViolation(message),
        None => AccountsServiceError::Internal(anyhow::Error::new(err).context(context)),
    }
}

fn transaction_error(context: &'static str, err: TransactionError<DbErr>) -> AccountsServiceError {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => {
            storage_error(context, e)
        }
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| storage_error("find user by id", e))?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, AccountsServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| storage_error("find user by username", e))?;
        Ok(model.map(user_from_model))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, AccountsServiceError> {
        let model = users::ActiveModel {
            id: NotSet,
            password: Set(user.password.clone()),
            last_login: Set(None),
            is_superuser: Set(user.is_superuser),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            full_name: Set(user.full_name.clone()),
            mobile: Set(user.mobile.clone()),
            user_type: Set(Some(user.user_type.as_str().to_owned())),
            is_active: Set(user.is_active),
            is_staff: Set(user.is_staff),
        }
        .insert(&self.db)
        .await
        .map_err(|e| storage_error("insert user", e))?;
        Ok(user_from_model(model))
    }

    async fn save(&self, user: &User) -> Result<(), AccountsServiceError> {
        user_to_active_model(user)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AccountsServiceError::UserNotFound,
                e => storage_error("save user", e),
            })?;
        Ok(())
    }

    async fn save_with_assignments(
        &self,
        user: &User,
        assignments: &Assignments,
    ) -> Result<(), AccountsServiceError> {
        let user_id = user.id;
        let model = user_to_active_model(user);
        let Assignments {
            groups,
            user_permissions,
        } = assignments.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    model.update(txn).await?;
                    if let Some(group_ids) = groups {
                        replace_user_groups(txn, user_id, group_ids).await?;
                    }
                    if let Some(permission_ids) = user_permissions {
                        replace_user_permissions(txn, user_id, permission_ids).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Transaction(DbErr::RecordNotUpdated) => {
                    AccountsServiceError::UserNotFound
                }
                e => transaction_error("save user with assignments", e),
            })
    }

    async fn delete(&self, id: i32) -> Result<bool, AccountsServiceError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| storage_error("delete user", e))?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, AccountsServiceError> {
        let total = users::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| storage_error("count users", e))?;
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .map_err(|e| storage_error("list users", e))?;
        Ok(Page::new(
            models.into_iter().map(user_from_model).collect(),
            total,
            page,
        ))
    }
}

fn user_to_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        password: Set(user.password.clone()),
        last_login: Set(user.last_login),
        is_superuser: Set(user.is_superuser),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        full_name: Set(user.full_name.clone()),
        mobile: Set(user.mobile.clone()),
        user_type: Set(Some(user.user_type.as_str().to_owned())),
        is_active: Set(user.is_active),
        is_staff: Set(user.is_staff),
    }
}

fn user_from_model(model: users::Model) -> User {
    let user_type = match model.user_type.as_deref() {
        None => UserType::Unknown,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(user_id = model.id, user_type = raw, "unrecognized stored user type");
            UserType::Unknown
        }),
    };
    User {
        id: model.id,
        password: model.password,
        last_login: model.last_login,
        is_superuser: model.is_superuser,
        username: model.username,
        email: model.email,
        full_name: model.full_name,
        mobile: model.mobile,
        user_type,
        is_active: model.is_active,
        is_staff: model.is_staff,
    }
}

// ── Permission repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPermissionRepository {
    pub db: DatabaseConnection,
}

impl DbPermissionRepository {
    async fn group_ids(&self, user_id: i32) -> Result<Vec<i32>, AccountsServiceError> {
        user_groups::Entity::find()
            .select_only()
            .column(user_groups::Column::GroupId)
            .filter(user_groups::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| storage_error("list user group ids", e))
    }

    async fn permissions_by_ids(
        &self,
        ids: Vec<i32>,
    ) -> Result<Vec<Permission>, AccountsServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = auth_permissions::Entity::find()
            .filter(auth_permissions::Column::Id.is_in(ids))
            .order_by_asc(auth_permissions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| storage_error("load permissions", e))?;
        Ok(models.into_iter().map(permission_from_model).collect())
    }
}

impl PermissionRepository for DbPermissionRepository {
    async fn user_permissions(
        &self,
        user_id: i32,
    ) -> Result<Vec<Permission>, AccountsServiceError> {
        let ids: Vec<i32> = user_permissions::Entity::find()
            .select_only()
            .column(user_permissions::Column::PermissionId)
            .filter(user_permissions::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| storage_error("list user permission ids", e))?;
        self.permissions_by_ids(ids).await
    }

    async fn group_permissions(
        &self,
        user_id: i32,
    ) -> Result<Vec<Permission>, AccountsServiceError> {
        let group_ids = self.group_ids(user_id).await?;
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = auth_group_permissions::Entity::find()
            .select_only()
            .column(auth_group_permissions::Column::PermissionId)
            .filter(auth_group_permissions::Column::GroupId.is_in(group_ids))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| storage_error("list group permission ids", e))?;
        self.permissions_by_ids(ids).await
    }

    async fn user_groups(&self, user_id: i32) -> Result<Vec<Group>, AccountsServiceError> {
        let ids = self.group_ids(user_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = auth_groups::Entity::find()
            .filter(auth_groups::Column::Id.is_in(ids))
            .order_by_asc(auth_groups::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| storage_error("load groups", e))?;
        Ok(models
            .into_iter()
            .map(|m| Group {
                id: m.id,
                name: m.name,
            })
            .collect())
    }

    async fn set_groups(
        &self,
        user_id: i32,
        group_ids: &[i32],
    ) -> Result<(), AccountsServiceError> {
        let group_ids = group_ids.to_vec();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move { replace_user_groups(txn, user_id, group_ids).await })
            })
            .await
            .map_err(|e| transaction_error("set user groups", e))
    }

    async fn set_user_permissions(
        &self,
        user_id: i32,
        permission_ids: &[i32],
    ) -> Result<(), AccountsServiceError> {
        let permission_ids = permission_ids.to_vec();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    replace_user_permissions(txn, user_id, permission_ids).await
                })
            })
            .await
            .map_err(|e| transaction_error("set user permissions", e))
    }
}

async fn replace_user_groups(
    txn: &DatabaseTransaction,
    user_id: i32,
    group_ids: Vec<i32>,
) -> Result<(), DbErr> {
    user_groups::Entity::delete_many()
        .filter(user_groups::Column::UserId.eq(user_id))
        .exec(txn)
        .await?;
    if group_ids.is_empty() {
        return Ok(());
    }
    let mut group_ids = group_ids;
    group_ids.sort_unstable();
    group_ids.dedup();
    user_groups::Entity::insert_many(group_ids.into_iter().map(|group_id| {
        user_groups::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
        }
    }))
    .exec(txn)
    .await?;
    Ok(())
}

async fn replace_user_permissions(
    txn: &DatabaseTransaction,
    user_id: i32,
    permission_ids: Vec<i32>,
) -> Result<(), DbErr> {
    user_permissions::Entity::delete_many()
        .filter(user_permissions::Column::UserId.eq(user_id))
        .exec(txn)
        .await?;
    if permission_ids.is_empty() {
        return Ok(());
    }
    let mut permission_ids = permission_ids;
    permission_ids.sort_unstable();
    permission_ids.dedup();
    user_permissions::Entity::insert_many(permission_ids.into_iter().map(|permission_id| {
        user_permissions::ActiveModel {
            user_id: Set(user_id),
            permission_id: Set(permission_id),
        }
    }))
    .exec(txn)
    .await?;
    Ok(())
}

fn permission_from_model(model: auth_permissions::Model) -> Permission {
    Permission {
        id: model.id,
        app_label: model.app_label,
        codename: model.codename,
        name: model.name,
    }
}
