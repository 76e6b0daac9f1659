use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Model-level permissions checked by the admin endpoints.
const USER_PERMISSIONS: [(&str, &str); 4] = [
    ("add_user", "Can add user"),
    ("change_user", "Can change user"),
    ("delete_user", "Can delete user"),
    ("view_user", "Can view user"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(AuthPermissions::Table).columns([
            AuthPermissions::AppLabel,
            AuthPermissions::Codename,
            AuthPermissions::Name,
        ]);
        for (codename, name) in USER_PERMISSIONS {
            insert.values_panic(["accounts".into(), codename.into(), name.into()]);
        }

        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&insert)).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(AuthPermissions::Table)
            .and_where(Expr::col(AuthPermissions::AppLabel).eq("accounts"))
            .to_owned();

        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&delete)).await?;
        Ok(())
    }
}

#[derive(Iden)]
enum AuthPermissions {
    Table,
    AppLabel,
    Codename,
    Name,
}
