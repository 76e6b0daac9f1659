use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountsUserGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountsUserGroups::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountsUserGroups::GroupId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccountsUserGroups::UserId)
                            .col(AccountsUserGroups::GroupId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccountsUserGroups::Table, AccountsUserGroups::UserId)
                            .to(AccountsUsers::Table, AccountsUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccountsUserGroups::Table, AccountsUserGroups::GroupId)
                            .to(AuthGroups::Table, AuthGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountsUserPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountsUserPermissions::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountsUserPermissions::PermissionId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccountsUserPermissions::UserId)
                            .col(AccountsUserPermissions::PermissionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                AccountsUserPermissions::Table,
                                AccountsUserPermissions::UserId,
                            )
                            .to(AccountsUsers::Table, AccountsUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                AccountsUserPermissions::Table,
                                AccountsUserPermissions::PermissionId,
                            )
                            .to(AuthPermissions::Table, AuthPermissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountsUserPermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountsUserGroups::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AccountsUserGroups {
    Table,
    UserId,
    GroupId,
}

#[derive(Iden)]
enum AccountsUserPermissions {
    Table,
    UserId,
    PermissionId,
}

#[derive(Iden)]
enum AccountsUsers {
    Table,
    Id,
}

#[derive(Iden)]
enum AuthGroups {
    Table,
    Id,
}

#[derive(Iden)]
enum AuthPermissions {
    Table,
    Id,
}
