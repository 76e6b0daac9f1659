use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthPermissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthPermissions::AppLabel)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthPermissions::Codename)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthPermissions::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AuthPermissions::Table)
                    .col(AuthPermissions::AppLabel)
                    .col(AuthPermissions::Codename)
                    .unique()
                    .name("uq_auth_permissions_app_label_codename")
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthGroups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthGroups::Name)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthGroupPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthGroupPermissions::GroupId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthGroupPermissions::PermissionId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AuthGroupPermissions::GroupId)
                            .col(AuthGroupPermissions::PermissionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AuthGroupPermissions::Table, AuthGroupPermissions::GroupId)
                            .to(AuthGroups::Table, AuthGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                AuthGroupPermissions::Table,
                                AuthGroupPermissions::PermissionId,
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
            .drop_table(Table::drop().table(AuthGroupPermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthPermissions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuthPermissions {
    Table,
    Id,
    AppLabel,
    Codename,
    Name,
}

#[derive(Iden)]
enum AuthGroups {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum AuthGroupPermissions {
    Table,
    GroupId,
    PermissionId,
}
