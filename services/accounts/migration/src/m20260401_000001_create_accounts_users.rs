use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountsUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountsUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AccountsUsers::Password)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountsUsers::LastLogin).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(AccountsUsers::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AccountsUsers::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AccountsUsers::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AccountsUsers::FullName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountsUsers::Mobile).string_len(20))
                    .col(
                        ColumnDef::new(AccountsUsers::UserType)
                            .string_len(50)
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(AccountsUsers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AccountsUsers::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountsUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AccountsUsers {
    Table,
    Id,
    Password,
    LastLogin,
    IsSuperuser,
    Username,
    Email,
    FullName,
    Mobile,
    UserType,
    IsActive,
    IsStaff,
}
