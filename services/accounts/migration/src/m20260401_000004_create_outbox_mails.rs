use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OutboxMails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OutboxMails::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OutboxMails::Subject).string().not_null())
                    .col(ColumnDef::new(OutboxMails::Message).text().not_null())
                    .col(ColumnDef::new(OutboxMails::FromEmail).string().not_null())
                    .col(ColumnDef::new(OutboxMails::Recipients).json().not_null())
                    .col(
                        ColumnDef::new(OutboxMails::IdempotencyKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(OutboxMails::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(OutboxMails::LastError).string())
                    .col(
                        ColumnDef::new(OutboxMails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OutboxMails::SentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(OutboxMails::FailedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Worker polls pending mail oldest first.
        manager
            .create_index(
                Index::create()
                    .table(OutboxMails::Table)
                    .col(OutboxMails::CreatedAt)
                    .name("idx_outbox_mails_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OutboxMails::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OutboxMails {
    Table,
    Id,
    Subject,
    Message,
    FromEmail,
    Recipients,
    IdempotencyKey,
    Attempts,
    LastError,
    CreatedAt,
    SentAt,
    FailedAt,
}
