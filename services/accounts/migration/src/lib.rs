pub use sea_orm_migration::prelude::*;

mod m20260401_000001_create_accounts_users;
mod m20260401_000002_create_auth_permissions_and_groups;
mod m20260401_000003_create_user_groups_and_permissions;
mod m20260401_000004_create_outbox_mails;
mod m20260401_000005_seed_user_permissions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_accounts_users::Migration),
            Box::new(m20260401_000002_create_auth_permissions_and_groups::Migration),
            Box::new(m20260401_000003_create_user_groups_and_permissions::Migration),
            Box::new(m20260401_000004_create_outbox_mails::Migration),
            Box::new(m20260401_000005_seed_user_permissions::Migration),
        ]
    }
}
