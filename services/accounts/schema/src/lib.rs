//! sea-orm entities for the accounts service.

pub mod auth_group_permissions;
pub mod auth_groups;
pub mod auth_permissions;
pub mod outbox_mails;
pub mod user_groups;
pub mod user_permissions;
pub mod users;
