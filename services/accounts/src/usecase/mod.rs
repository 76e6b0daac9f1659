pub mod admin;
pub mod manager;
pub mod permission;
pub mod user;
