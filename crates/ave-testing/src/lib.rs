//! Shared helpers for service integration tests.

pub mod auth;
