//! Domain types shared across Ave services.
//!
//! Pure types with no framework dependencies. Import in `usecase/` and
//! `domain/` layers; `infra/` maps them to and from storage rows.

pub mod pagination;
pub mod user;
