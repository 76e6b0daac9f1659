//! Service plumbing shared by Ave services: configuration loading, the common
//! error envelope, request ids, tracing and sea-orm helpers.

pub mod config;
pub mod error;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
