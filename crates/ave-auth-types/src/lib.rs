//! Auth types shared across Ave services.
//!
//! Provides the `IdentityHeaders` extractor for gateway-authenticated requests.

pub mod identity;
