// Module name shadows the `serde` crate; use `::serde` for the external crate.
use ::serde::Serializer;
use chrono::{DateTime, SecondsFormat, Utc};

/// RFC 3339 with 3-digit fractional seconds and a `Z` suffix.
pub fn rfc3339_ms(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize a nullable timestamp with [`rfc3339_ms`] (`null` when absent).
pub fn opt_to_rfc3339_ms<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&rfc3339_ms(dt)),
        None => s.serialize_none(),
    }
}
