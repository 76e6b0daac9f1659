/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-case
/// env vars (`database_url` → `DATABASE_URL`). Use `#[serde(default = ...)]`
/// for optional settings.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load from the process environment.
    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from an explicit set of key/value pairs (tests, CLI overrides).
    fn try_from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
