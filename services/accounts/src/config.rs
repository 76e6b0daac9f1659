use serde::Deserialize;

use ave_core::config::Config;

/// Accounts service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `ACCOUNTS_PORT`.
    #[serde(default = "default_accounts_port")]
    pub accounts_port: u16,
    /// Sender for mail without an explicit `from_email`.
    /// Env var: `DEFAULT_FROM_EMAIL`.
    #[serde(default = "default_from_email")]
    pub default_from_email: String,
    /// Also require `full_name` and a real `user_type` when creating users.
    /// Env var: `STRICT_REQUIRED_FIELDS`.
    #[serde(default)]
    pub strict_required_fields: bool,
}

fn default_accounts_port() -> u16 {
    3114
}

fn default_from_email() -> String {
    "webmaster@localhost".to_owned()
}

impl Config for AccountsConfig {}
