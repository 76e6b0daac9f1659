use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use ave_core::config::Config as _;
use ave_core::tracing::init_tracing;

use ave_accounts::admin::AdminSite;
use ave_accounts::config::AccountsConfig;
use ave_accounts::domain::repository::UserRepository as _;
use ave_accounts::domain::types::ExtraFields;
use ave_accounts::router::build_router;
use ave_accounts::state::AppState;
use ave_accounts::usecase::manager::parse_user_type;

#[derive(Parser)]
#[command(about = "Ave accounts service")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Create a staff superuser.
    Createsuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Omit to create the account with an unusable password.
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        /// IS_EMPLOYEE_USER or IS_CUSTOMER_USER
        #[arg(long)]
        user_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info,sea_orm=warn,sqlx=warn");
    let args = Args::parse();

    let config = AccountsConfig::try_from_env().context("load accounts config")?;
    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;
    let admin_site = AdminSite::bootstrap().context("bootstrap admin site")?;

    let state = AppState {
        db,
        admin_site: Arc::new(admin_site),
        default_from_email: config.default_from_email.clone(),
        strict_required_fields: config.strict_required_fields,
    };

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state, config.accounts_port).await,
        Command::Createsuperuser {
            username,
            email,
            password,
            full_name,
            user_type,
        } => {
            if state.user_repo().find_by_username(&username).await?.is_some() {
                bail!("username {username} is already taken");
            }
            let user_type = user_type.as_deref().map(parse_user_type).transpose()?;
            let user = state
                .manager()
                .create_superuser(
                    &username,
                    &email,
                    password.as_deref(),
                    ExtraFields {
                        full_name,
                        user_type,
                        ..Default::default()
                    },
                )
                .await?;
            info!(user_id = user.id, username = %user, "superuser created");
            Ok(())
        }
    }
}

async fn serve(state: AppState, port: u16) -> Result<()> {
    let router = build_router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("accounts service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
