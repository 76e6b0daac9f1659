use axum::{extract::State, http::StatusCode};

use ave_auth_types::identity::IdentityHeaders;

use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::user::RecordLoginUseCase;

// ── POST /accounts/@me/login ─────────────────────────────────────────────────

/// Called by the gateway once its login flow has accepted the acting user.
pub async fn record_login(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<StatusCode, AccountsServiceError> {
    let usecase = RecordLoginUseCase {
        users: state.user_repo(),
    };
    usecase.execute(identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
