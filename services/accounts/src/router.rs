use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use ave_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::account::record_login;
use crate::handlers::admin::{
    admin_index, user_add, user_change, user_changelist, user_deactivate, user_delete,
    user_detail, user_email, user_set_password,
};
use crate::handlers::health::{healthz, readyz};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Account
        .route("/accounts/@me/login", post(record_login))
        // Admin
        .route("/admin", get(admin_index))
        .route(
            "/admin/accounts/user",
            get(user_changelist).post(user_add),
        )
        .route(
            "/admin/accounts/user/{id}",
            get(user_detail).patch(user_change).delete(user_delete),
        )
        .route(
            "/admin/accounts/user/{id}/password",
            post(user_set_password),
        )
        .route(
            "/admin/accounts/user/{id}/deactivate",
            post(user_deactivate),
        )
        .route("/admin/accounts/user/{id}/email", post(user_email))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
