/*
 * Responsibility
 * - /api 配下の URL 構造を定義
 * - 認可は middleware::auth::access (gate) がこの Router 全体に掛ける
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    auth::{login, register},
    not_found::not_found,
    users::me,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/users/me", get(me))
        // Explicit fallback so unknown `/api/*` paths still pass through the gate.
        .fallback(not_found)
}
