/*
 * Responsibility
 * - POST /auth/login, POST /auth/register
 * - DTO validation → AuthService 呼び出し → response DTO へ変換
 * - どちらも Public (token 不要)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::error::AppError;
use crate::services::auth::Registration;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let out = state.auth.login(req.username.trim(), &req.password).await?;

    Ok(Json(LoginResponse {
        message: "login successful",
        token: out.token,
        username: out.username,
        role: out.role,
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let out = state
        .auth
        .register(Registration {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered successfully",
            username: out.username,
            role: out.role,
            token: out.token,
        }),
    ))
}
