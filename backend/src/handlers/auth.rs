use std::sync::Arc;

use axum::{Json, extract::State};

use crate::AppState;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::utils::ApiResult;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error"),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    tracing::info!("Registration attempt for {}", payload.email);
    let response = state.auth_service.register(payload).await?;
    Ok(Json(response))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    tracing::debug!("Login attempt for {}", payload.email);
    let response = state.auth_service.login(payload).await?;
    Ok(Json(response))
}
