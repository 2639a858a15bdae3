use std::sync::Arc;

use axum::{Extension, Json, extract::State};

use crate::AppState;
use crate::models::UserResponse;
use crate::utils::ApiResult;

/// Current account profile with remaining credits
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.get_user(user_id).await?;
    Ok(Json(UserResponse::from(user)))
}
