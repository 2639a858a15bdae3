use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};

use crate::AppState;
use crate::models::BillingEvent;
use crate::utils::ApiResult;

/// Billing provider webhook endpoint
///
/// Authenticated with a shared-secret header rather than a bearer token; the
/// caller is the billing provider, not a user.
#[utoipa::path(
    post,
    path = "/api/webhooks/billing",
    request_body = BillingEvent,
    responses(
        (status = 200, description = "Event processed"),
        (status = 401, description = "Invalid webhook signature"),
    ),
    tag = "Billing"
)]
pub async fn billing_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(event): Json<BillingEvent>,
) -> ApiResult<Json<serde_json::Value>> {
    let signature = headers.get("x-webhook-signature").and_then(|v| v.to_str().ok());
    state.billing_service.verify_signature(signature)?;

    state.billing_service.handle_event(event).await?;
    Ok(Json(serde_json::json!({ "received": true })))
}
