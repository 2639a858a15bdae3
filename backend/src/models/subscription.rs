use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Mirror of the billing provider's subscription object. The provider's webhook
/// stream owns this row's lifecycle; the core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subscription {
    pub id: String,
    pub user_id: i64,
    pub status: String,
    pub price_id: Option<String>,
    pub quantity: Option<i64>,
    pub cancel_at_period_end: bool,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Webhook payload: event type plus the provider's subscription object.
/// Period fields arrive as unix seconds, as the provider sends them.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BillingEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub subscription: SubscriptionObject,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubscriptionObject {
    pub id: String,
    pub user_id: i64,
    pub status: String,
    #[serde(default)]
    pub price_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub current_period_start: Option<i64>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub ended_at: Option<i64>,
    #[serde(default)]
    pub canceled_at: Option<i64>,
}
