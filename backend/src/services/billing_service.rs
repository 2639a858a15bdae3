//! Billing webhook processing
//!
//! Mirrors the billing provider's subscription objects into the local table and
//! replenishes credits when a subscription becomes active. The provider may
//! redeliver events, so every step here is an upsert or an idempotent grant.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{BillingEvent, Subscription, SubscriptionObject};
use crate::utils::{ApiError, ApiResult};

const RELEVANT_EVENTS: &[&str] = &[
    "customer.subscription.created",
    "customer.subscription.updated",
    "customer.subscription.deleted",
];

#[derive(Clone)]
pub struct BillingService {
    pool: SqlitePool,
    webhook_secret: String,
    plan_credits: i64,
}

impl BillingService {
    pub fn new(pool: SqlitePool, webhook_secret: String, plan_credits: i64) -> Self {
        Self { pool, webhook_secret, plan_credits }
    }

    /// Verify the shared-secret signature header before touching the payload.
    pub fn verify_signature(&self, signature: Option<&str>) -> ApiResult<()> {
        if self.webhook_secret.is_empty() {
            return Err(ApiError::internal_error("Billing webhook secret is not configured"));
        }
        match signature {
            Some(sig) if sig == self.webhook_secret => Ok(()),
            _ => Err(ApiError::unauthorized("Invalid webhook signature")),
        }
    }

    /// Process one webhook delivery. Unrecognized event types are acknowledged
    /// and skipped so the provider does not retry them forever.
    pub async fn handle_event(&self, event: BillingEvent) -> ApiResult<()> {
        if !RELEVANT_EVENTS.contains(&event.event_type.as_str()) {
            tracing::debug!("Ignoring billing event type: {}", event.event_type);
            return Ok(());
        }

        let was_active = self.subscription_status(&event.subscription.id).await?;
        self.upsert_subscription(&event.subscription).await?;

        // Grant plan credits on the transition into "active" only, so an
        // "updated" redelivery for an already-active subscription is a no-op.
        let became_active =
            event.subscription.status == "active" && was_active.as_deref() != Some("active");
        if became_active {
            sqlx::query(
                "UPDATE users SET credits = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            )
            .bind(self.plan_credits)
            .bind(event.subscription.user_id)
            .execute(&self.pool)
            .await?;
            tracing::info!(
                "Subscription {} active: set user {} credits to {}",
                event.subscription.id,
                event.subscription.user_id,
                self.plan_credits
            );
        } else {
            tracing::info!(
                "Recorded billing event {} for subscription {} (status: {})",
                event.event_type,
                event.subscription.id,
                event.subscription.status
            );
        }

        Ok(())
    }

    pub async fn get_subscription(&self, user_id: i64) -> ApiResult<Option<Subscription>> {
        let sub = sqlx::query_as(
            "SELECT * FROM subscriptions WHERE user_id = ? ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sub)
    }

    async fn subscription_status(&self, subscription_id: &str) -> ApiResult<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT status FROM subscriptions WHERE id = ?")
                .bind(subscription_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(status,)| status))
    }

    async fn upsert_subscription(&self, sub: &SubscriptionObject) -> ApiResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions
                (id, user_id, status, price_id, quantity, cancel_at_period_end,
                 current_period_start, current_period_end, ended_at, canceled_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                price_id = excluded.price_id,
                quantity = excluded.quantity,
                cancel_at_period_end = excluded.cancel_at_period_end,
                current_period_start = excluded.current_period_start,
                current_period_end = excluded.current_period_end,
                ended_at = excluded.ended_at,
                canceled_at = excluded.canceled_at,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(&sub.id)
        .bind(sub.user_id)
        .bind(&sub.status)
        .bind(&sub.price_id)
        .bind(sub.quantity)
        .bind(sub.cancel_at_period_end)
        .bind(from_unix(sub.current_period_start))
        .bind(from_unix(sub.current_period_end))
        .bind(from_unix(sub.ended_at))
        .bind(from_unix(sub.canceled_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn from_unix(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
}
