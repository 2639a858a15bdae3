pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::middleware::{AuthState, auth_middleware};
use crate::services::analysis::{AnalysisClient, OpenRouterClient};
use crate::services::{AuthService, BillingService, DocumentService, UserService};
use crate::utils::JwtUtil;

pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_util: Arc<JwtUtil>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub document_service: DocumentService,
    pub billing_service: BillingService,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_util =
            Arc::new(JwtUtil::new(&config.auth.jwt_secret, &config.auth.jwt_expires_in));

        let completion_api = Arc::new(OpenRouterClient::new(config.analysis.clone()));
        let analysis = Arc::new(AnalysisClient::new(completion_api));

        let auth_service =
            AuthService::new(pool.clone(), jwt_util.clone(), config.billing.signup_credits);
        let user_service = UserService::new(pool.clone());
        let document_service = DocumentService::new(pool.clone(), analysis);
        let billing_service = BillingService::new(
            pool.clone(),
            config.billing.webhook_secret.clone(),
            config.billing.plan_credits,
        );

        Self {
            config,
            pool,
            jwt_util,
            auth_service,
            user_service,
            document_service,
            billing_service,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::user::me,
        handlers::analyze::analyze,
        handlers::document::list_documents,
        handlers::document::get_document,
        handlers::models::list_models,
        handlers::billing::billing_webhook,
    ),
    components(schemas(
        models::RegisterRequest,
        models::LoginRequest,
        models::AuthResponse,
        models::UserResponse,
        models::Document,
        models::DocumentListItem,
        models::DocumentStatus,
        models::AnalyzeResponse,
        models::BillingEvent,
        models::SubscriptionObject,
        models::Subscription,
        services::analysis::ModelInfo,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Account profile and credits"),
        (name = "Analysis", description = "Contract analysis"),
        (name = "Documents", description = "Analysis history"),
        (name = "Billing", description = "Subscription webhooks"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Assemble the application router. Auth and webhook routes stay public; the
/// webhook authenticates with its own shared-secret header.
pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_state = AuthState { jwt_util: state.jwt_util.clone() };

    let public = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/models", get(handlers::models::list_models))
        .route("/api/webhooks/billing", post(handlers::billing::billing_webhook));

    let protected = Router::new()
        .route("/api/analyze", post(handlers::analyze::analyze))
        .route("/api/documents", get(handlers::document::list_documents))
        .route("/api/documents/:id", get(handlers::document::get_document))
        .route("/api/users/me", get(handlers::user::me))
        .layer(from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
