use std::sync::Arc;

use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use validator::Validate;

use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};
use crate::utils::{ApiError, ApiResult, JwtUtil};

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    jwt_util: Arc<JwtUtil>,
    signup_credits: i64,
}

impl AuthService {
    pub fn new(pool: SqlitePool, jwt_util: Arc<JwtUtil>, signup_credits: i64) -> Self {
        Self { pool, jwt_util, signup_credits }
    }

    pub async fn register(&self, req: RegisterRequest) -> ApiResult<AuthResponse> {
        req.validate()
            .map_err(|e| ApiError::validation_error(e.to_string()))?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&req.email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(ApiError::validation_error("Email already registered"));
        }

        let password_hash = hash(&req.password, DEFAULT_COST)
            .map_err(|err| ApiError::internal_error(format!("Failed to hash password: {}", err)))?;

        let result = sqlx::query("INSERT INTO users (email, password_hash, credits) VALUES (?, ?, ?)")
            .bind(&req.email)
            .bind(&password_hash)
            .bind(self.signup_credits)
            .execute(&self.pool)
            .await?;

        let user_id = result.last_insert_rowid();
        tracing::info!("Registered user {} (ID: {})", req.email, user_id);

        let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let token = self.jwt_util.generate_token(user.id, &user.email)?;
        Ok(AuthResponse { token, user: UserResponse::from(user) })
    }

    pub async fn login(&self, req: LoginRequest) -> ApiResult<AuthResponse> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(&req.email)
            .fetch_optional(&self.pool)
            .await?;

        // Same error for unknown email and wrong password
        let user = user.ok_or_else(ApiError::invalid_credentials)?;

        let valid = verify(&req.password, &user.password_hash)
            .map_err(|err| ApiError::internal_error(format!("Failed to verify password: {}", err)))?;
        if !valid {
            return Err(ApiError::invalid_credentials());
        }

        let token = self.jwt_util.generate_token(user.id, &user.email)?;
        tracing::debug!("Issued token for user {} (ID: {})", user.email, user.id);
        Ok(AuthResponse { token, user: UserResponse::from(user) })
    }
}
