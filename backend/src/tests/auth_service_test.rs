use std::sync::Arc;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AuthService;
use crate::tests::common::create_test_db;
use crate::utils::{ApiError, JwtUtil};

fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest { email: email.to_string(), password: password.to_string() }
}

async fn create_auth_service() -> AuthService {
    let pool = create_test_db().await;
    let jwt = Arc::new(JwtUtil::new("test-secret", "24h"));
    AuthService::new(pool, jwt, 3)
}

#[tokio::test]
async fn test_register_grants_signup_credits_and_token() {
    let service = create_auth_service().await;

    let response =
        service.register(register_request("new@example.com", "password123")).await.expect("ok");

    assert_eq!(response.user.email, "new@example.com");
    assert_eq!(response.user.credits, 3);
    assert!(!response.token.is_empty());

    let jwt = JwtUtil::new("test-secret", "24h");
    let claims = jwt.verify_token(&response.token).expect("token verifies");
    assert_eq!(claims.sub, response.user.id.to_string());
    assert_eq!(claims.email, "new@example.com");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let service = create_auth_service().await;
    service.register(register_request("dup@example.com", "password123")).await.expect("first ok");

    let err =
        service.register(register_request("dup@example.com", "different1")).await.unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let service = create_auth_service().await;

    let err = service.register(register_request("not-an-email", "password123")).await.unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    let err = service.register(register_request("short@example.com", "short")).await.unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_login_round_trip() {
    let service = create_auth_service().await;
    service.register(register_request("login@example.com", "password123")).await.expect("ok");

    let response = service
        .login(LoginRequest {
            email: "login@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .expect("login succeeds");
    assert_eq!(response.user.email, "login@example.com");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let service = create_auth_service().await;
    service.register(register_request("who@example.com", "password123")).await.expect("ok");

    let unknown = service
        .login(LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap_err();
    let wrong_password = service
        .login(LoginRequest {
            email: "who@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(unknown, ApiError::InvalidCredentials));
    assert!(matches!(wrong_password, ApiError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong_password.to_string());
}
