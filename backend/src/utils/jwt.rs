use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::utils::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as string
    pub sub: String,
    pub email: String,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
}

pub struct JwtUtil {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl JwtUtil {
    pub fn new(secret: &str, expires_in: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in: parse_expires_in(expires_in),
        }
    }

    pub fn generate_token(&self, user_id: i64, email: &str) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (now + self.expires_in).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal_error(format!("Failed to sign token: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
                _ => ApiError::unauthorized(format!("JWT verification failed: {}", e)),
            })
    }
}

/// Parse expiry strings like "24h", "7d", "30m"; plain numbers are seconds.
fn parse_expires_in(input: &str) -> Duration {
    let s = input.trim().to_lowercase();
    if let Ok(secs) = s.parse::<i64>() {
        return Duration::seconds(secs);
    }

    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    let (num, unit) = s.split_at(digits);
    let n: i64 = num.parse().unwrap_or(24);
    match unit {
        "m" | "min" | "mins" => Duration::minutes(n),
        "d" | "day" | "days" => Duration::days(n),
        _ => Duration::hours(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let jwt = JwtUtil::new("test-secret", "24h");
        let token = jwt.generate_token(42, "a@b.com").expect("sign");
        let claims = jwt.verify_token(&token).expect("verify");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt = JwtUtil::new("secret-one", "24h");
        let token = jwt.generate_token(1, "a@b.com").expect("sign");

        let other = JwtUtil::new("secret-two", "24h");
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_parse_expires_in() {
        assert_eq!(parse_expires_in("24h"), Duration::hours(24));
        assert_eq!(parse_expires_in("7d"), Duration::days(7));
        assert_eq!(parse_expires_in("30m"), Duration::minutes(30));
        assert_eq!(parse_expires_in("3600"), Duration::seconds(3600));
    }
}
