pub(crate) use crate::auth::dto::{Claims, JwtKeys};
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, warn};
use uuid::Uuid;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Argon2 verification; the comparison inside the hash check is
/// constant-time.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

impl JwtKeys {
    /// Build keys from config; a missing secret is a server misconfiguration
    /// reported on the request that hits it, never a startup failure.
    pub fn from_config(cfg: &JwtConfig) -> Result<Self, ApiError> {
        let secret = cfg
            .secret
            .as_deref()
            .ok_or(ApiError::Misconfigured("JWT secret"))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs(cfg.ttl_days as u64 * 24 * 60 * 60),
        })
    }

    pub fn sign(&self, admin_id: Uuid) -> Result<String, ApiError> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: admin_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            admin: true,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(e.into()))?;
        debug!(admin_id = %admin_id, "jwt signed");
        Ok(token)
    }

    /// Verify signature and expiry. Malformed, expired and forged tokens all
    /// collapse into the same `InvalidCredential`.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            warn!(error = %e, "jwt verify failed");
            ApiError::InvalidCredential
        })?;
        debug!(admin_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Extracts and validates the bearer token on protected routes, yielding the
/// authenticated admin's ID.
#[derive(Debug)]
pub struct AdminUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingCredential)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::MissingCredential)?;

        let keys = JwtKeys::from_config(&state.config.jwt)?;
        let claims = keys.verify(token)?;

        if !claims.admin {
            return Err(ApiError::Forbidden);
        }

        Ok(AdminUser(claims.sub))
    }
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("admin@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@example.com"));
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_config(&state.config.jwt).expect("test config has a secret")
    }

    #[tokio::test]
    async fn sign_and_verify_token() {
        let keys = make_keys();
        let admin_id = Uuid::new_v4();
        let token = keys.sign(admin_id).expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, admin_id);
        assert!(claims.admin);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now - TimeDuration::hours(2)).unix_timestamp() as usize,
            exp: (now - TimeDuration::hours(1)).unix_timestamp() as usize,
            admin: true,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredential));
    }

    #[tokio::test]
    async fn verify_rejects_garbage_token() {
        let keys = make_keys();
        let err = keys.verify("not.a.token").unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredential));
    }

    #[test]
    fn missing_secret_is_misconfiguration() {
        let cfg = JwtConfig {
            secret: None,
            ttl_days: 7,
        };
        let err = JwtKeys::from_config(&cfg).unwrap_err();
        assert!(matches!(err, ApiError::Misconfigured("JWT secret")));
    }
}

#[cfg(test)]
mod extractor_tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/products");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_missing_credential() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(None);
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_missing_credential() {
        let state = AppState::fake();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential));
    }

    #[tokio::test]
    async fn valid_token_yields_admin_id() {
        let state = AppState::fake();
        let keys = JwtKeys::from_config(&state.config.jwt).unwrap();
        let admin_id = Uuid::new_v4();
        let token = keys.sign(admin_id).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let AdminUser(id) = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .expect("extractor should accept a fresh token");
        assert_eq!(id, admin_id);
    }

    #[tokio::test]
    async fn non_admin_claims_are_forbidden() {
        let state = AppState::fake();
        let keys = JwtKeys::from_config(&state.config.jwt).unwrap();
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now.unix_timestamp() as usize,
            exp: (now + TimeDuration::hours(1)).unix_timestamp() as usize,
            admin: false,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
