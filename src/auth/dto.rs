use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// JWT payload proving admin identity.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,   // admin ID
    pub iat: usize,  // issued at
    pub exp: usize,  // expiration time
    pub admin: bool, // capability flag; false means no write access
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

// EncodingKey/DecodingKey hold secret material and are not Debug; redact them
// so JwtKeys can still be used with Result helpers like `unwrap_err`.
impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"<redacted>")
            .field("decoding", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Request body for admin login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub admin: PublicAdmin,
}

/// Response for GET /auth/verify.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub admin: PublicAdmin,
}

/// Public part of the admin returned to the client. The password hash never
/// leaves the repo layer.
#[derive(Debug, Serialize)]
pub struct PublicAdmin {
    pub id: Uuid,
    pub email: String,
}
