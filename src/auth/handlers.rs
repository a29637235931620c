use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicAdmin, VerifyResponse},
        repo::Admin,
        services::{is_valid_email, verify_password, AdminUser, JwtKeys},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        return Err(ApiError::validation("email", "Invalid email"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("password", "Password is required"));
    }

    let db = state.db().await?;

    // Unknown email and wrong password produce the same response, so the
    // endpoint cannot be used to enumerate accounts.
    let admin = match Admin::find_by_email(db, &payload.email).await? {
        Some(a) => a,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredential);
        }
    };

    let ok = verify_password(&payload.password, &admin.password_hash)
        .map_err(ApiError::Internal)?;
    if !ok {
        warn!(admin_id = %admin.id, "login invalid password");
        return Err(ApiError::InvalidCredential);
    }

    let keys = JwtKeys::from_config(&state.config.jwt)?;
    let token = keys.sign(admin.id)?;

    info!(admin_id = %admin.id, email = %admin.email, "admin logged in");
    Ok(Json(AuthResponse {
        token,
        admin: PublicAdmin {
            id: admin.id,
            email: admin.email,
        },
    }))
}

#[instrument(skip(state))]
pub async fn verify(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
) -> Result<Json<VerifyResponse>, ApiError> {
    let db = state.db().await?;
    let admin = Admin::find_by_id(db, admin_id)
        .await?
        .ok_or(ApiError::InvalidCredential)?;

    Ok(Json(VerifyResponse {
        admin: PublicAdmin {
            id: admin.id,
            email: admin.email,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn auth_response_serialization() {
        let response = AuthResponse {
            token: "header.payload.signature".into(),
            admin: PublicAdmin {
                id: Uuid::new_v4(),
                email: "admin@example.com".into(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "header.payload.signature");
        assert_eq!(json["admin"]["email"], "admin@example.com");
    }
}
