use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Admin record in the database. Created only by the `create-admin` binary,
/// never through the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Admin {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<Admin>, sqlx::Error> {
        sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM admins
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Admin>, sqlx::Error> {
        sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> Result<Admin, sqlx::Error> {
        sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }
}
