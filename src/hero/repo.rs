use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HeroSlide {
    pub id: Uuid,
    pub image: String,
    pub label: String,
    #[serde(rename = "order")]
    pub position: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct HeroSlideChanges {
    pub image: Option<String>,
    pub label: Option<String>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn list_active(db: &PgPool) -> Result<Vec<HeroSlide>, ApiError> {
    let rows = sqlx::query_as::<_, HeroSlide>(
        r#"
        SELECT id, image, label, position, is_active, created_at, updated_at
        FROM hero_slides
        WHERE is_active
        ORDER BY position ASC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<HeroSlide>, ApiError> {
    let row = sqlx::query_as::<_, HeroSlide>(
        r#"
        SELECT id, image, label, position, is_active, created_at, updated_at
        FROM hero_slides
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Insert a slide. When no position is supplied it becomes one past the
/// current maximum, or 0 on an empty table, computed in the same statement.
pub async fn insert(
    db: &PgPool,
    image: &str,
    label: &str,
    position: Option<i32>,
    is_active: bool,
) -> Result<HeroSlide, ApiError> {
    let row = sqlx::query_as::<_, HeroSlide>(
        r#"
        INSERT INTO hero_slides (image, label, position, is_active)
        VALUES (
            $1,
            $2,
            COALESCE($3, (SELECT COALESCE(MAX(position) + 1, 0) FROM hero_slides)),
            $4
        )
        RETURNING id, image, label, position, is_active, created_at, updated_at
        "#,
    )
    .bind(image)
    .bind(label)
    .bind(position)
    .bind(is_active)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Sparse update in a single statement; NULL binds leave the column as-is.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    changes: HeroSlideChanges,
) -> Result<HeroSlide, ApiError> {
    let row = sqlx::query_as::<_, HeroSlide>(
        r#"
        UPDATE hero_slides SET
            image      = COALESCE($2, image),
            label      = COALESCE($3, label),
            position   = COALESCE($4, position),
            is_active  = COALESCE($5, is_active),
            updated_at = now()
        WHERE id = $1
        RETURNING id, image, label, position, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(changes.image)
    .bind(changes.label)
    .bind(changes.position)
    .bind(changes.is_active)
    .fetch_optional(db)
    .await?;
    row.ok_or(ApiError::NotFound("Hero slide"))
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM hero_slides WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Hero slide"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_serializes_as_order() {
        let slide = HeroSlide {
            id: Uuid::new_v4(),
            image: "https://cdn.example.com/h/1.jpg".into(),
            label: "Spring range".into(),
            position: 2,
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&slide).unwrap();
        assert_eq!(json["order"], 2);
        assert!(json.get("position").is_none());
        assert_eq!(json["is_active"], true);
    }
}
