use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub specifications: Json<HashMap<String, String>>,
    pub applications: Vec<String>,
    pub images: Vec<String>,
    pub featured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub specifications: HashMap<String, String>,
    pub applications: Vec<String>,
    pub images: Vec<String>,
    pub featured: bool,
}

pub struct ProductChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub specifications: Option<HashMap<String, String>>,
    pub applications: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub featured: Option<bool>,
}

/// Slug uniqueness is enforced by the UNIQUE constraint; a violation at
/// commit time becomes `DuplicateSlug`, so a race between two creates with
/// the same name resolves to exactly one winner.
fn map_slug_conflict(err: sqlx::Error, slug: &str) -> ApiError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::DuplicateSlug(slug.to_string())
        }
        _ => ApiError::from(err),
    }
}

pub async fn list_all(db: &PgPool) -> Result<Vec<Product>, ApiError> {
    let rows = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, slug, description, category, specifications,
               applications, images, featured, created_at, updated_at
        FROM products
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_slug(db: &PgPool, slug: &str) -> Result<Option<Product>, ApiError> {
    let row = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, slug, description, category, specifications,
               applications, images, featured, created_at, updated_at
        FROM products
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Product>, ApiError> {
    let row = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, slug, description, category, specifications,
               applications, images, featured, created_at, updated_at
        FROM products
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, new: NewProduct) -> Result<Product, ApiError> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products
            (name, slug, description, category, specifications, applications, images, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, name, slug, description, category, specifications,
                  applications, images, featured, created_at, updated_at
        "#,
    )
    .bind(&new.name)
    .bind(&new.slug)
    .bind(&new.description)
    .bind(&new.category)
    .bind(Json(&new.specifications))
    .bind(&new.applications)
    .bind(&new.images)
    .bind(new.featured)
    .fetch_one(db)
    .await
    .map_err(|e| map_slug_conflict(e, &new.slug))
}

/// Sparse update in a single statement; NULL binds leave the column as-is.
pub async fn update(db: &PgPool, id: Uuid, changes: ProductChanges) -> Result<Product, ApiError> {
    let slug_for_err = changes.slug.clone().unwrap_or_default();
    let row = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products SET
            name           = COALESCE($2, name),
            slug           = COALESCE($3, slug),
            description    = COALESCE($4, description),
            category       = COALESCE($5, category),
            specifications = COALESCE($6, specifications),
            applications   = COALESCE($7, applications),
            images         = COALESCE($8, images),
            featured       = COALESCE($9, featured),
            updated_at     = now()
        WHERE id = $1
        RETURNING id, name, slug, description, category, specifications,
                  applications, images, featured, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(changes.name)
    .bind(changes.slug)
    .bind(changes.description)
    .bind(changes.category)
    .bind(changes.specifications.map(Json))
    .bind(changes.applications)
    .bind(changes.images)
    .bind(changes.featured)
    .fetch_optional(db)
    .await
    .map_err(|e| map_slug_conflict(e, &slug_for_err))?;
    row.ok_or(ApiError::NotFound("Product"))
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Product"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_serializes_with_order_preserving_fields() {
        let product = Product {
            id: Uuid::new_v4(),
            name: "Rock Phosphate".into(),
            slug: "rock-phosphate".into(),
            description: "High-grade rock phosphate.".into(),
            category: "Fertilizer".into(),
            specifications: Json(HashMap::from([("P2O5".to_string(), "28%".to_string())])),
            applications: vec!["Soil amendment".into()],
            images: vec!["https://cdn.example.com/p/rock.jpg".into()],
            featured: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["slug"], "rock-phosphate");
        assert_eq!(json["specifications"]["P2O5"], "28%");
        assert_eq!(json["applications"][0], "Soil amendment");
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
    }
}
