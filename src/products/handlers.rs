use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AdminUser,
    error::ApiError,
    images::services::{upload_images, UploadFile},
    state::AppState,
};

use super::dto::{CreateProductRequest, MessageResponse, UpdateProductRequest, UploadImagesResponse};
use super::repo::{self, NewProduct, Product, ProductChanges};
use super::services::derive_slug;

const PRODUCT_IMAGE_FOLDER: &str = "catalog-products";
const MAX_UPLOAD_FILES: usize = 10;
// 10 files at the 50 MiB per-file cap, plus multipart framing.
const MAX_MULTIPART_BYTES: usize = 512 * 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    // The param segment must be named the same as in the write routes for the
    // routers to merge; for GET it carries the slug, not the id.
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/products/upload-images", post(upload_product_images))
        .layer(DefaultBodyLimit::max(MAX_MULTIPART_BYTES))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let db = state.db().await?;
    let products = repo::list_all(db).await?;
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let db = state.db().await?;
    let product = repo::find_by_slug(db, &slug)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;
    Ok(Json(product))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("name", "Name is required"));
    }
    if payload.description.is_empty() {
        return Err(ApiError::validation("description", "Description is required"));
    }

    // A stored slug is never re-derived; derivation happens exactly once,
    // here, when the caller omits it.
    let slug = match payload.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_lowercase(),
        None => derive_slug(&name),
    };
    if slug.is_empty() {
        return Err(ApiError::validation("slug", "A slug could not be derived from this name"));
    }

    let db = state.db().await?;
    let product = repo::insert(
        db,
        NewProduct {
            name,
            slug,
            description: payload.description,
            category: payload.category.unwrap_or_default(),
            specifications: payload.specifications.unwrap_or_default(),
            applications: payload.applications.unwrap_or_default(),
            images: payload.images.unwrap_or_default(),
            featured: payload.featured.unwrap_or(false),
        },
    )
    .await?;

    info!(admin_id = %admin_id, product_id = %product.id, slug = %product.slug, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    if payload.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::validation("name", "Name cannot be empty"));
    }
    if payload.description.as_deref().is_some_and(str::is_empty) {
        return Err(ApiError::validation("description", "Description cannot be empty"));
    }
    if payload.slug.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(ApiError::validation("slug", "Slug cannot be empty"));
    }

    let changes = ProductChanges {
        name: payload.name.map(|s| s.trim().to_string()),
        slug: payload.slug.map(|s| s.trim().to_lowercase()),
        description: payload.description,
        category: payload.category,
        specifications: payload.specifications,
        applications: payload.applications,
        images: payload.images,
        featured: payload.featured,
    };

    let db = state.db().await?;
    let product = repo::update(db, id, changes).await?;
    info!(admin_id = %admin_id, product_id = %product.id, "product updated");
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let db = state.db().await?;
    let product = repo::find_by_id(db, id)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;

    // Remote asset cleanup is best-effort; the record goes away regardless.
    for url in &product.images {
        crate::images::services::delete_image_by_url(&state, url).await;
    }

    repo::delete(db, id).await?;
    info!(admin_id = %admin_id, product_id = %id, "product deleted");
    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}

#[instrument(skip(state, multipart))]
pub async fn upload_product_images(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    mut multipart: Multipart,
) -> Result<Json<UploadImagesResponse>, ApiError> {
    let mut files: Vec<UploadFile> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation("images", format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        if !matches!(name.as_deref(), Some("images") | Some("images[]")) {
            continue;
        }
        if files.len() >= MAX_UPLOAD_FILES {
            return Err(ApiError::validation(
                "images",
                format!("At most {MAX_UPLOAD_FILES} files are allowed"),
            ));
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation("images", format!("Failed to read file: {e}")))?;
        files.push(UploadFile {
            body: data,
            content_type,
        });
    }

    let urls = upload_images(&state, files, PRODUCT_IMAGE_FOLDER).await?;
    Ok(Json(UploadImagesResponse { urls }))
}
