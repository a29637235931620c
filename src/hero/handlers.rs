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

use super::dto::{
    CreateHeroSlideRequest, MessageResponse, UpdateHeroSlideRequest, UploadImageResponse,
};
use super::repo::{self, HeroSlide, HeroSlideChanges};

const HERO_IMAGE_FOLDER: &str = "catalog-hero";
// One file at the 50 MiB per-file cap, plus multipart framing.
const MAX_MULTIPART_BYTES: usize = 64 * 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/hero", get(list_slides))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/hero", post(create_slide))
        .route("/hero/:id", put(update_slide).delete(delete_slide))
        .route("/hero/upload-image", post(upload_hero_image))
        .layer(DefaultBodyLimit::max(MAX_MULTIPART_BYTES))
}

#[instrument(skip(state))]
pub async fn list_slides(
    State(state): State<AppState>,
) -> Result<Json<Vec<HeroSlide>>, ApiError> {
    let db = state.db().await?;
    let slides = repo::list_active(db).await?;
    Ok(Json(slides))
}

#[instrument(skip(state, payload))]
pub async fn create_slide(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(payload): Json<CreateHeroSlideRequest>,
) -> Result<(StatusCode, Json<HeroSlide>), ApiError> {
    if payload.image.trim().is_empty() {
        return Err(ApiError::validation("image", "Image is required"));
    }

    let db = state.db().await?;
    let slide = repo::insert(
        db,
        payload.image.trim(),
        payload.label.as_deref().unwrap_or(""),
        payload.order,
        payload.is_active.unwrap_or(true),
    )
    .await?;

    info!(admin_id = %admin_id, slide_id = %slide.id, order = slide.position, "hero slide created");
    Ok((StatusCode::CREATED, Json(slide)))
}

#[instrument(skip(state, payload))]
pub async fn update_slide(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHeroSlideRequest>,
) -> Result<Json<HeroSlide>, ApiError> {
    if payload.image.as_deref().is_some_and(|i| i.trim().is_empty()) {
        return Err(ApiError::validation("image", "Image cannot be empty"));
    }

    let changes = HeroSlideChanges {
        image: payload.image,
        label: payload.label,
        position: payload.order,
        is_active: payload.is_active,
    };

    let db = state.db().await?;
    let slide = repo::update(db, id, changes).await?;
    info!(admin_id = %admin_id, slide_id = %slide.id, "hero slide updated");
    Ok(Json(slide))
}

#[instrument(skip(state))]
pub async fn delete_slide(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let db = state.db().await?;
    let slide = repo::find_by_id(db, id)
        .await?
        .ok_or(ApiError::NotFound("Hero slide"))?;

    // Remote asset cleanup is best-effort; the record goes away regardless.
    crate::images::services::delete_image_by_url(&state, &slide.image).await;

    repo::delete(db, id).await?;
    info!(admin_id = %admin_id, slide_id = %id, "hero slide deleted");
    Ok(Json(MessageResponse {
        message: "Hero slide deleted successfully",
    }))
}

#[instrument(skip(state, multipart))]
pub async fn upload_hero_image(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let mut files: Vec<UploadFile> = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation("image", format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation("image", format!("Failed to read file: {e}")))?;
        files.push(UploadFile {
            body: data,
            content_type,
        });
        break;
    }

    let mut urls = upload_images(&state, files, HERO_IMAGE_FOLDER).await?;
    Ok(Json(UploadImageResponse {
        url: urls.remove(0),
    }))
}
