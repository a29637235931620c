use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateHeroSlideRequest {
    pub image: String,
    pub label: Option<String>,
    /// Display position; defaults to one past the current maximum.
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Sparse update: only fields present in the body are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateHeroSlideRequest {
    pub image: Option<String>,
    pub label: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_needs_only_the_image() {
        let req: CreateHeroSlideRequest =
            serde_json::from_str(r#"{"image":"https://cdn.example.com/h/1.jpg"}"#).unwrap();
        assert_eq!(req.image, "https://cdn.example.com/h/1.jpg");
        assert!(req.label.is_none());
        assert!(req.order.is_none());
        assert!(req.is_active.is_none());
    }

    #[test]
    fn update_request_fields_default_to_absent() {
        let req: UpdateHeroSlideRequest = serde_json::from_str(r#"{"order":3}"#).unwrap();
        assert_eq!(req.order, Some(3));
        assert!(req.image.is_none());
        assert!(req.is_active.is_none());
    }
}
