use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
    pub category: Option<String>,
    pub specifications: Option<HashMap<String, String>>,
    pub applications: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub featured: Option<bool>,
}

/// Sparse update: only fields present in the body are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub specifications: Option<HashMap<String, String>>,
    pub applications: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub featured: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UploadImagesResponse {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_fields_default_to_absent() {
        let req: UpdateProductRequest = serde_json::from_str(r#"{"category":"Fertilizer"}"#).unwrap();
        assert_eq!(req.category.as_deref(), Some("Fertilizer"));
        assert!(req.name.is_none());
        assert!(req.description.is_none());
        assert!(req.images.is_none());
        assert!(req.featured.is_none());
    }
}
