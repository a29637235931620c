use serde::Deserialize;

/// JWT signing settings. A missing secret surfaces as a 500 on the first
/// protected request, not at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub ttl_days: i64,
}

/// Object-store (S3 / MinIO) settings. Absent entirely when the credentials
/// are not configured; upload endpoints then answer 500.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub storage: Option<StorageConfig>,
    pub allowed_origin: Option<String>,
    /// Per-file upload cap in bytes.
    pub max_upload_bytes: usize,
}

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

impl AppConfig {
    pub fn from_env() -> Self {
        let storage = match (
            std::env::var("S3_ENDPOINT"),
            std::env::var("S3_BUCKET"),
            std::env::var("S3_ACCESS_KEY"),
            std::env::var("S3_SECRET_KEY"),
        ) {
            (Ok(endpoint), Ok(bucket), Ok(access_key), Ok(secret_key)) => Some(StorageConfig {
                endpoint,
                bucket,
                access_key,
                secret_key,
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            }),
            _ => None,
        };

        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            jwt: JwtConfig {
                secret: std::env::var("JWT_SECRET").ok(),
                ttl_days: std::env::var("JWT_TTL_DAYS")
                    .ok()
                    .and_then(|v| v.parse::<i64>().ok())
                    .unwrap_or(7),
            },
            storage,
            allowed_origin: std::env::var("ALLOWED_ORIGIN").ok(),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}
