use axum::{Json, http::StatusCode};
use serde::Serialize;
use services::error::StoreError;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// On failure `data` holds the payload type's default value.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Empty `data` payload for responses that carry only a message.
#[derive(Serialize, Default)]
pub struct Empty {}

/// Maps a store failure to a status and envelope.
///
/// Connectivity problems are logged and reported generically.
pub fn store_failure<T>(err: StoreError) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    match err {
        StoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("{} {id} not found", capitalize(entity)))),
        ),
        StoreError::Conflict(msg) => (StatusCode::CONFLICT, Json(ApiResponse::error(msg))),
        other => {
            tracing::error!("store failure: {other}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error("Could not connect, please try again")),
            )
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
