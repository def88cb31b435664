use serde::Serialize;
use utoipa::ToSchema;

/// Envelope for the small REST surface (health, hello, payment callback).
/// The GraphQL operations carry their own typed responses instead.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}
