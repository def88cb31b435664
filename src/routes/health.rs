use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::response::ApiResponse;

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
    };

    Json(ApiResponse::success("Health check", data))
}

#[derive(Serialize, ToSchema)]
pub struct HelloData {
    greeting: String,
}

#[utoipa::path(
    get,
    path = "/api/hello",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HelloData>),
    ),
    tag = "Health"
)]
pub async fn hello() -> Json<ApiResponse<HelloData>> {
    let data = HelloData {
        greeting: "Hello from the canteen API".to_string(),
    };

    Json(ApiResponse::success("Hello", data))
}
