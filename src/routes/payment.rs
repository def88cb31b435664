use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/verify", post(verify_payment))
}

#[derive(Deserialize, ToSchema)]
pub struct PaymentVerifyRequest {
    pub order_id: i32,
    /// Provider verdict: paid, failed or refunded.
    pub payment_status: String,
    pub payment_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaymentVerifyData {
    pub order_id: i32,
    pub payment_status: String,
}

/// Callback target for the payment provider; no vendor token is involved.
#[utoipa::path(
    post,
    path = "/api/payment/verify",
    request_body = PaymentVerifyRequest,
    responses(
        (status = 200, description = "Payment recorded", body = ApiResponse<PaymentVerifyData>),
        (status = 400, description = "Unknown payment status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Payment"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(body): Json<PaymentVerifyRequest>,
) -> AppResult<Json<ApiResponse<PaymentVerifyData>>> {
    let order = order_service::record_payment_result(
        &state,
        body.order_id,
        &body.payment_status,
        body.payment_id,
    )
    .await?;

    let data = PaymentVerifyData {
        order_id: order.id,
        payment_status: order.payment_status,
    };
    Ok(Json(ApiResponse::success("Payment recorded", data)))
}
