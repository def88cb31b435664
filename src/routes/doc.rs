use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    response::ApiResponse,
    routes::{health, payment},
};

// The GraphQL schema documents itself through introspection; only the REST
// surface is described here.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::hello,
        payment::verify_payment,
    ),
    components(
        schemas(
            health::HealthData,
            health::HelloData,
            payment::PaymentVerifyRequest,
            payment::PaymentVerifyData,
            ApiResponse<health::HealthData>,
            ApiResponse<payment::PaymentVerifyData>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Payment", description = "Payment provider callback"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
