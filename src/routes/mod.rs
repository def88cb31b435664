use axum::{Router, routing::get};

use crate::{
    graphql::{graphiql, graphql_handler},
    state::AppState,
};

pub mod doc;
pub mod health;
pub mod payment;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/hello", get(health::hello))
        .nest("/payment", payment::router())
}
