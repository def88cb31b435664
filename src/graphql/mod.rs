//! GraphQL schema assembly. Resolvers are thin: they pull the request
//! identity out of context and delegate to the service layer.

mod cart;
mod canteens;
mod complaints;
mod menu;
mod orders;
mod users;

use async_graphql::http::GraphiQLSource;
use async_graphql::{EmptySubscription, MergedObject, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
};

use crate::{
    auth::{RequestIdentity, identity_from_headers},
    state::AppState,
};

pub use cart::{CartMutations, CartQueries};
pub use canteens::CanteenQueries;
pub use complaints::{ComplaintMutations, ComplaintQueries};
pub use menu::{MenuMutations, MenuQueries};
pub use orders::{OrderMutations, OrderQueries};
pub use users::UserQueries;

#[derive(Default, MergedObject)]
pub struct QueryRoot(
    CanteenQueries,
    MenuQueries,
    CartQueries,
    OrderQueries,
    ComplaintQueries,
    UserQueries,
);

#[derive(Default, MergedObject)]
pub struct MutationRoot(
    MenuMutations,
    CartMutations,
    OrderMutations,
    ComplaintMutations,
);

pub type CanteenSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> CanteenSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state)
    .finish()
}

/// GET on the GraphQL endpoint serves the interactive IDE.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/api/graphql").finish())
}

/// POST handler. The caller's token is verified here, once, and the result is
/// attached to the request so every resolver sees the same identity.
pub async fn graphql_handler(
    State(state): State<AppState>,
    Extension(schema): Extension<CanteenSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret);
    let req = req.into_inner().data(RequestIdentity(identity));
    schema.execute(req).await.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Field names are part of the wire contract the clients were built
    // against; renaming a resolver must not rename its schema field.
    #[test]
    fn schema_exposes_contract_field_names() {
        let sdl = Schema::build(
            QueryRoot::default(),
            MutationRoot::default(),
            EmptySubscription,
        )
        .finish()
        .sdl();

        for query in [
            "getCanteens",
            "getCanteenById",
            "getMenuItems",
            "getFeaturedMenuItems",
            "getMenuItemsByCanteen",
            "searchMenuItems",
            "getCartByUserId",
            "getUserOrders",
            "getCanteenOrders",
            "getOrderById",
            "getOrdersByStatus",
            "getActiveOrders",
            "getAllComplaints",
            "getComplaintById",
            "getComplaintsByUserId",
            "getComplaintsByOrderId",
            "getUserById",
            "getUserByEmail",
            "getUsersByRole",
            "searchUsers",
            "getCurrentUser",
        ] {
            assert!(sdl.contains(query), "schema is missing query '{query}'");
        }

        for mutation in [
            "addToCart",
            "updateCartItem",
            "removeFromCart",
            "clearCart",
            "createMenuItem",
            "updateMenuItemPrice",
            "updateMenuItemAvailability",
            "deleteMenuItem",
            "toggleFeaturedStatus",
            "updatePreparationTime",
            "updateSizeVariations",
            "createOrder",
            "placeScheduledOrder",
            "updateOrderStatus",
            "cancelOrder",
            "updatePaymentStatus",
            "updateOrder",
            "createComplaint",
            "updateComplaint",
            "closeComplaint",
            "escalateComplaint",
        ] {
            assert!(
                sdl.contains(mutation),
                "schema is missing mutation '{mutation}'"
            );
        }
    }
}
