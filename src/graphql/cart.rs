use async_graphql::{Context, InputObject, Object, Result, SimpleObject};

use crate::{
    auth::RequestIdentity,
    domain::SelectedExtras,
    models::{Cart, CartItem},
    services::cart_service::{self, AddToCartParams, UpdateCartItemParams},
    state::AppState,
};

#[derive(InputObject)]
pub struct AddToCartInput {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub selected_size: Option<String>,
    pub selected_extras: Option<SelectedExtras>,
    pub special_instructions: Option<String>,
    pub location: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateCartItemInput {
    pub quantity: Option<i32>,
    pub selected_size: Option<String>,
    pub selected_extras: Option<SelectedExtras>,
    pub special_instructions: Option<String>,
    pub location: Option<String>,
}

#[derive(SimpleObject)]
pub struct CartMutationResponse {
    pub success: bool,
    pub message: String,
    pub cart_item: Option<CartItem>,
}

impl CartMutationResponse {
    fn ok(message: impl Into<String>, cart_item: Option<CartItem>) -> Self {
        Self {
            success: true,
            message: message.into(),
            cart_item,
        }
    }

    fn fail(message: String) -> Self {
        Self {
            success: false,
            message,
            cart_item: None,
        }
    }
}

#[derive(Default)]
pub struct CartQueries;

#[Object]
impl CartQueries {
    /// A user's cart with its projected lines, or null when none exists yet.
    #[graphql(name = "getCartByUserId")]
    async fn cart_by_user_id(&self, ctx: &Context<'_>, user_id: i32) -> Result<Option<Cart>> {
        let state = ctx.data_unchecked::<AppState>();
        cart_service::get_cart_by_user_id(&state.orm, user_id)
            .await
            .map_err(|e| e.public_message().into())
    }
}

#[derive(Default)]
pub struct CartMutations;

#[Object]
impl CartMutations {
    async fn add_to_cart(&self, ctx: &Context<'_>, input: AddToCartInput) -> CartMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return CartMutationResponse::fail(err.public_message()),
        };
        let params = AddToCartParams {
            menu_item_id: input.menu_item_id,
            quantity: input.quantity,
            selected_size: input.selected_size,
            selected_extras: input.selected_extras,
            special_instructions: input.special_instructions,
            location: input.location,
        };
        match cart_service::add_to_cart(state, identity, params).await {
            Ok(item) => CartMutationResponse::ok("Item added to cart", Some(item)),
            Err(err) => CartMutationResponse::fail(err.public_message()),
        }
    }

    async fn update_cart_item(
        &self,
        ctx: &Context<'_>,
        cart_item_id: i32,
        input: UpdateCartItemInput,
    ) -> CartMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        if let Err(err) = ctx.data_unchecked::<RequestIdentity>().require() {
            return CartMutationResponse::fail(err.public_message());
        }
        let params = UpdateCartItemParams {
            quantity: input.quantity,
            selected_size: input.selected_size,
            selected_extras: input.selected_extras,
            special_instructions: input.special_instructions,
            location: input.location,
        };
        match cart_service::update_cart_item(state, cart_item_id, params).await {
            Ok(()) => CartMutationResponse::ok("Cart item updated", None),
            Err(err) => CartMutationResponse::fail(err.public_message()),
        }
    }

    async fn remove_from_cart(&self, ctx: &Context<'_>, cart_item_id: i32) -> CartMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return CartMutationResponse::fail(err.public_message()),
        };
        match cart_service::remove_from_cart(state, identity.user_id, cart_item_id).await {
            Ok(()) => CartMutationResponse::ok("Item removed from cart", None),
            Err(err) => CartMutationResponse::fail(err.public_message()),
        }
    }

    async fn clear_cart(&self, ctx: &Context<'_>) -> CartMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return CartMutationResponse::fail(err.public_message()),
        };
        match cart_service::clear_cart(state, identity.user_id).await {
            Ok(()) => CartMutationResponse::ok("Cart cleared", None),
            Err(err) => CartMutationResponse::fail(err.public_message()),
        }
    }
}
