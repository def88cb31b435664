use async_graphql::{Context, Object, Result, SimpleObject};

use crate::{
    auth::RequestIdentity,
    models::MenuItem,
    services::menu_service,
    state::AppState,
};

#[derive(Default)]
pub struct MenuQueries;

#[Object]
impl MenuQueries {
    #[graphql(name = "getMenuItems")]
    async fn menu_items(
        &self,
        ctx: &Context<'_>,
        canteen_id: Option<i32>,
        category: Option<String>,
        #[graphql(default = false)] available_only: bool,
    ) -> Result<Vec<MenuItem>> {
        let state = ctx.data_unchecked::<AppState>();
        menu_service::list_menu_items(&state.orm, canteen_id, category, available_only)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getFeaturedMenuItems")]
    async fn featured_menu_items(&self, ctx: &Context<'_>) -> Result<Vec<MenuItem>> {
        let state = ctx.data_unchecked::<AppState>();
        menu_service::get_featured_menu_items(&state.orm)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getMenuItemsByCanteen")]
    async fn menu_items_by_canteen(
        &self,
        ctx: &Context<'_>,
        canteen_id: i32,
    ) -> Result<Vec<MenuItem>> {
        let state = ctx.data_unchecked::<AppState>();
        menu_service::get_menu_items_by_canteen(&state.orm, canteen_id)
            .await
            .map_err(|e| e.public_message().into())
    }

    async fn search_menu_items(&self, ctx: &Context<'_>, query: String) -> Result<Vec<MenuItem>> {
        let state = ctx.data_unchecked::<AppState>();
        menu_service::search_menu_items(&state.orm, &query)
            .await
            .map_err(|e| e.public_message().into())
    }
}

/// Outcome shape for menu mutations: failures are reported in-band, not as
/// GraphQL errors, so clients can branch on `success`.
#[derive(SimpleObject)]
pub struct MenuItemMutationResponse {
    pub success: bool,
    pub message: String,
    pub menu_item: Option<MenuItem>,
}

impl MenuItemMutationResponse {
    fn ok(message: impl Into<String>, menu_item: Option<MenuItem>) -> Self {
        Self {
            success: true,
            message: message.into(),
            menu_item,
        }
    }

    fn fail(message: String) -> Self {
        Self {
            success: false,
            message,
            menu_item: None,
        }
    }
}

#[derive(Default)]
pub struct MenuMutations;

#[Object]
impl MenuMutations {
    #[allow(clippy::too_many_arguments)]
    async fn create_menu_item(
        &self,
        ctx: &Context<'_>,
        name: String,
        price: i64,
        canteen_id: i32,
        description: Option<String>,
        image_url: Option<String>,
        category: Option<String>,
        is_vegetarian: Option<bool>,
        is_featured: Option<bool>,
    ) -> MenuItemMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return MenuItemMutationResponse::fail(err.public_message()),
        };
        match menu_service::create_menu_item(
            state,
            identity,
            name,
            price,
            canteen_id,
            description,
            image_url,
            category,
            is_vegetarian,
            is_featured,
        )
        .await
        {
            Ok(item) => MenuItemMutationResponse::ok("Menu item created", Some(item)),
            Err(err) => MenuItemMutationResponse::fail(err.public_message()),
        }
    }

    async fn update_menu_item_price(
        &self,
        ctx: &Context<'_>,
        item_id: i32,
        price: i64,
    ) -> MenuItemMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return MenuItemMutationResponse::fail(err.public_message()),
        };
        match menu_service::update_menu_item_price(state, identity, item_id, price).await {
            Ok(()) => MenuItemMutationResponse::ok("Price updated", None),
            Err(err) => MenuItemMutationResponse::fail(err.public_message()),
        }
    }

    async fn update_menu_item_availability(
        &self,
        ctx: &Context<'_>,
        item_id: i32,
        is_available: bool,
    ) -> MenuItemMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return MenuItemMutationResponse::fail(err.public_message()),
        };
        match menu_service::update_menu_item_availability(state, identity, item_id, is_available)
            .await
        {
            Ok(()) => MenuItemMutationResponse::ok("Availability updated", None),
            Err(err) => MenuItemMutationResponse::fail(err.public_message()),
        }
    }

    async fn delete_menu_item(&self, ctx: &Context<'_>, item_id: i32) -> MenuItemMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return MenuItemMutationResponse::fail(err.public_message()),
        };
        match menu_service::delete_menu_item(state, identity, item_id).await {
            Ok(name) => MenuItemMutationResponse::ok(format!("Deleted '{name}'"), None),
            Err(err) => MenuItemMutationResponse::fail(err.public_message()),
        }
    }

    async fn toggle_featured_status(
        &self,
        ctx: &Context<'_>,
        item_id: i32,
    ) -> MenuItemMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return MenuItemMutationResponse::fail(err.public_message()),
        };
        match menu_service::toggle_featured_status(state, identity, item_id).await {
            Ok(featured) => {
                let message = if featured {
                    "Item is now featured"
                } else {
                    "Item is no longer featured"
                };
                MenuItemMutationResponse::ok(message, None)
            }
            Err(err) => MenuItemMutationResponse::fail(err.public_message()),
        }
    }

    async fn update_preparation_time(
        &self,
        ctx: &Context<'_>,
        item_id: i32,
        preparation_time: i32,
    ) -> MenuItemMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return MenuItemMutationResponse::fail(err.public_message()),
        };
        match menu_service::update_preparation_time(state, identity, item_id, preparation_time)
            .await
        {
            Ok(()) => MenuItemMutationResponse::ok("Preparation time updated", None),
            Err(err) => MenuItemMutationResponse::fail(err.public_message()),
        }
    }

    /// `size_options` is a JSON document mapping size name to price delta,
    /// e.g. `{"regular": 0, "large": 40}`.
    async fn update_size_variations(
        &self,
        ctx: &Context<'_>,
        item_id: i32,
        size_options: String,
    ) -> MenuItemMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return MenuItemMutationResponse::fail(err.public_message()),
        };
        match menu_service::update_size_variations(state, identity, item_id, &size_options).await {
            Ok(()) => MenuItemMutationResponse::ok("Size variations updated", None),
            Err(err) => MenuItemMutationResponse::fail(err.public_message()),
        }
    }
}
