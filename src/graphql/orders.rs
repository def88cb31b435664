use async_graphql::{Context, InputObject, Object, Result, SimpleObject};

use crate::{
    auth::RequestIdentity,
    domain::{Customizations, SelectedExtras},
    models::Order,
    services::order_service::{
        self, CreateOrderParams, OrderItemParams, ScheduledOrderItemParams, ScheduledOrderParams,
        UpdateOrderParams,
    },
    state::AppState,
};

#[derive(InputObject)]
pub struct OrderItemInput {
    pub item_id: i32,
    pub quantity: i32,
    pub customizations: Option<Customizations>,
    pub note: Option<String>,
}

#[derive(InputObject)]
pub struct CreateOrderInput {
    pub canteen_id: i32,
    pub items: Vec<OrderItemInput>,
    pub payment_method: String,
    pub phone: String,
    pub customer_note: Option<String>,
    #[graphql(default = false)]
    pub is_pre_order: bool,
    pub pickup_time: Option<String>,
}

#[derive(InputObject)]
pub struct ScheduledOrderItemInput {
    pub menu_item_id: i32,
    pub quantity: i32,
    /// Price per unit in the smallest currency unit, size delta included.
    pub unit_price: i64,
    pub size: Option<String>,
    pub extras: Option<SelectedExtras>,
    pub preparation_time: Option<i32>,
    pub special_instructions: Option<String>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct PlaceScheduledOrderInput {
    pub canteen_id: i32,
    pub items: Vec<ScheduledOrderItemInput>,
    pub tax_rate: f64,
    pub payment_method: Option<String>,
    pub pickup_time: Option<String>,
    pub notes_from_customer: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateOrderInput {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub pickup_time: Option<String>,
    pub customer_note: Option<String>,
}

#[derive(SimpleObject)]
pub struct OrderMutationResponse {
    pub success: bool,
    pub message: String,
    pub order: Option<Order>,
}

impl OrderMutationResponse {
    fn ok(message: impl Into<String>, order: Option<Order>) -> Self {
        Self {
            success: true,
            message: message.into(),
            order,
        }
    }

    fn fail(message: String) -> Self {
        Self {
            success: false,
            message,
            order: None,
        }
    }
}

#[derive(Default)]
pub struct OrderQueries;

#[Object]
impl OrderQueries {
    #[graphql(name = "getUserOrders")]
    async fn user_orders(&self, ctx: &Context<'_>, user_id: i32) -> Result<Vec<Order>> {
        let state = ctx.data_unchecked::<AppState>();
        order_service::get_user_orders(&state.orm, user_id)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getCanteenOrders")]
    async fn canteen_orders(&self, ctx: &Context<'_>, canteen_id: i32) -> Result<Vec<Order>> {
        let state = ctx.data_unchecked::<AppState>();
        order_service::get_canteen_orders(&state.orm, canteen_id)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getOrderById")]
    async fn order(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Order>> {
        let state = ctx.data_unchecked::<AppState>();
        order_service::get_order_by_id(&state.orm, id)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getOrdersByStatus")]
    async fn orders_by_status(&self, ctx: &Context<'_>, status: String) -> Result<Vec<Order>> {
        let state = ctx.data_unchecked::<AppState>();
        order_service::get_orders_by_status(&state.orm, &status)
            .await
            .map_err(|e| e.public_message().into())
    }

    /// A user's orders that are still moving through the pipeline.
    #[graphql(name = "getActiveOrders")]
    async fn active_orders(&self, ctx: &Context<'_>, user_id: i32) -> Result<Vec<Order>> {
        let state = ctx.data_unchecked::<AppState>();
        order_service::get_active_orders(&state.orm, user_id)
            .await
            .map_err(|e| e.public_message().into())
    }
}

#[derive(Default)]
pub struct OrderMutations;

#[Object]
impl OrderMutations {
    async fn create_order(
        &self,
        ctx: &Context<'_>,
        input: CreateOrderInput,
    ) -> OrderMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return OrderMutationResponse::fail(err.public_message()),
        };
        let params = CreateOrderParams {
            user_id: identity.user_id,
            canteen_id: input.canteen_id,
            items: input
                .items
                .into_iter()
                .map(|i| OrderItemParams {
                    item_id: i.item_id,
                    quantity: i.quantity,
                    customizations: i.customizations,
                    note: i.note,
                })
                .collect(),
            payment_method: input.payment_method,
            phone: input.phone,
            customer_note: input.customer_note,
            is_pre_order: input.is_pre_order,
            pickup_time: input.pickup_time,
        };
        match order_service::create_order(state, params).await {
            Ok(order) => OrderMutationResponse::ok("Order placed", Some(order)),
            Err(err) => OrderMutationResponse::fail(err.public_message()),
        }
    }

    async fn place_scheduled_order(
        &self,
        ctx: &Context<'_>,
        input: PlaceScheduledOrderInput,
    ) -> OrderMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return OrderMutationResponse::fail(err.public_message()),
        };
        let params = ScheduledOrderParams {
            user_id: identity.user_id,
            canteen_id: input.canteen_id,
            items: input
                .items
                .into_iter()
                .map(|i| ScheduledOrderItemParams {
                    menu_item_id: i.menu_item_id,
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    size: i.size,
                    extras: i.extras,
                    preparation_time: i.preparation_time,
                    special_instructions: i.special_instructions,
                    notes: i.notes,
                })
                .collect(),
            tax_rate: input.tax_rate,
            payment_method: input.payment_method,
            pickup_time: input.pickup_time,
            notes_from_customer: input.notes_from_customer,
        };
        match order_service::place_scheduled_order(state, params).await {
            Ok(order) => OrderMutationResponse::ok("Scheduled order placed", Some(order)),
            Err(err) => OrderMutationResponse::fail(err.public_message()),
        }
    }

    async fn update_order_status(
        &self,
        ctx: &Context<'_>,
        order_id: i32,
        status: String,
    ) -> OrderMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return OrderMutationResponse::fail(err.public_message()),
        };
        match order_service::update_order_status(state, identity, order_id, &status).await {
            Ok(order) => OrderMutationResponse::ok("Order status updated", Some(order)),
            Err(err) => OrderMutationResponse::fail(err.public_message()),
        }
    }

    async fn cancel_order(
        &self,
        ctx: &Context<'_>,
        order_id: i32,
        reason: String,
    ) -> OrderMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return OrderMutationResponse::fail(err.public_message()),
        };
        match order_service::cancel_order(state, identity, order_id, &reason).await {
            Ok(order) => OrderMutationResponse::ok("Order cancelled", Some(order)),
            Err(err) => OrderMutationResponse::fail(err.public_message()),
        }
    }

    async fn update_payment_status(
        &self,
        ctx: &Context<'_>,
        order_id: i32,
        payment_status: String,
    ) -> OrderMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return OrderMutationResponse::fail(err.public_message()),
        };
        match order_service::update_payment_status(state, identity, order_id, &payment_status).await
        {
            Ok(order) => OrderMutationResponse::ok("Payment status updated", Some(order)),
            Err(err) => OrderMutationResponse::fail(err.public_message()),
        }
    }

    async fn update_order(
        &self,
        ctx: &Context<'_>,
        order_id: i32,
        input: UpdateOrderInput,
    ) -> OrderMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        if let Err(err) = ctx.data_unchecked::<RequestIdentity>().require() {
            return OrderMutationResponse::fail(err.public_message());
        }
        let params = UpdateOrderParams {
            status: input.status,
            payment_status: input.payment_status,
            payment_method: input.payment_method,
            pickup_time: input.pickup_time,
            customer_note: input.customer_note,
        };
        match order_service::update_order(state, order_id, params).await {
            Ok(order) => OrderMutationResponse::ok("Order updated", Some(order)),
            Err(err) => OrderMutationResponse::fail(err.public_message()),
        }
    }
}
