use async_graphql::{Context, Object, Result};

use crate::{models::Canteen, services::canteen_service, state::AppState};

#[derive(Default)]
pub struct CanteenQueries;

#[Object]
impl CanteenQueries {
    #[graphql(name = "getCanteens")]
    async fn canteens(&self, ctx: &Context<'_>) -> Result<Vec<Canteen>> {
        let state = ctx.data_unchecked::<AppState>();
        canteen_service::list_canteens(&state.orm)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getCanteenById")]
    async fn canteen(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Canteen>> {
        let state = ctx.data_unchecked::<AppState>();
        canteen_service::get_canteen_by_id(&state.orm, id)
            .await
            .map_err(|e| e.public_message().into())
    }
}
