use async_graphql::{Context, Object, Result};

use crate::{auth::RequestIdentity, models::User, services::user_service, state::AppState};

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    #[graphql(name = "getUserById")]
    async fn user(&self, ctx: &Context<'_>, id: i32) -> Result<Option<User>> {
        let state = ctx.data_unchecked::<AppState>();
        user_service::get_user_by_id(&state.orm, id)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getUserByEmail")]
    async fn user_by_email(&self, ctx: &Context<'_>, email: String) -> Result<Option<User>> {
        let state = ctx.data_unchecked::<AppState>();
        user_service::get_user_by_email(&state.orm, &email)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getUsersByRole")]
    async fn users_by_role(&self, ctx: &Context<'_>, role: String) -> Result<Vec<User>> {
        let state = ctx.data_unchecked::<AppState>();
        user_service::get_users_by_role(&state.orm, &role)
            .await
            .map_err(|e| e.public_message().into())
    }

    async fn search_users(&self, ctx: &Context<'_>, query: String) -> Result<Vec<User>> {
        let state = ctx.data_unchecked::<AppState>();
        user_service::search_users(&state.orm, &query)
            .await
            .map_err(|e| e.public_message().into())
    }

    /// The user behind the request token, or null for anonymous callers.
    #[graphql(name = "getCurrentUser")]
    async fn current_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let state = ctx.data_unchecked::<AppState>();
        let identity = ctx.data_unchecked::<RequestIdentity>();
        let Some(identity) = identity.0.as_ref() else {
            return Ok(None);
        };
        user_service::get_current_user(&state.orm, identity)
            .await
            .map_err(|e| e.public_message().into())
    }
}
