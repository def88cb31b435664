use async_graphql::{Context, InputObject, Object, Result, SimpleObject};

use crate::{
    auth::RequestIdentity,
    models::Complaint,
    services::complaint_service::{self, CreateComplaintParams, UpdateComplaintParams},
    state::AppState,
};

#[derive(InputObject)]
pub struct CreateComplaintInput {
    pub order_id: i32,
    pub heading: String,
    pub complaint_text: String,
    pub category: String,
}

#[derive(InputObject)]
pub struct UpdateComplaintInput {
    pub heading: Option<String>,
    pub complaint_text: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub response_text: Option<String>,
}

#[derive(SimpleObject)]
pub struct ComplaintMutationResponse {
    pub success: bool,
    pub message: String,
    pub complaint: Option<Complaint>,
}

impl ComplaintMutationResponse {
    fn ok(message: impl Into<String>, complaint: Option<Complaint>) -> Self {
        Self {
            success: true,
            message: message.into(),
            complaint,
        }
    }

    fn fail(message: String) -> Self {
        Self {
            success: false,
            message,
            complaint: None,
        }
    }
}

#[derive(Default)]
pub struct ComplaintQueries;

#[Object]
impl ComplaintQueries {
    #[graphql(name = "getAllComplaints")]
    async fn complaints(&self, ctx: &Context<'_>) -> Result<Vec<Complaint>> {
        let state = ctx.data_unchecked::<AppState>();
        complaint_service::get_all_complaints(&state.orm)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getComplaintById")]
    async fn complaint(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Complaint>> {
        let state = ctx.data_unchecked::<AppState>();
        complaint_service::get_complaint_by_id(&state.orm, id)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getComplaintsByUserId")]
    async fn complaints_by_user(&self, ctx: &Context<'_>, user_id: i32) -> Result<Vec<Complaint>> {
        let state = ctx.data_unchecked::<AppState>();
        complaint_service::get_complaints_by_user_id(&state.orm, user_id)
            .await
            .map_err(|e| e.public_message().into())
    }

    #[graphql(name = "getComplaintsByOrderId")]
    async fn complaints_by_order(
        &self,
        ctx: &Context<'_>,
        order_id: i32,
    ) -> Result<Vec<Complaint>> {
        let state = ctx.data_unchecked::<AppState>();
        complaint_service::get_complaints_by_order_id(&state.orm, order_id)
            .await
            .map_err(|e| e.public_message().into())
    }
}

#[derive(Default)]
pub struct ComplaintMutations;

#[Object]
impl ComplaintMutations {
    async fn create_complaint(
        &self,
        ctx: &Context<'_>,
        input: CreateComplaintInput,
    ) -> ComplaintMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        let identity = match ctx.data_unchecked::<RequestIdentity>().require() {
            Ok(identity) => identity,
            Err(err) => return ComplaintMutationResponse::fail(err.public_message()),
        };
        let params = CreateComplaintParams {
            user_id: identity.user_id,
            order_id: input.order_id,
            heading: input.heading,
            complaint_text: input.complaint_text,
            category: input.category,
        };
        match complaint_service::create_complaint(state, params).await {
            Ok(complaint) => ComplaintMutationResponse::ok("Complaint filed", Some(complaint)),
            Err(err) => ComplaintMutationResponse::fail(err.public_message()),
        }
    }

    async fn update_complaint(
        &self,
        ctx: &Context<'_>,
        id: i32,
        input: UpdateComplaintInput,
    ) -> ComplaintMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        if let Err(err) = ctx.data_unchecked::<RequestIdentity>().require() {
            return ComplaintMutationResponse::fail(err.public_message());
        }
        let params = UpdateComplaintParams {
            heading: input.heading,
            complaint_text: input.complaint_text,
            category: input.category,
            status: input.status,
            response_text: input.response_text,
        };
        match complaint_service::update_complaint(state, id, params).await {
            Ok(complaint) => ComplaintMutationResponse::ok("Complaint updated", Some(complaint)),
            Err(err) => ComplaintMutationResponse::fail(err.public_message()),
        }
    }

    async fn close_complaint(&self, ctx: &Context<'_>, id: i32) -> ComplaintMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        if let Err(err) = ctx.data_unchecked::<RequestIdentity>().require() {
            return ComplaintMutationResponse::fail(err.public_message());
        }
        match complaint_service::close_complaint(state, id).await {
            Ok(complaint) => ComplaintMutationResponse::ok("Complaint resolved", Some(complaint)),
            Err(err) => ComplaintMutationResponse::fail(err.public_message()),
        }
    }

    async fn escalate_complaint(&self, ctx: &Context<'_>, id: i32) -> ComplaintMutationResponse {
        let state = ctx.data_unchecked::<AppState>();
        if let Err(err) = ctx.data_unchecked::<RequestIdentity>().require() {
            return ComplaintMutationResponse::fail(err.public_message());
        }
        match complaint_service::escalate_complaint(state, id).await {
            Ok(complaint) => ComplaintMutationResponse::ok("Complaint escalated", Some(complaint)),
            Err(err) => ComplaintMutationResponse::fail(err.public_message()),
        }
    }
}
