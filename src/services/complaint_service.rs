use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::{
    audit::log_audit,
    db::OrmConn,
    domain::{ComplaintCategory, ComplaintStatus},
    entity::{Complaints, complaints},
    error::{AppError, AppResult},
    models::Complaint,
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct CreateComplaintParams {
    pub user_id: i32,
    pub order_id: i32,
    pub heading: String,
    pub complaint_text: String,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateComplaintParams {
    pub heading: Option<String>,
    pub complaint_text: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub response_text: Option<String>,
}

pub async fn get_all_complaints(orm: &OrmConn) -> AppResult<Vec<Complaint>> {
    let complaints = Complaints::find()
        .order_by_desc(complaints::Column::CreatedAt)
        .all(orm)
        .await?;
    Ok(complaints.into_iter().map(Complaint::from_entity).collect())
}

pub async fn get_complaint_by_id(orm: &OrmConn, id: i32) -> AppResult<Option<Complaint>> {
    let complaint = Complaints::find_by_id(id).one(orm).await?;
    Ok(complaint.map(Complaint::from_entity))
}

pub async fn get_complaints_by_user_id(orm: &OrmConn, user_id: i32) -> AppResult<Vec<Complaint>> {
    let complaints = Complaints::find()
        .filter(complaints::Column::UserId.eq(user_id))
        .order_by_desc(complaints::Column::CreatedAt)
        .all(orm)
        .await?;
    Ok(complaints.into_iter().map(Complaint::from_entity).collect())
}

pub async fn get_complaints_by_order_id(orm: &OrmConn, order_id: i32) -> AppResult<Vec<Complaint>> {
    let complaints = Complaints::find()
        .filter(complaints::Column::OrderId.eq(order_id))
        .order_by_desc(complaints::Column::CreatedAt)
        .all(orm)
        .await?;
    Ok(complaints.into_iter().map(Complaint::from_entity).collect())
}

pub async fn create_complaint(
    state: &AppState,
    params: CreateComplaintParams,
) -> AppResult<Complaint> {
    let category: ComplaintCategory = params.category.parse()?;

    let now = Utc::now();
    let complaint = complaints::ActiveModel {
        id: NotSet,
        user_id: Set(params.user_id),
        order_id: Set(params.order_id),
        heading: Set(params.heading),
        complaint_text: Set(params.complaint_text),
        category: Set(category),
        status: Set(ComplaintStatus::Pending),
        is_escalated: Set(false),
        response_text: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(Some(now.into())),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(complaint.user_id),
        "complaint_create",
        Some("complaints"),
        Some(serde_json::json!({
            "complaint_id": complaint.id,
            "order_id": complaint.order_id,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Complaint::from_entity(complaint))
}

pub async fn update_complaint(
    state: &AppState,
    id: i32,
    params: UpdateComplaintParams,
) -> AppResult<Complaint> {
    let complaint = find_complaint(&state.orm, id).await?;

    let category = params
        .category
        .as_deref()
        .map(str::parse::<ComplaintCategory>)
        .transpose()?;
    let status = params
        .status
        .as_deref()
        .map(str::parse::<ComplaintStatus>)
        .transpose()?;

    let mut active: complaints::ActiveModel = complaint.into();
    if let Some(heading) = params.heading {
        active.heading = Set(heading);
    }
    if let Some(text) = params.complaint_text {
        active.complaint_text = Set(text);
    }
    if let Some(category) = category {
        active.category = Set(category);
    }
    if let Some(status) = status {
        active.status = Set(status);
    }
    if let Some(response) = params.response_text {
        active.response_text = Set(Some(response));
    }
    active.updated_at = Set(Some(Utc::now().into()));
    let complaint = active.update(&state.orm).await?;
    Ok(Complaint::from_entity(complaint))
}

pub async fn close_complaint(state: &AppState, id: i32) -> AppResult<Complaint> {
    let complaint = find_complaint(&state.orm, id).await?;

    let mut active: complaints::ActiveModel = complaint.into();
    active.status = Set(ComplaintStatus::Resolved);
    active.updated_at = Set(Some(Utc::now().into()));
    let complaint = active.update(&state.orm).await?;
    Ok(Complaint::from_entity(complaint))
}

pub async fn escalate_complaint(state: &AppState, id: i32) -> AppResult<Complaint> {
    let complaint = find_complaint(&state.orm, id).await?;

    let mut active: complaints::ActiveModel = complaint.into();
    active.is_escalated = Set(true);
    active.updated_at = Set(Some(Utc::now().into()));
    let complaint = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "complaint_escalate",
        Some("complaints"),
        Some(serde_json::json!({ "complaint_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Complaint::from_entity(complaint))
}

async fn find_complaint(orm: &OrmConn, id: i32) -> AppResult<complaints::Model> {
    Complaints::find_by_id(id)
        .one(orm)
        .await?
        .ok_or(AppError::NotFound("Complaint"))
}
