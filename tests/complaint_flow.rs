mod common;

use canteen_graphql_api::{
    error::AppError,
    services::complaint_service::{self, CreateComplaintParams, UpdateComplaintParams},
};

#[tokio::test]
async fn complaint_lifecycle_create_respond_close() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;

    let complaint = complaint_service::create_complaint(
        &state,
        CreateComplaintParams {
            user_id,
            order_id: 42,
            heading: "Cold food".into(),
            complaint_text: "The dosa arrived cold.".into(),
            category: "food_quality".into(),
        },
    )
    .await?;

    assert_eq!(complaint.status, "pending");
    assert_eq!(complaint.complaint_type, "food_quality");
    assert!(!complaint.is_escalated);

    let responded = complaint_service::update_complaint(
        &state,
        complaint.id,
        UpdateComplaintParams {
            response_text: Some("We are sorry; a refund is on its way.".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(
        responded.response_text.as_deref(),
        Some("We are sorry; a refund is on its way.")
    );

    let closed = complaint_service::close_complaint(&state, complaint.id).await?;
    assert_eq!(closed.status, "resolved");
    // Closing must restamp, so the timestamp is strictly newer.
    assert!(closed.updated_at.expect("updated") > closed.created_at);

    Ok(())
}

#[tokio::test]
async fn escalation_flags_the_complaint() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;

    let complaint = complaint_service::create_complaint(
        &state,
        CreateComplaintParams {
            user_id,
            order_id: 7,
            heading: "Wrong order".into(),
            complaint_text: "Got paneer instead of mushroom.".into(),
            category: "wrong_order".into(),
        },
    )
    .await?;

    let escalated = complaint_service::escalate_complaint(&state, complaint.id).await?;
    assert!(escalated.is_escalated);

    let listed = complaint_service::get_complaints_by_user_id(&state.orm, user_id).await?;
    assert_eq!(listed.len(), 1);
    assert!(listed[0].is_escalated);

    Ok(())
}

#[tokio::test]
async fn unknown_category_is_rejected() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user_id = common::create_user(&state, "student", "student@campus.edu").await?;

    let result = complaint_service::create_complaint(
        &state,
        CreateComplaintParams {
            user_id,
            order_id: 1,
            heading: "???".into(),
            complaint_text: "...".into(),
            category: "telepathy".into(),
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}
