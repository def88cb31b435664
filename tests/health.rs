use canteen_graphql_api::routes::health::{health_check, hello};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");
    assert!(response.0.data.is_some());
}

#[tokio::test]
async fn hello_returns_greeting() {
    let response = hello().await;
    assert_eq!(response.0.message, "Hello");
    assert!(response.0.data.is_some());
}
