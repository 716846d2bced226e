use axum::http::StatusCode;
use uuid::Uuid;

use crate::tests::fakes::FAILURE_DETAIL;
use crate::tests::fakes::FailingStorage;
use crate::tests::helper;

#[tokio::test]
async fn test_storage_failures_are_opaque() {
    let mut app = helper::setup_test_app_with_storage(FailingStorage);
    let id = Uuid::new_v4().to_string();

    let (status_code, _, error) = helper::maybe_create_note(&mut app, "Title", "").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!(
        Some(helper::Error {
            error: "Internal error".to_string(),
            description: None,
        }),
        error
    );

    let (_, body) = helper::call(&mut app, "GetNoteById", &serde_json::json!({ "id": id })).await;
    let body = String::from_utf8_lossy(&body[..]).to_string();
    assert!(!body.contains(FAILURE_DETAIL));

    let (status_code, _, error) = helper::single_note(&mut app, &id).await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!("Internal error", error.unwrap().error);

    let (status_code, _, error) = helper::update_note(&mut app, &id, "Title", "").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!("Internal error", error.unwrap().error);

    let (status_code, _, error) = helper::delete_note(&mut app, &id).await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!("Internal error", error.unwrap().error);

    let (status_code, _, error) = helper::list_notes(&mut app, 10, "start").await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status_code);
    assert_eq!("Internal error", error.unwrap().error);
}
