//! Checks that `AppError` variants map to the expected status code and
//! JSON body.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use ratesreg_api::error::AppError;
use ratesreg_core::error::CoreError;
use ratesreg_core::validation::{FieldViolation, ValidationResult};

async fn status_and_body(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_not_found_maps_to_404() {
    let err = AppError::Core(CoreError::not_found_by_id("Employee", 1));
    let (status, json) = status_and_body(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Employee ID 1 not found");
}

#[tokio::test]
async fn test_validation_maps_to_400_with_violations() {
    let result = ValidationResult::from_violations(vec![
        FieldViolation {
            field: "email".to_string(),
            kind: "email".to_string(),
            message: "Not a well-formed email address".to_string(),
            value: Some(serde_json::json!("emp1")),
        },
        FieldViolation {
            field: "age".to_string(),
            kind: "min".to_string(),
            message: "Employee age must be at least 18".to_string(),
            value: Some(serde_json::json!(0)),
        },
    ]);
    let (status, json) = status_and_body(AppError::Core(CoreError::Validation(result))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Not a well-formed email address");
    assert_matches!(json["violations"].as_array(), Some(v) if v.len() == 2);
}

#[tokio::test]
async fn test_conflict_maps_to_409() {
    let err = AppError::Core(CoreError::Conflict(
        "Username sgsakthi already exists".to_string(),
    ));
    let (status, json) = status_and_body(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Username sgsakthi already exists");
}

#[tokio::test]
async fn test_configuration_error_is_sanitized() {
    let err = AppError::Core(CoreError::Configuration(
        "unknown constraint kind 'phone'".to_string(),
    ));
    let (status, json) = status_and_body(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn test_bad_request_maps_to_400() {
    let (status, json) = status_and_body(AppError::BadRequest("bad id".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "bad id");
}

#[tokio::test]
async fn test_row_not_found_maps_to_404() {
    let err = AppError::Store(ratesreg_db::StoreError::Database(sqlx::Error::RowNotFound));
    let (status, json) = status_and_body(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_store_conflict_maps_to_409() {
    let err = AppError::Store(ratesreg_db::StoreError::username_taken("sgsakthi"));
    let (status, json) = status_and_body(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Username sgsakthi already exists");
}
