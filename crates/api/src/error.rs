//! Mapping from `AppError` to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crm_shared::AppError;
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An `AppError` on its way out as a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self(error) = self;
        if let AppError::Database(detail) | AppError::Internal(detail) = &error {
            error!(error = %detail, "request failed");
        }

        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        (
            status,
            Json(json!({
                "error_code": error.error_code(),
                "message": error.message(),
            })),
        )
            .into_response()
    }
}

/// Serializes a value for a response body.
///
/// # Errors
///
/// Returns `Internal` if the value cannot be represented as JSON.
pub fn to_json<T: Serialize>(value: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_shared::Resource;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    #[case(AppError::NotExist(Resource::Account), StatusCode::BAD_REQUEST, "account_not_exist")]
    #[case(
        AppError::Exists(Resource::SysUser),
        StatusCode::BAD_REQUEST,
        "sys_user_credential_combination_not_allowed"
    )]
    #[case(AppError::Unauthorized("missing session token".into()), StatusCode::UNAUTHORIZED, "unauthorized")]
    #[case(AppError::Database("deadlock".into()), StatusCode::BAD_REQUEST, "unhandled_exception")]
    #[tokio::test]
    async fn test_error_body(
        #[case] error: AppError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let response = ApiError(error).into_response();
        assert_eq!(response.status(), status);
        assert_eq!(body(response).await["error_code"], code);
    }

    #[tokio::test]
    async fn test_storage_detail_is_masked() {
        let response = ApiError(AppError::Database("relation missing".into())).into_response();
        let json = body(response).await;
        assert_eq!(json["message"], crm_shared::error::UNHANDLED_MESSAGE);
    }
}
