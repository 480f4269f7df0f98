//! Router fixtures backed by a mock database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{TimeZone, Utc};
use crm_db::entities::sys_users;
use crm_shared::{JwtConfig, JwtService, config::CookieConfig};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};

/// Uuid of the signed-in operator.
pub const USER: Uuid = Uuid::from_u128(0xA1);

pub fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "router-test-secret".to_string(),
        ..JwtConfig::default()
    })
}

pub fn user() -> sys_users::Model {
    sys_users::Model {
        id: 1,
        uuid: USER,
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: "grace@example.com".to_string(),
        username: "grace".to_string(),
        password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
        disabled_at: None,
        sys_created_at: Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .unwrap()
            .fixed_offset(),
        sys_created_by: None,
        sys_updated_at: None,
        sys_updated_by: None,
        sys_deleted_at: None,
        sys_deleted_by: None,
    }
}

pub fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// A mock whose first query resolves the session user.
pub fn signed_in() -> MockDatabase {
    mock().append_query_results([vec![user()]])
}

pub fn app(db: DatabaseConnection) -> Router {
    create_router(AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt()),
        cookie: Arc::new(CookieConfig::default()),
    })
}

/// `Cookie` header value for a valid session.
pub fn session() -> String {
    format!("jwt={}", jwt().issue(USER).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, session())
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, session())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
