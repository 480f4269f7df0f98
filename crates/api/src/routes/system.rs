//! System management routes: sign-up, login, and sys user administration.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::CookieJar;
use crm_db::{
    SessionService, SysUserRepository,
    entities::sys_users,
    repositories::{SignUpInput, UpdateSysUserInput},
};
use crm_shared::auth::LoginForm;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::envelope;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{CurrentUser, Pagination},
    middleware::session_cookie,
};

/// Routes reachable without a session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/system-management/sign-up/", post(sign_up))
        .route("/system-management/login", post(login))
}

/// Sys user administration (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/system-management/users/", get(list_users))
        .route(
            "/system-management/users/{sys_user_uuid}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/system-management/users/{sys_user_uuid}/disable", put(disable_user))
}

/// POST `/system-management/sign-up/` - Register an operator.
async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpInput>,
) -> ApiResult<impl IntoResponse> {
    let user = SysUserRepository::new(state.db.as_ref())
        .sign_up(payload)
        .await?;
    info!(sys_user = %user.uuid, "sys user signed up");
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST `/system-management/login` - Open a session.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<impl IntoResponse> {
    let (user, token) = SessionService::new(state.db.as_ref(), state.jwt_service.as_ref())
        .authenticate(&form.username, &form.password)
        .await?;
    info!(sys_user = %user.uuid, "sys user logged in");
    Ok((
        jar.add(session_cookie(&state.cookie, token)),
        Json(json!({ "message": "Successfully logged in." })),
    ))
}

/// GET `/system-management/users/` - List sys users.
async fn list_users(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Value>> {
    let users = SysUserRepository::new(state.db.as_ref()).list(page).await?;
    envelope("sys_users", users)
}

async fn get_user(
    State(state): State<AppState>,
    Path(sys_user_uuid): Path<Uuid>,
) -> ApiResult<Json<sys_users::Model>> {
    let user = SysUserRepository::new(state.db.as_ref())
        .get(sys_user_uuid)
        .await?;
    Ok(Json(user))
}

async fn update_user(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(sys_user_uuid): Path<Uuid>,
    Json(payload): Json<UpdateSysUserInput>,
) -> ApiResult<Json<sys_users::Model>> {
    let user = SysUserRepository::new(state.db.as_ref())
        .update(sys_user_uuid, payload, actor.uuid())
        .await?;
    Ok(Json(user))
}

/// PUT `/system-management/users/{uuid}/disable` - Lock an operator out.
async fn disable_user(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(sys_user_uuid): Path<Uuid>,
) -> ApiResult<Json<sys_users::Model>> {
    let user = SysUserRepository::new(state.db.as_ref())
        .disable(sys_user_uuid, actor.uuid())
        .await?;
    info!(sys_user = %user.uuid, by = %actor.uuid(), "sys user disabled");
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(sys_user_uuid): Path<Uuid>,
) -> ApiResult<Json<sys_users::Model>> {
    let user = SysUserRepository::new(state.db.as_ref())
        .delete(sys_user_uuid, actor.uuid())
        .await?;
    info!(sys_user = %user.uuid, by = %actor.uuid(), "sys user deleted");
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use crm_core::auth::hash_password;

    use crate::test_support::{USER, app, get, mock, send, signed_in, user};

    fn login_request(password: &str) -> Request<Body> {
        Request::post("/v1/system-management/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username=grace&password={password}")))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let mut grace = user();
        grace.password = hash_password("Correct1horse").unwrap();
        let db = mock().append_query_results([vec![grace]]).into_connection();

        let (status, headers, body) = send(app(db), login_request("Correct1horse")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully logged in.");
        let cookie = headers[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("jwt="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let mut grace = user();
        grace.password = hash_password("Correct1horse").unwrap();
        let db = mock().append_query_results([vec![grace]]).into_connection();

        let (status, headers, body) = send(app(db), login_request("Wrong1horse")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_credentials");
        assert!(headers.get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_protected_route_without_cookie() {
        let request = Request::get("/v1/system-management/users/")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(app(mock().into_connection()), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "unauthorized");
        assert!(headers.get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_protected_route_with_garbage_cookie() {
        let request = Request::get("/v1/system-management/users/")
            .header(header::COOKIE, "jwt=not-a-token")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(app(mock().into_connection()), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "invalid session token");
    }

    #[tokio::test]
    async fn test_get_user_refreshes_cookie_and_hides_password() {
        let db = signed_in()
            .append_query_results([vec![user()]])
            .into_connection();

        let (status, headers, body) =
            send(app(db), get(&format!("/v1/system-management/users/{USER}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "grace");
        assert!(body.get("password").is_none());
        let cookie = headers[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("jwt="));
    }

    #[tokio::test]
    async fn test_failed_handler_still_refreshes_cookie() {
        let db = signed_in()
            .append_query_results([Vec::<crm_db::entities::sys_users::Model>::new()])
            .into_connection();
        let missing = uuid::Uuid::from_u128(0xB2);

        let (status, headers, body) =
            send(app(db), get(&format!("/v1/system-management/users/{missing}"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "sys_user_not_exist");
        assert!(headers.get(header::SET_COOKIE).is_some());
    }
}
