//! Cookie session middleware for protected routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use crm_db::SessionService;
use crm_shared::config::CookieConfig;

use crate::{AppState, error::ApiError, extractors::CurrentUser};

/// Builds the session cookie carrying `token`.
pub fn session_cookie(config: &CookieConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.name.clone(), token))
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Validates the session cookie and slides its expiry.
///
/// The resolved user is stored in request extensions for [`CurrentUser`].
/// A successful response carries a freshly issued cookie; a rejected
/// session is answered with 401 and no cookie.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = jar.get(&state.cookie.name).map(Cookie::value);
    let session = SessionService::new(state.db.as_ref(), state.jwt_service.as_ref())
        .validate(token)
        .await;

    match session {
        Ok((user, refreshed)) => {
            request.extensions_mut().insert(CurrentUser(user));
            let response = next.run(request).await;
            (jar.add(session_cookie(&state.cookie, refreshed)), response).into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}
