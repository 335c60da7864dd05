//! API route handlers
//!
//! Success responses for register/login/logout are 302 redirects
//! carrying the committed session cookie; failures are rendered by
//! `Error::into_response` as JSON with the matching status code.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;

use super::server::SharedState;
use crate::auth::models::{LoginForm, RegisterForm};
use crate::auth::{user_id_from_request, SessionRedirect};
use crate::error::Error;

/// Envelope for plain data responses. Failures never use it; they are
/// rendered by `Error::into_response`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

fn session_redirect(redirect: SessionRedirect) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, redirect.location),
            (header::SET_COOKIE, redirect.set_cookie),
        ],
    )
        .into_response()
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth routes

pub async fn register(
    State(state): State<SharedState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, Error> {
    let redirect = state.auth.register(form).await?;
    Ok(session_redirect(redirect))
}

pub async fn login(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, Error> {
    let redirect = state.auth.login(form).await?;
    Ok(session_redirect(redirect))
}

pub async fn logout(State(state): State<SharedState>) -> Response {
    session_redirect(state.auth.logout())
}

/// Identity of the caller's session, for authenticated clients
#[derive(Debug, Serialize)]
pub struct CurrentUser {
    #[serde(rename = "userId")]
    pub user_id: String,
}

pub async fn current_user(
    State(state): State<SharedState>,
    req: Request,
) -> Result<Json<ApiResponse<CurrentUser>>, Error> {
    let user_id = user_id_from_request(state.auth.sessions(), &req)?;
    Ok(Json(ApiResponse::ok(CurrentUser { user_id })))
}
