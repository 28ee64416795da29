use crate::{
    auth,
    model::{user, AppState, Session},
};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use axum_macros::debug_handler;
use log::{debug, error};
use std::sync::Arc;

#[derive(Debug, serde::Deserialize)]
pub struct Credentials {
    name: String,
    password: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Stringified: tokens are i64 and JSON numbers would lose precision
    /// client-side.
    token: String,
    user_id: user::Id,
    role: user::Role,
}

#[debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Response {
    debug!("Got login request for user: {}", credentials.name);

    let database = state.database.lock().await;
    let user = match database.get_user_by_name(&credentials.name) {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("User not found: {}", credentials.name);
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(err) => {
            error!("Failed to get user from database: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if !auth::hash::check_passwords(credentials.password, &user.password) {
        debug!("Password incorrect for user: {}", user.name);
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let session = Session::generate(state.next_snowflake(), user.id.clone());

    debug!("Logging in user with session {}", session.id);

    if let Err(err) = database.add_session(session.clone()) {
        error!("Failed to add session to database: {}", err);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    Json(LoginResponse {
        token: session.token.to_string(),
        user_id: user.id,
        role: user.role,
    })
    .into_response()
}

#[debug_handler]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> StatusCode {
    debug!("Logging out session: {}", session.id);

    let database = state.database.lock().await;

    match database.delete_session(&session.id) {
        Ok(_) => StatusCode::RESET_CONTENT,
        Err(err) => {
            error!("Failed to delete session from database: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
