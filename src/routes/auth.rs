use std::sync::Arc;

use axum::{
    extract::{State, TypedHeader},
    headers::{authorization::Bearer, Authorization},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::trace;

use crate::{
    auth::verify_session,
    model::{session::Token, AppState},
};

/// Resolves the bearer token to a [`Session`](crate::model::Session) and
/// attaches it to the request. Every mutating route sits behind this.
pub async fn authenticate<B>(
    State(state): State<Arc<AppState>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Response {
    let Some(TypedHeader(bearer)) = bearer else {
        trace!("No bearer token on request");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let Some(token) = parse_token(bearer.token()) else {
        trace!("Bearer token is not a valid token");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let database = state.database.lock().await;
    let session = match verify_session::verify_session(token, &database) {
        Ok(session) => session,
        Err(verify_session::Error::SessionNotFound) => {
            return StatusCode::UNAUTHORIZED.into_response()
        }
        Err(verify_session::Error::DatabaseError) => {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };
    drop(database);

    trace!("Request authenticated with session {}", session.id);

    request.extensions_mut().insert(session);

    next.run(request).await
}

fn parse_token(token: &str) -> Option<Token> {
    token.parse::<Token>().ok()
}
