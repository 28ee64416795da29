use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_macros::debug_handler;
use log::error;

use crate::model::{
    discussion, message, AppState, Database, Discussion, ItemType, Message, Session, StoreError,
    User,
};

#[derive(Debug, serde::Serialize)]
pub struct DiscussionResponse {
    #[serde(rename = "_id")]
    pub id: discussion::Id,
    pub messages: Vec<Message>,
}

/// Every mutation answers with the authoritative flat list; clients replace
/// their copy wholesale instead of patching it.
#[derive(Debug, serde::Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageBody {
    pub content: String,
    #[serde(default)]
    pub parent_message_id: Option<message::Id>,
}

#[derive(Debug, serde::Deserialize)]
pub struct EditMessageBody {
    pub content: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub cascade: bool,
}

#[debug_handler]
pub async fn get_discussion(
    State(state): State<Arc<AppState>>,
    Path((item_type, item_id)): Path<(ItemType, String)>,
) -> Result<Json<DiscussionResponse>, StatusCode> {
    let database = state.database.lock().await;

    let discussion = database
        .get_discussion(item_type, &item_id)
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let messages = database.get_messages(&discussion).map_err(internal_error)?;

    Ok(Json(DiscussionResponse {
        id: discussion,
        messages,
    }))
}

#[debug_handler]
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path((item_type, item_id)): Path<(ItemType, String)>,
    Json(body): Json<PostMessageBody>,
) -> Result<Json<MessagesResponse>, StatusCode> {
    let database = state.database.lock().await;

    // Discussions come into being with their first message.
    let discussion = match database
        .get_discussion(item_type, &item_id)
        .map_err(internal_error)?
    {
        Some(id) => id,
        None => {
            let discussion = Discussion {
                id: state.next_snowflake(),
                item_type,
                item_id,
            };
            database
                .create_discussion(&discussion)
                .map_err(internal_error)?;
            discussion.id
        }
    };

    let id = state.next_snowflake();
    database
        .post_message(
            &discussion,
            id,
            &session.user_id,
            &body.content,
            body.parent_message_id.as_ref(),
        )
        .map_err(error_status)?;

    let messages = database.get_messages(&discussion).map_err(internal_error)?;
    Ok(Json(MessagesResponse { messages }))
}

#[debug_handler]
pub async fn edit_message(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path((discussion, message)): Path<(discussion::Id, message::Id)>,
    Json(body): Json<EditMessageBody>,
) -> Result<Json<MessagesResponse>, StatusCode> {
    let database = state.database.lock().await;
    let requester = requesting_user(&database, &session)?;

    database
        .edit_message(&discussion, &message, &body.content, &requester)
        .map_err(error_status)?;

    let messages = database.get_messages(&discussion).map_err(internal_error)?;
    Ok(Json(MessagesResponse { messages }))
}

#[debug_handler]
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path((discussion, message)): Path<(discussion::Id, message::Id)>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MessagesResponse>, StatusCode> {
    let database = state.database.lock().await;
    let requester = requesting_user(&database, &session)?;

    database
        .delete_message(&discussion, &message, &requester, params.cascade)
        .map_err(error_status)?;

    let messages = database.get_messages(&discussion).map_err(internal_error)?;
    Ok(Json(MessagesResponse { messages }))
}

#[debug_handler]
pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path((discussion, message)): Path<(discussion::Id, message::Id)>,
) -> Result<Json<MessagesResponse>, StatusCode> {
    let database = state.database.lock().await;

    database
        .toggle_like(&discussion, &message, &session.user_id)
        .map_err(error_status)?;

    let messages = database.get_messages(&discussion).map_err(internal_error)?;
    Ok(Json(MessagesResponse { messages }))
}

fn requesting_user(database: &Database, session: &Session) -> Result<User, StatusCode> {
    match database.get_user(&session.user_id) {
        Ok(Some(user)) => Ok(user),
        // Account deleted since login
        Ok(None) => Err(StatusCode::UNAUTHORIZED),
        Err(err) => {
            error!("Failed to load requesting user: {}", err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn internal_error(err: rusqlite::Error) -> StatusCode {
    error!("Database error: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn error_status(err: StoreError) -> StatusCode {
    match err {
        StoreError::EmptyContent | StoreError::InvalidParent => StatusCode::BAD_REQUEST,
        StoreError::Forbidden => StatusCode::FORBIDDEN,
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Db(err) => internal_error(err),
    }
}
