use agora::{logger, model::AppState, routes};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::services::ServeDir;

const ROOT_PATH: &str = "127.0.0.1:7878";

#[tokio::main]
async fn main() {
    logger::init();

    info!("Starting agora server at {}", ROOT_PATH);

    let state = Arc::new(AppState::new());

    // Every mutating discussion route goes through the bearer-token
    // middleware; reads and account creation stay open.
    let protected = Router::new()
        .route(
            "/api/discussions/:discussion/:item/message",
            post(routes::discussions::post_message),
        )
        .route(
            "/api/discussions/:discussion/message/:message",
            put(routes::discussions::edit_message).delete(routes::discussions::delete_message),
        )
        .route(
            "/api/discussions/:discussion/message/:message/like",
            post(routes::discussions::toggle_like),
        )
        .route("/api/logout", post(routes::sessions::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::authenticate,
        ));

    // The item-keyed and id-keyed discussion routes share leading segments,
    // so the route templates must reuse one parameter name per position; the
    // handlers bind each segment under its real meaning.
    let app = Router::new()
        .route(
            "/api/discussions/:discussion/:item",
            get(routes::discussions::get_discussion),
        )
        .route("/api/register", post(routes::register::register))
        .route("/api/login", post(routes::sessions::login))
        .merge(protected)
        .fallback_service(ServeDir::new("public"))
        .with_state(state);

    axum::Server::bind(&ROOT_PATH.parse().unwrap())
        .serve(app.into_make_service())
        .await
        .unwrap();
}
