use super::{MAX_IMAGE_SIZE_BYTES, handlers};
use crate::executor::ResizeExecutor;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{IntoMakeService, get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

pub fn create_router(executor: ResizeExecutor) -> Router {
    Router::new()
        // Liveness probe
        .route("/hi", get(handlers::hello))
        .route("/resize", post(handlers::resize_image))
        // Apply a layer to limit the maximum size of request bodies
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        .with_state(executor)
}

pub fn create_app(executor: ResizeExecutor) -> IntoMakeService<Router> {
    create_router(executor).into_make_service()
}
