// API handlers for the web server

use super::{
    error::ApiError,
    extract_request_data::extract_request_image,
    models::{Greeting, ResizeQuery},
};
use crate::{executor::ResizeExecutor, resize::Dimensions};
use axum::{
    Json,
    extract::{Query, Request, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{debug, info};
use uuid::Uuid;

// --- GET /hi ---
// Liveness probe
pub async fn hello() -> Json<Greeting> {
    debug!("Liveness probe hit");
    Json(Greeting {
        message: "Hello, World!".to_string(),
    })
}

// --- POST /resize?width=W&height=H ---
// Resizes the uploaded image to exactly WxH and returns it in its source format
pub async fn resize_image(
    State(executor): State<ResizeExecutor>,
    query: Result<Query<ResizeQuery>, QueryRejection>,
    request: Request,
) -> Result<Response, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let dims = Dimensions::new(params.width, params.height)?;

    let request_id = Uuid::new_v4();
    let upload = extract_request_image(request).await?;

    debug!(
        "Resize request {}: {} bytes, content type {:?}",
        request_id,
        upload.data.len(),
        upload.content_type
    );

    let file_name = upload.file_name.unwrap_or_else(|| "<body>".to_string());
    let resized = executor.run(upload.data, dims).await?;

    info!(
        "Resized {} from ({}, {}) to ({}, {}) as {}, request_id={}",
        file_name,
        resized.source_width,
        resized.source_height,
        resized.width,
        resized.height,
        resized.format_tag(),
        request_id
    );

    Ok(([(header::CONTENT_TYPE, resized.content_type())], resized.data).into_response())
}
