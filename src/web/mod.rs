// HTTP front-end for the resize service
// Exposes the liveness probe and the multipart resize endpoint

mod app;
mod error;
mod extract_request_data;
mod handlers;
mod listeners;
mod models;

pub use app::{create_app, create_router};
pub use listeners::create_listener;

// Maximum allowed size for image upload requests
pub const MAX_IMAGE_SIZE_BYTES: usize = 100 * 1024 * 1024; // 100MB
