use axum::{
    body,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use tracing::{debug, warn};

use super::{MAX_IMAGE_SIZE_BYTES, error::ApiError};

/// Image bytes received from a client, with whatever metadata came along.
#[derive(Debug)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

pub async fn extract_request_image(request: Request) -> Result<UploadedImage, ApiError> {
    // Get the content type from the request headers
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        extract_multipart_image(request).await
    } else {
        extract_direct_image(request, &content_type).await
    }
}

// Reads the "file" field of a multipart upload
async fn extract_multipart_image(request: Request) -> Result<UploadedImage, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart request: {}", e)))?;

    let mut upload: Option<UploadedImage> = None;
    let mut ignored_fields = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            debug!(
                "Ignoring multipart field: {}",
                field.name().unwrap_or("unnamed")
            );
            ignored_fields += 1;
            continue;
        }

        if upload.is_some() {
            warn!("Multiple 'file' fields found in multipart request, using the last one");
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        debug!(
            "Received file {:?} with content type: {:?}",
            file_name, content_type
        );

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?
            .to_vec();

        if data.is_empty() {
            return Err(ApiError::BadRequest(
                "Uploaded 'file' field is empty.".to_string(),
            ));
        }

        upload = Some(UploadedImage {
            data,
            file_name,
            content_type,
        });
    }

    if ignored_fields > 0 {
        debug!(
            "Ignored {} non-file fields in multipart request",
            ignored_fields
        );
    }

    upload.ok_or_else(|| {
        ApiError::BadRequest("Missing 'file' field in multipart request.".to_string())
    })
}

// Reads a raw image/* or application/octet-stream body
async fn extract_direct_image(
    request: Request,
    content_type: &str,
) -> Result<UploadedImage, ApiError> {
    let accepted = content_type
        .parse::<mime::Mime>()
        .map(|parsed| {
            parsed.type_() == mime::IMAGE
                || parsed.essence_str() == mime::APPLICATION_OCTET_STREAM.essence_str()
        })
        .unwrap_or(false);

    if !accepted {
        return Err(ApiError::UnsupportedMediaType(format!(
            "Content-Type '{}' is not supported. Expected multipart/form-data, image/*, or application/octet-stream.",
            content_type
        )));
    }

    let bytes = body::to_bytes(request.into_body(), MAX_IMAGE_SIZE_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Request body is empty.".to_string()));
    }

    Ok(UploadedImage {
        data: bytes.to_vec(),
        file_name: None,
        content_type: Some(content_type.to_string()),
    })
}
