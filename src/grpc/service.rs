use super::pb::{ResizeRequest, ResizeResponse, image_service_server::ImageService};
use crate::{
    executor::{ExecuteError, ResizeExecutor},
    resize::{Dimensions, ResizeError},
};
use tonic::{Request, Response, Status};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ImageServiceImpl {
    executor: ResizeExecutor,
}

impl ImageServiceImpl {
    pub fn new(executor: ResizeExecutor) -> Self {
        Self { executor }
    }
}

impl From<ExecuteError> for Status {
    fn from(error: ExecuteError) -> Self {
        match error {
            ExecuteError::Resize(
                err @ (ResizeError::Decode(_) | ResizeError::EmptyDimensions { .. }),
            ) => Status::invalid_argument(err.to_string()),
            ExecuteError::Resize(err @ ResizeError::Encode { .. }) => {
                Status::internal(err.to_string())
            }
            ExecuteError::Worker(msg) => Status::internal(msg),
        }
    }
}

#[tonic::async_trait]
impl ImageService for ImageServiceImpl {
    async fn resize(
        &self,
        request: Request<ResizeRequest>,
    ) -> Result<Response<ResizeResponse>, Status> {
        let req = request.into_inner();
        let dims = Dimensions::new(req.width.into(), req.height.into())
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let request_id = Uuid::new_v4();
        debug!(
            "gRPC resize request {}: {} bytes",
            request_id,
            req.image_data.len()
        );

        let resized = self.executor.run(req.image_data, dims).await?;

        info!(
            "Resized from ({}, {}) to ({}, {}) as {}, request_id={}",
            resized.source_width,
            resized.source_height,
            resized.width,
            resized.height,
            resized.format_tag(),
            request_id
        );

        Ok(Response::new(ResizeResponse {
            format: resized.format_tag().to_string(),
            image_data: resized.data,
        }))
    }
}
