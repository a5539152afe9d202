// gRPC front-end for the resize service (insecure channel)

mod service;

pub use service::ImageServiceImpl;

use crate::{executor::ResizeExecutor, web::MAX_IMAGE_SIZE_BYTES};
use std::{future::Future, net::SocketAddr};
use tonic::transport::Server;
use tracing::info;

// Generated from proto/image.proto
pub mod pb {
    tonic::include_proto!("image");
}

use pb::image_service_server::ImageServiceServer;

pub const DEFAULT_GRPC_ADDR: &str = "[::]:50051";

pub fn image_service(executor: ResizeExecutor) -> ImageServiceServer<ImageServiceImpl> {
    ImageServiceServer::new(ImageServiceImpl::new(executor))
        .max_decoding_message_size(MAX_IMAGE_SIZE_BYTES)
        .max_encoding_message_size(MAX_IMAGE_SIZE_BYTES)
}

pub async fn serve(
    addr: SocketAddr,
    executor: ResizeExecutor,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), tonic::transport::Error> {
    info!(
        "gRPC server listening on {} ({} resize workers)",
        addr,
        executor.workers()
    );

    Server::builder()
        .add_service(image_service(executor))
        .serve_with_shutdown(addr, shutdown)
        .await
}
