// Runs resize operations off the async reactor with a bounded number of
// concurrent workers. Shared by the HTTP and gRPC servers.

use crate::resize::{Dimensions, ResizeError, ResizedImage, resize_image};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::debug;

pub const DEFAULT_WORKERS: usize = 10;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Resize(#[from] ResizeError),
    #[error("resize worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone)]
pub struct ResizeExecutor {
    permits: Arc<Semaphore>,
    workers: usize,
}

impl Default for ResizeExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl ResizeExecutor {
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Resize on the blocking pool once a worker slot is free.
    /// Callers beyond the worker count wait here in FIFO order.
    pub async fn run(&self, data: Vec<u8>, dims: Dimensions) -> Result<ResizedImage, ExecuteError> {
        self.spawn_with_permit(move || resize_image(&data, dims.width(), dims.height()))
            .await?
            .map_err(ExecuteError::from)
    }

    // The permit moves into the blocking task, so a caller that is dropped
    // mid-resize keeps its slot until the work itself finishes.
    async fn spawn_with_permit<T, F>(&self, work: F) -> Result<T, ExecuteError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| ExecuteError::Worker(e.to_string()))?;

        debug!(
            "Worker slot acquired ({} of {} free)",
            self.permits.available_permits(),
            self.workers
        );

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work()
        })
        .await
        .map_err(|e| ExecuteError::Worker(format!("resize task failed: {}", e)))
    }
}
