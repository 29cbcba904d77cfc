use std::sync::Arc;

use bookshelf_db::Catalog;

use crate::config::ServerConfig;
use crate::uploads::ImageUploads;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Injected category/author/book stores.
    pub catalog: Catalog,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Book cover image storage.
    pub uploads: Arc<ImageUploads>,
}

impl AppState {
    pub fn new(catalog: Catalog, config: ServerConfig) -> Self {
        let uploads = Arc::new(ImageUploads::new(config.upload_dir.clone()));
        Self {
            catalog,
            config: Arc::new(config),
            uploads,
        }
    }
}
