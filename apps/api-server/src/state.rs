//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::{Category, Post};
use quill_core::error::RepoError;
use quill_core::ports::{
    BlobStore, CategoryRepository, PostFilter, PostRepository, PostWithCategory,
};
use quill_core::service::{CategoryService, PostService};
use quill_infra::DiskBlobStore;

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresPostRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
}

/// Stub post repository for when no database is configured.
pub struct UnconfiguredPosts;

#[async_trait::async_trait]
impl PostRepository for UnconfiguredPosts {
    async fn find_by_id(&self, _id: uuid::Uuid) -> Result<Option<Post>, RepoError> {
        tracing::warn!("Database not configured - post operations are no-ops");
        Ok(None)
    }

    async fn find_with_category(
        &self,
        _id: uuid::Uuid,
    ) -> Result<Option<PostWithCategory>, RepoError> {
        Ok(None)
    }

    async fn list(&self, _filter: &PostFilter) -> Result<(Vec<PostWithCategory>, u64), RepoError> {
        Ok((Vec::new(), 0))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        Ok(post)
    }

    async fn delete(&self, _id: uuid::Uuid) -> Result<(), RepoError> {
        Ok(())
    }

    async fn slug_exists(&self, _slug: &str) -> Result<bool, RepoError> {
        Ok(false)
    }
}

/// Stub category repository for when no database is configured.
pub struct UnconfiguredCategories;

#[async_trait::async_trait]
impl CategoryRepository for UnconfiguredCategories {
    async fn find_by_id(&self, _id: uuid::Uuid) -> Result<Option<Category>, RepoError> {
        Ok(None)
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<Category>, RepoError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        Ok(Vec::new())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        Ok(category)
    }
}

fn unconfigured_repos() -> (Arc<dyn PostRepository>, Arc<dyn CategoryRepository>) {
    (Arc::new(UnconfiguredPosts), Arc::new(UnconfiguredCategories))
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let blobs: Arc<dyn BlobStore> = Arc::new(DiskBlobStore::new(&config.uploads_dir));

        #[cfg(feature = "postgres")]
        let (post_repo, category_repo): (Arc<dyn PostRepository>, Arc<dyn CategoryRepository>) = {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let db = connections.main;
                        (
                            Arc::new(PostgresPostRepository::new(db.clone())),
                            Arc::new(PostgresCategoryRepository::new(db)),
                        )
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using stub repositories.",
                            e
                        );
                        unconfigured_repos()
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running with stub repositories.");
                unconfigured_repos()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (post_repo, category_repo): (Arc<dyn PostRepository>, Arc<dyn CategoryRepository>) = {
            tracing::info!("Running without postgres feature - using stub repositories");
            unconfigured_repos()
        };

        tracing::info!("Application state initialized");

        Self {
            posts: Arc::new(PostService::new(post_repo, blobs)),
            categories: Arc::new(CategoryService::new(category_repo)),
        }
    }
}
