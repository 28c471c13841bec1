use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Post};
use crate::error::RepoError;

/// A post joined with its category (when it has one).
pub type PostWithCategory = (Post, Option<Category>);

/// Listing filter for posts.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Case-insensitive substring match against title OR content.
    pub search: Option<String>,
    pub category: Option<Uuid>,
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Find a post joined with its category's display data.
    async fn find_with_category(&self, id: Uuid) -> Result<Option<PostWithCategory>, RepoError>;

    /// List posts matching `filter`, newest first, with the total match count.
    async fn list(&self, filter: &PostFilter) -> Result<(Vec<PostWithCategory>, u64), RepoError>;

    /// Insert a new post. Slug collisions surface as [`RepoError::Constraint`].
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Overwrite an existing post row.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete a post. [`RepoError::NotFound`] if no row matched.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Whether a slug is currently in use.
    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    /// Exact, case-sensitive name lookup.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    /// All categories sorted by name ascending.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    async fn insert(&self, category: Category) -> Result<Category, RepoError>;
}
