//! Post write and read pipelines.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::Post;
use crate::error::{DomainError, RepoError};
use crate::media::resolve_featured_image;
use crate::ports::{BlobStore, PostFilter, PostRepository, PostWithCategory, Upload};
use crate::slug::derive_unique_slug;

/// Attempts at re-deriving a slug after a unique-constraint conflict before
/// giving up. Conflicts require a concurrent insert of the same title, so one
/// retry is almost always enough.
const SLUG_CONFLICT_RETRIES: u32 = 3;

const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Input for creating a post. Text fields are boundary-validated; the
/// pipeline re-checks title/content anyway.
#[derive(Debug, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub category: Option<Uuid>,
    pub upload: Option<Upload>,
    pub image_url: Option<String>,
}

/// Partial update - only supplied fields change.
#[derive(Debug, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<Uuid>,
    pub upload: Option<Upload>,
    pub image_url: Option<String>,
}

/// One page of a post listing.
#[derive(Debug)]
pub struct PostPage {
    pub items: Vec<PostWithCategory>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

/// Orchestrates slug derivation, image resolution, and persistence for posts.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { posts, blobs }
    }

    /// Create a post: validate, store the upload (if any), derive a unique
    /// slug, persist, and return the row joined with its category.
    pub async fn create(&self, input: NewPost) -> Result<PostWithCategory, DomainError> {
        let title = input.title.trim().to_string();
        if title.is_empty() || input.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Title and content are required".to_string(),
            ));
        }

        let author = match input.author.as_deref().map(str::trim) {
            Some(author) if !author.is_empty() => author.to_string(),
            _ => "Anonymous".to_string(),
        };

        let stored = self.store_upload(input.upload.as_ref()).await?;
        let featured_image =
            resolve_featured_image(stored.clone(), input.image_url.as_deref(), None);

        let result = self
            .insert_with_unique_slug(&title, |slug| {
                Post::new(
                    title.clone(),
                    input.content.clone(),
                    slug,
                    author.clone(),
                    input.category,
                    featured_image.clone(),
                )
            })
            .await;

        let saved = match result {
            Ok(saved) => saved,
            Err(err) => {
                // The blob was written before the row; don't leave an orphan
                // behind when the insert fails.
                self.discard_blob(stored.as_deref()).await;
                return Err(err);
            }
        };

        self.fetch_joined(saved.id).await
    }

    /// Partial update: only supplied fields change, the slug is re-derived
    /// only when the title actually changes, and an update carrying neither a
    /// file nor an image URL leaves the existing image untouched.
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<PostWithCategory, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity_type: "Post", id })?;

        if let Some(title) = patch.title.as_deref() {
            let title = title.trim();
            if title.is_empty() {
                return Err(DomainError::Validation("Title must not be empty".to_string()));
            }
            if title != post.title {
                post.slug = self.derive_slug(title).await?;
            }
            post.title = title.to_string();
        }
        if let Some(content) = patch.content {
            if content.trim().is_empty() {
                return Err(DomainError::Validation(
                    "Content must not be empty".to_string(),
                ));
            }
            post.content = content;
        }
        if let Some(author) = patch.author {
            post.author = author;
        }
        if let Some(category) = patch.category {
            post.category_id = Some(category);
        }

        let stored = self.store_upload(patch.upload.as_ref()).await?;
        post.featured_image = resolve_featured_image(
            stored.clone(),
            patch.image_url.as_deref(),
            post.featured_image.take(),
        );
        post.updated_at = Utc::now();

        let mut attempts = 0;
        let saved = loop {
            match self.posts.update(post.clone()).await {
                Ok(saved) => break saved,
                Err(RepoError::Constraint(msg)) if attempts < SLUG_CONFLICT_RETRIES => {
                    attempts += 1;
                    tracing::warn!(conflict = %msg, attempts, "slug conflict on update, re-deriving");
                    post.slug = self.derive_slug(&post.title).await?;
                }
                Err(RepoError::NotFound) => {
                    self.discard_blob(stored.as_deref()).await;
                    return Err(DomainError::NotFound { entity_type: "Post", id });
                }
                Err(err) => {
                    self.discard_blob(stored.as_deref()).await;
                    return Err(err.into());
                }
            }
        };

        self.fetch_joined(saved.id).await
    }

    /// Delete a post, cleaning up its locally stored image on a best-effort
    /// basis. Cleanup failure is logged, never surfaced.
    pub async fn delete(&self, id: Uuid) -> Result<Uuid, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound { entity_type: "Post", id })?;

        match self.posts.delete(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => {
                return Err(DomainError::NotFound { entity_type: "Post", id });
            }
            Err(err) => return Err(err.into()),
        }

        if let Some(reference) = &post.featured_image {
            if self.blobs.is_local(reference) {
                if let Err(err) = self.blobs.remove(reference).await {
                    tracing::warn!(%reference, error = %err, "failed to remove image of deleted post");
                }
            }
        }

        Ok(post.id)
    }

    /// List posts newest-first with offset pagination.
    pub async fn list(&self, mut filter: PostFilter) -> Result<PostPage, DomainError> {
        if filter.page == 0 {
            filter.page = 1;
        }
        if filter.limit == 0 {
            filter.limit = DEFAULT_PAGE_LIMIT;
        }

        let (items, total) = self.posts.list(&filter).await?;
        Ok(PostPage {
            items,
            total,
            page: filter.page,
            limit: filter.limit,
            pages: total.div_ceil(filter.limit),
        })
    }

    /// Single post joined with its category.
    pub async fn get(&self, id: Uuid) -> Result<PostWithCategory, DomainError> {
        self.fetch_joined(id).await
    }

    async fn derive_slug(&self, title: &str) -> Result<String, DomainError> {
        let slug = derive_unique_slug(title, |candidate| {
            let repo = Arc::clone(&self.posts);
            async move { repo.slug_exists(&candidate).await }
        })
        .await?;
        Ok(slug)
    }

    /// Insert with the slug-uniqueness conflict retry: the pre-check can race
    /// with a concurrent insert, so the unique index is the authority and a
    /// conflict triggers re-derivation.
    async fn insert_with_unique_slug(
        &self,
        title: &str,
        build: impl Fn(String) -> Post,
    ) -> Result<Post, DomainError> {
        let mut attempts = 0;
        loop {
            let slug = self.derive_slug(title).await?;
            match self.posts.insert(build(slug)).await {
                Ok(saved) => return Ok(saved),
                Err(RepoError::Constraint(msg)) if attempts < SLUG_CONFLICT_RETRIES => {
                    attempts += 1;
                    tracing::warn!(conflict = %msg, attempts, "slug conflict on insert, re-deriving");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn store_upload(&self, upload: Option<&Upload>) -> Result<Option<String>, DomainError> {
        match upload {
            Some(upload) => {
                let reference = self
                    .blobs
                    .store(&upload.filename, &upload.bytes)
                    .await
                    .map_err(|err| DomainError::Storage(err.to_string()))?;
                Ok(Some(reference))
            }
            None => Ok(None),
        }
    }

    async fn discard_blob(&self, reference: Option<&str>) {
        if let Some(reference) = reference {
            if let Err(err) = self.blobs.remove(reference).await {
                tracing::warn!(%reference, error = %err, "failed to discard blob after write failure");
            }
        }
    }

    async fn fetch_joined(&self, id: Uuid) -> Result<PostWithCategory, DomainError> {
        self.posts
            .find_with_category(id)
            .await?
            .ok_or(DomainError::NotFound { entity_type: "Post", id })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::Category;
    use crate::service::testing::{MemBlobs, MemCategories, MemPosts};

    struct Fixture {
        service: PostService,
        posts: Arc<MemPosts>,
        blobs: Arc<MemBlobs>,
        categories: Arc<MemCategories>,
    }

    fn fixture() -> Fixture {
        let categories = Arc::new(MemCategories::default());
        let posts = Arc::new(MemPosts::new(Arc::clone(&categories)));
        let blobs = Arc::new(MemBlobs::default());
        let service = PostService::new(
            Arc::clone(&posts) as Arc<dyn PostRepository>,
            Arc::clone(&blobs) as Arc<dyn BlobStore>,
        );
        Fixture { service, posts, blobs, categories }
    }

    fn new_post(title: &str, content: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
            ..NewPost::default()
        }
    }

    #[tokio::test]
    async fn create_derives_slug_and_defaults_author() {
        let fx = fixture();

        let (post, _) = fx.service.create(new_post("My First Post", "Hello")).await.unwrap();

        assert_eq!(post.slug, "my-first-post");
        assert_eq!(post.author, "Anonymous");
    }

    #[tokio::test]
    async fn create_rejects_blank_title_or_content() {
        let fx = fixture();

        let err = fx.service.create(new_post("   ", "Hello")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = fx.service.create(new_post("Title", " ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn colliding_titles_get_suffixed_slugs() {
        let fx = fixture();

        fx.service.create(new_post("Hello World", "a")).await.unwrap();
        let (second, _) = fx.service.create(new_post("Hello, World!", "b")).await.unwrap();
        let (third, _) = fx.service.create(new_post("Hello World", "c")).await.unwrap();

        assert_eq!(second.slug, "hello-world-1");
        assert_eq!(third.slug, "hello-world-2");
    }

    #[tokio::test]
    async fn uploaded_file_wins_over_explicit_url() {
        let fx = fixture();

        let mut input = new_post("Pic", "body");
        input.upload = Some(Upload { filename: "cat.png".to_string(), bytes: vec![1, 2, 3] });
        input.image_url = Some("https://cdn.example.com/other.png".to_string());

        let (post, _) = fx.service.create(input).await.unwrap();
        assert_eq!(post.featured_image.as_deref(), Some("/uploads/cat.png"));
    }

    #[tokio::test]
    async fn slug_conflict_on_insert_is_retried() {
        let fx = fixture();
        fx.posts
            .write_failures
            .lock()
            .unwrap()
            .push(RepoError::Constraint("posts_slug_key".to_string()));

        let (post, _) = fx.service.create(new_post("Raced Title", "body")).await.unwrap();
        assert_eq!(post.slug, "raced-title");
    }

    #[tokio::test]
    async fn stored_blob_is_discarded_when_insert_fails() {
        let fx = fixture();
        fx.posts
            .write_failures
            .lock()
            .unwrap()
            .push(RepoError::Query("connection reset".to_string()));

        let mut input = new_post("Doomed", "body");
        input.upload = Some(Upload { filename: "orphan.png".to_string(), bytes: vec![0] });

        let err = fx.service.create(input).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        assert_eq!(
            fx.blobs.removed.lock().unwrap().as_slice(),
            ["/uploads/orphan.png"]
        );
    }

    #[tokio::test]
    async fn update_without_title_preserves_slug_and_image() {
        let fx = fixture();
        let mut input = new_post("Stable", "v1");
        input.upload = Some(Upload { filename: "x.png".to_string(), bytes: vec![0] });
        let (post, _) = fx.service.create(input).await.unwrap();

        let patch = PostPatch { content: Some("v2".to_string()), ..PostPatch::default() };
        let (updated, _) = fx.service.update(post.id, patch).await.unwrap();

        assert_eq!(updated.slug, "stable");
        assert_eq!(updated.content, "v2");
        assert_eq!(updated.featured_image.as_deref(), Some("/uploads/x.png"));
    }

    #[tokio::test]
    async fn update_with_equal_title_preserves_slug() {
        let fx = fixture();
        let (post, _) = fx.service.create(new_post("Same Title", "body")).await.unwrap();
        // Occupy the suffix the regeneration would pick, to catch it happening.
        fx.service.create(new_post("Same Title!", "other")).await.unwrap();

        let patch = PostPatch { title: Some("Same Title".to_string()), ..PostPatch::default() };
        let (updated, _) = fx.service.update(post.id, patch).await.unwrap();

        assert_eq!(updated.slug, "same-title");
    }

    #[tokio::test]
    async fn update_with_new_title_regenerates_slug() {
        let fx = fixture();
        let (post, _) = fx.service.create(new_post("My First Post", "Hello")).await.unwrap();

        let patch = PostPatch { title: Some("My Updated Post".to_string()), ..PostPatch::default() };
        let (updated, _) = fx.service.update(post.id, patch).await.unwrap();

        assert_eq!(updated.slug, "my-updated-post");
        assert_eq!(updated.title, "My Updated Post");
    }

    #[tokio::test]
    async fn update_missing_post_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .update(Uuid::new_v4(), PostPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn pagination_math_holds() {
        let fx = fixture();
        for i in 0..25 {
            fx.service.create(new_post(&format!("Post {i}"), "body")).await.unwrap();
        }

        let page = fx
            .service
            .list(PostFilter { page: 3, limit: 10, ..PostFilter::default() })
            .await
            .unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.pages, 3);
        assert_eq!(page.items.len(), 5);
    }

    #[tokio::test]
    async fn zero_page_and_limit_fall_back_to_defaults() {
        let fx = fixture();
        for i in 0..3 {
            fx.service.create(new_post(&format!("Post {i}"), "body")).await.unwrap();
        }

        let page = fx
            .service
            .list(PostFilter { page: 0, limit: 0, ..PostFilter::default() })
            .await
            .unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn search_matches_case_insensitively() {
        let fx = fixture();
        fx.service.create(new_post("Rust Basics", "systems")).await.unwrap();
        fx.service.create(new_post("Gardening", "soil")).await.unwrap();

        let page = fx
            .service
            .list(PostFilter { search: Some("rust".to_string()), ..PostFilter::default() })
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].0.title, "Rust Basics");
    }

    #[tokio::test]
    async fn delete_removes_local_image_only() {
        let fx = fixture();

        let mut with_upload = new_post("Local", "body");
        with_upload.upload = Some(Upload { filename: "l.png".to_string(), bytes: vec![0] });
        let (local, _) = fx.service.create(with_upload).await.unwrap();

        let mut with_url = new_post("Remote", "body");
        with_url.image_url = Some("https://cdn.example.com/r.png".to_string());
        let (remote, _) = fx.service.create(with_url).await.unwrap();

        fx.service.delete(local.id).await.unwrap();
        fx.service.delete(remote.id).await.unwrap();

        assert_eq!(fx.blobs.removed.lock().unwrap().as_slice(), ["/uploads/l.png"]);
    }

    #[tokio::test]
    async fn end_to_end_lifecycle() {
        let fx = fixture();
        let tech = Category::new("Tech".to_string());
        fx.categories.rows.lock().unwrap().push(tech.clone());

        let mut input = new_post("My First Post", "Hello");
        input.category = Some(tech.id);
        let (created, _) = fx.service.create(input).await.unwrap();

        let (fetched, category) = fx.service.get(created.id).await.unwrap();
        assert_eq!(fetched.slug, "my-first-post");
        assert_eq!(category.unwrap().name, "Tech");

        let patch = PostPatch { title: Some("My Updated Post".to_string()), ..PostPatch::default() };
        fx.service.update(created.id, patch).await.unwrap();
        let (fetched, _) = fx.service.get(created.id).await.unwrap();
        assert_eq!(fetched.slug, "my-updated-post");

        fx.service.delete(created.id).await.unwrap();
        let err = fx.service.get(created.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
