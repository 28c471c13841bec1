#[cfg(test)]
mod tests {
    use crate::database::entity::{category, post};
    use crate::database::postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};
    use quill_core::ports::{CategoryRepository, PostRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                title: "Test Post".to_owned(),
                content: "Content".to_owned(),
                slug: "test-post".to_owned(),
                author: "Anonymous".to_owned(),
                category_id: None,
                featured_image: None,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.slug, "test-post");
        assert_eq!(found.id, post_id);
    }

    #[tokio::test]
    async fn test_find_category_by_name() {
        let category_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: category_id,
                name: "Tech".to_owned(),
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let result = repo.find_by_name("Tech").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().id, category_id);
    }
}
