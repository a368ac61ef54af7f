//! Image service

use crate::db::repositories::ImageRepository;
use crate::models::{CreateImageInput, Image};
use anyhow::Result;
use std::sync::Arc;

pub struct ImageService {
    repo: Arc<dyn ImageRepository>,
}

impl ImageService {
    pub fn new(repo: Arc<dyn ImageRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateImageInput) -> Result<Image> {
        if input.title.trim().is_empty() {
            anyhow::bail!("Image title must not be empty");
        }
        if input.file_path.trim().is_empty() {
            anyhow::bail!("Image file path must not be empty");
        }
        self.repo.create(&input).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Image>> {
        self.repo.get_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Image>> {
        self.repo.list().await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxImageRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> ImageService {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ImageService::new(SqlxImageRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_rejects_blank_title() {
        let service = setup().await;
        let result = service
            .create(CreateImageInput {
                title: "  ".to_string(),
                file_path: "images/x.jpg".to_string(),
                width: 0,
                height: 0,
            })
            .await;
        assert!(result.is_err());
    }
}
