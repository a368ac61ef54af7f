//! Snippet service
//!
//! Footer text, people and blog categories, plus the person thumbnail
//! helper templates call per row.

use crate::db::repositories::{ImageRepository, SnippetRepository};
use crate::models::{
    BlogCategory, CreateCategoryInput, CreatePersonInput, FooterText, Person,
    UpdateCategoryInput, UpdatePersonInput,
};
use crate::render;
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

pub struct SnippetService {
    snippets: Arc<dyn SnippetRepository>,
    images: Arc<dyn ImageRepository>,
}

impl SnippetService {
    pub fn new(snippets: Arc<dyn SnippetRepository>, images: Arc<dyn ImageRepository>) -> Self {
        Self { snippets, images }
    }

    pub async fn footer_text(&self) -> Result<Option<FooterText>> {
        self.snippets.get_footer_text().await
    }

    pub async fn set_footer_text(&self, body: &str) -> Result<FooterText> {
        self.snippets.set_footer_text(body).await
    }

    pub async fn create_person(&self, input: CreatePersonInput) -> Result<Person> {
        let mut person = Person::new(input.first_name, input.last_name, input.job_title);
        person.image_id = input.image_id;
        self.snippets.create_person(&person).await
    }

    pub async fn get_person(&self, id: i64) -> Result<Option<Person>> {
        self.snippets.get_person(id).await
    }

    pub async fn list_people(&self) -> Result<Vec<Person>> {
        self.snippets.list_people().await
    }

    pub async fn update_person(&self, id: i64, input: UpdatePersonInput) -> Result<Person> {
        let mut person = self
            .snippets
            .get_person(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Person not found"))?;
        if let Some(first_name) = input.first_name {
            person.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            person.last_name = last_name;
        }
        if let Some(job_title) = input.job_title {
            person.job_title = job_title;
        }
        if let Some(image_id) = input.image_id {
            person.image_id = image_id;
        }
        self.snippets.update_person(&person).await?;
        Ok(person)
    }

    pub async fn delete_person(&self, id: i64) -> Result<()> {
        self.snippets.delete_person(id).await
    }

    /// Small avatar tag for admin listings. Any failure, a person
    /// without an image included, degrades to the empty string so one
    /// bad record never breaks the listing.
    pub async fn person_thumb(&self, person: &Person) -> String {
        let Some(image_id) = person.image_id else {
            return String::new();
        };
        match self.images.get_by_id(image_id).await {
            Ok(Some(image)) => render::rendition_img(&image, 50, 50),
            Ok(None) => String::new(),
            Err(err) => {
                warn!("Thumbnail lookup failed for person {}: {:#}", person.id, err);
                String::new()
            }
        }
    }

    pub async fn create_category(&self, input: CreateCategoryInput) -> Result<BlogCategory> {
        let mut category = BlogCategory::new(input.name);
        category.icon_image_id = input.icon_image_id;
        self.snippets.create_category(&category).await
    }

    pub async fn get_category(&self, id: i64) -> Result<Option<BlogCategory>> {
        self.snippets.get_category(id).await
    }

    pub async fn list_categories(&self) -> Result<Vec<BlogCategory>> {
        self.snippets.list_categories().await
    }

    pub async fn update_category(&self, id: i64, input: UpdateCategoryInput) -> Result<BlogCategory> {
        let mut category = self
            .snippets
            .get_category(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Category not found"))?;
        if let Some(name) = input.name {
            category.name = name;
        }
        if let Some(icon) = input.icon_image_id {
            category.icon_image_id = icon;
        }
        self.snippets.update_category(&category).await?;
        Ok(category)
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.snippets.delete_category(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxImageRepository, SqlxSnippetRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreateImageInput;

    async fn setup() -> (SnippetService, Arc<dyn ImageRepository>) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let images = SqlxImageRepository::boxed(pool.clone());
        let service = SnippetService::new(SqlxSnippetRepository::boxed(pool), images.clone());
        (service, images)
    }

    #[tokio::test]
    async fn test_person_thumb_without_image_is_empty() {
        let (service, _) = setup().await;
        let person = service
            .create_person(CreatePersonInput {
                first_name: "Ewa".to_string(),
                last_name: "Lis".to_string(),
                job_title: "Writer".to_string(),
                image_id: None,
            })
            .await
            .unwrap();
        assert_eq!(service.person_thumb(&person).await, "");
    }

    #[tokio::test]
    async fn test_person_thumb_with_missing_image_is_empty() {
        let (service, _) = setup().await;
        let mut person = Person::new(
            "Jan".to_string(),
            "Kos".to_string(),
            "Editor".to_string(),
        );
        person.image_id = Some(9999);
        assert_eq!(service.person_thumb(&person).await, "");
    }

    #[tokio::test]
    async fn test_person_thumb_renders_rendition_tag() {
        let (service, images) = setup().await;
        let image = images
            .create(&CreateImageInput {
                title: "Portrait".to_string(),
                file_path: "images/portrait.jpg".to_string(),
                width: 400,
                height: 400,
            })
            .await
            .unwrap();
        let person = service
            .create_person(CreatePersonInput {
                first_name: "Ala".to_string(),
                last_name: "Nowak".to_string(),
                job_title: "Editor".to_string(),
                image_id: Some(image.id),
            })
            .await
            .unwrap();

        let thumb = service.person_thumb(&person).await;
        assert!(thumb.contains("width=\"50\""));
        assert!(thumb.contains(&format!("/images/{}", image.id)));
    }

    #[tokio::test]
    async fn test_update_person_clears_image() {
        let (service, images) = setup().await;
        let image = images
            .create(&CreateImageInput {
                title: "Old".to_string(),
                file_path: "images/old.jpg".to_string(),
                width: 100,
                height: 100,
            })
            .await
            .unwrap();
        let person = service
            .create_person(CreatePersonInput {
                first_name: "Jan".to_string(),
                last_name: "Kos".to_string(),
                job_title: "Editor".to_string(),
                image_id: Some(image.id),
            })
            .await
            .unwrap();

        let updated = service
            .update_person(
                person.id,
                UpdatePersonInput {
                    first_name: None,
                    last_name: None,
                    job_title: None,
                    image_id: Some(None),
                },
            )
            .await
            .unwrap();
        assert!(updated.image_id.is_none());
    }
}
