//! Blog service
//!
//! Post listings for the index and tag index pages, gallery image
//! management and taxonomy assignments.

use crate::db::repositories::{BlogRepository, PageRepository};
use crate::models::{BlogGalleryImage, Page, PageKind, Tag};
use anyhow::Result;
use std::sync::Arc;

pub struct BlogService {
    pages: Arc<dyn PageRepository>,
    blog: Arc<dyn BlogRepository>,
}

impl BlogService {
    pub fn new(pages: Arc<dyn PageRepository>, blog: Arc<dyn BlogRepository>) -> Self {
        Self { pages, blog }
    }

    /// Live posts under an index page, newest publication first
    pub async fn posts(&self, index_id: i64) -> Result<Vec<Page>> {
        self.pages.live_children_newest_first(index_id).await
    }

    /// Live posts for a tag index request. No tag means an empty
    /// result, not the full post list.
    pub async fn posts_by_tag(&self, tag: Option<&str>) -> Result<Vec<Page>> {
        match tag {
            Some(tag) => self.blog.pages_by_tag(tag).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn gallery_images(&self, page_id: i64) -> Result<Vec<BlogGalleryImage>> {
        self.blog.gallery_images(page_id).await
    }

    pub async fn add_gallery_image(
        &self,
        page_id: i64,
        image_id: i64,
        caption: &str,
    ) -> Result<BlogGalleryImage> {
        self.require_post(page_id).await?;
        self.blog.add_gallery_image(page_id, image_id, caption).await
    }

    pub async fn remove_gallery_image(&self, id: i64) -> Result<()> {
        self.blog.remove_gallery_image(id).await
    }

    /// The post's lead image: its first gallery image, if any
    pub async fn main_image(&self, page_id: i64) -> Result<Option<i64>> {
        let gallery = self.blog.gallery_images(page_id).await?;
        Ok(gallery.first().map(|item| item.image_id))
    }

    pub async fn set_tags(&self, page_id: i64, names: Vec<String>) -> Result<Vec<Tag>> {
        self.require_post(page_id).await?;
        self.blog.set_tags(page_id, &names).await?;
        self.blog.tags_for(page_id).await
    }

    pub async fn tags_for(&self, page_id: i64) -> Result<Vec<Tag>> {
        self.blog.tags_for(page_id).await
    }

    pub async fn set_categories(&self, page_id: i64, category_ids: Vec<i64>) -> Result<Vec<i64>> {
        self.require_post(page_id).await?;
        self.blog.set_categories(page_id, &category_ids).await?;
        self.blog.category_ids_for(page_id).await
    }

    pub async fn category_ids_for(&self, page_id: i64) -> Result<Vec<i64>> {
        self.blog.category_ids_for(page_id).await
    }

    async fn require_post(&self, page_id: i64) -> Result<Page> {
        let page = self
            .pages
            .get_by_id(page_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Page not found"))?;
        if page.kind != PageKind::Blog {
            anyhow::bail!("Page {} is not a blog post", page_id);
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxBlogRepository, SqlxPageRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::PageDetails;
    use chrono::Utc;

    struct Fixture {
        pool: crate::db::DynDatabasePool,
        pages: Arc<dyn PageRepository>,
        service: BlogService,
        index: Page,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let pages = SqlxPageRepository::boxed(pool.clone());
        let blog = SqlxBlogRepository::boxed(pool.clone());
        let service = BlogService::new(pages.clone(), blog);

        let mut index = Page::new(PageKind::BlogIndex, "Blog".to_string(), "blog".to_string());
        index.path = "/blog/".to_string();
        let index = pages
            .create(&index, &PageDetails::default_for(PageKind::BlogIndex))
            .await
            .expect("Failed to create index");

        Fixture {
            pool,
            pages,
            service,
            index,
        }
    }

    async fn create_post(fixture: &Fixture, slug: &str, days_ago: i64) -> Page {
        let mut page = Page::new(PageKind::Blog, slug.to_string(), slug.to_string());
        page.parent_id = Some(fixture.index.id);
        page.path = fixture.index.child_path(slug);
        let page = fixture
            .pages
            .create(&page, &PageDetails::default_for(PageKind::Blog))
            .await
            .expect("Failed to create post");
        fixture
            .pages
            .publish(page.id, Utc::now() - chrono::Duration::days(days_ago))
            .await
            .expect("Failed to publish");
        page
    }

    #[tokio::test]
    async fn test_posts_ordered_newest_first() {
        let fixture = setup().await;
        create_post(&fixture, "old", 10).await;
        create_post(&fixture, "new", 1).await;
        create_post(&fixture, "middle", 5).await;

        let posts = fixture.service.posts(fixture.index.id).await.unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "middle", "old"]);
    }

    #[tokio::test]
    async fn test_posts_by_tag_without_tag_is_empty() {
        let fixture = setup().await;
        let post = create_post(&fixture, "tagged", 1).await;
        fixture
            .service
            .set_tags(post.id, vec!["news".to_string()])
            .await
            .unwrap();

        assert!(fixture.service.posts_by_tag(None).await.unwrap().is_empty());
        let by_tag = fixture.service.posts_by_tag(Some("news")).await.unwrap();
        assert_eq!(by_tag.len(), 1);
    }

    #[tokio::test]
    async fn test_gallery_rejected_on_non_posts() {
        let fixture = setup().await;
        let result = fixture
            .service
            .add_gallery_image(fixture.index.id, 1, "")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_main_image_is_first_gallery_item() {
        use crate::db::repositories::{ImageRepository, SqlxImageRepository};
        use crate::models::CreateImageInput;

        let fixture = setup().await;
        let post = create_post(&fixture, "with-gallery", 1).await;
        assert!(fixture.service.main_image(post.id).await.unwrap().is_none());

        let images = SqlxImageRepository::new(fixture.pool.clone());
        let mut ids = Vec::new();
        for title in ["cover", "detail"] {
            let image = images
                .create(&CreateImageInput {
                    title: title.to_string(),
                    file_path: format!("images/{}.jpg", title),
                    width: 0,
                    height: 0,
                })
                .await
                .unwrap();
            fixture
                .service
                .add_gallery_image(post.id, image.id, title)
                .await
                .unwrap();
            ids.push(image.id);
        }

        let main = fixture.service.main_image(post.id).await.unwrap();
        assert_eq!(main, Some(ids[0]));
    }
}
