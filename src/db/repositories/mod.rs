//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity group.

pub mod blog;
pub mod image;
pub mod page;
pub mod snippet;

pub use blog::{BlogRepository, SqlxBlogRepository};
pub use image::{ImageRepository, SqlxImageRepository};
pub use page::{PageRepository, SqlxPageRepository};
pub use snippet::{SnippetRepository, SqlxSnippetRepository};
