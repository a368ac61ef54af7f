//! Data models
//!
//! This module contains all data structures used throughout the Serce CMS.
//! Models represent:
//! - The page tree core and per-type page detail records
//! - Snippet entities (footer text, people, blog categories)
//! - Image references
//! - API request/response inputs

mod blog;
mod details;
mod image;
mod page;
mod snippet;

pub use blog::{
    BlogGalleryImage, BlogIndexPageDetails, BlogPageDetails, CreateGalleryImageInput, Tag,
};
pub use details::{
    CentrumPageDetails, GalleryPageDetails, HomePageDetails, PageDetails, StandardPageDetails,
};
pub use image::{CreateImageInput, Image};
pub use page::{CreatePageInput, MovePageInput, Page, PageKind, UpdatePageInput};
pub use snippet::{
    BlogCategory, CreateCategoryInput, CreatePersonInput, FooterText, Person, UpdateCategoryInput,
    UpdatePersonInput,
};
