//! Services layer - Business logic
//!
//! This module contains the business logic on top of the repositories:
//! tree placement rules, slug validation, publication state, menu
//! construction and snippet lookups.

pub mod blog;
pub mod image;
pub mod navigation;
pub mod page;
pub mod snippet;

pub use blog::BlogService;
pub use image::ImageService;
pub use navigation::{MenuItem, NavigationService};
pub use page::PageService;
pub use snippet::SnippetService;
