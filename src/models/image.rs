//! Image reference model
//!
//! Image file storage and rendition generation live outside this
//! system; the CMS only tracks image records other models point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored image record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub width: i32,
    pub height: i32,
    pub created_at: DateTime<Utc>,
}

impl Image {
    pub fn new(title: String, file_path: String, width: i32, height: i32) -> Self {
        Self {
            id: 0,
            title,
            file_path,
            width,
            height,
            created_at: Utc::now(),
        }
    }
}

/// Input for registering an image
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImageInput {
    pub title: String,
    pub file_path: String,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}
