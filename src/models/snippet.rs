//! Snippet entities
//!
//! Snippets are reusable records independent of the page tree, managed
//! through a generic admin surface and looked up by templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site footer text.
///
/// A single-row table; at most one record ever exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterText {
    /// Rich text HTML
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

/// A person record, attachable to content via future relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub image_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn new(first_name: String, last_name: String, job_title: String) -> Self {
        Self {
            id: 0,
            first_name,
            last_name,
            job_title,
            image_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a person
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePersonInput {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    #[serde(default)]
    pub image_id: Option<i64>,
}

/// Input for updating a person
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePersonInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    /// Outer None leaves the image untouched, inner None clears it
    pub image_id: Option<Option<i64>>,
}

/// Named blog category with an optional icon image.
///
/// Category names carry no uniqueness constraint; duplicates are
/// tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogCategory {
    pub id: i64,
    pub name: String,
    pub icon_image_id: Option<i64>,
}

impl BlogCategory {
    pub fn new(name: String) -> Self {
        Self {
            id: 0,
            name,
            icon_image_id: None,
        }
    }
}

/// Input for creating a blog category
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    #[serde(default)]
    pub icon_image_id: Option<i64>,
}

/// Input for updating a blog category
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub icon_image_id: Option<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_full_name() {
        let person = Person::new(
            "Anna".to_string(),
            "Kowalska".to_string(),
            "Director".to_string(),
        );
        assert_eq!(person.full_name(), "Anna Kowalska");
    }
}
