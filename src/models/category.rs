//! Category model and related types

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{validate_non_blank, validate_sort_order, sort_key_error};

/// Category document as stored in the `categories` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

/// Input representation for creating or replacing a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(
        custom(function = "validate_non_blank"),
        length(max = 50, message = "must be at most 50 characters")
    )]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Category representation returned to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: category.name,
            description: category.description,
            created_at: category.created_at.to_chrono(),
            updated_at: category.updated_at.to_chrono(),
        }
    }
}

/// Query parameters for listing categories
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct CategoryQuery {
    /// Case-insensitive substring match on the name
    pub name: Option<String>,
    pub offset: Option<u64>,
    /// Page size, 1..=100 (default 20)
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<i64>,
    /// One of: name, created_at (default: insertion order)
    #[validate(custom(function = "validate_category_sort_key"))]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default asc)
    #[validate(custom(function = "validate_sort_order"))]
    pub sort_order: Option<String>,
}

fn validate_category_sort_key(value: &str) -> Result<(), ValidationError> {
    match value {
        "name" | "created_at" => Ok(()),
        _ => Err(sort_key_error("name, created_at")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_input() {
        let input = CategoryInput {
            name: "Science Fiction".to_string(),
            description: Some("Futuristic concepts and technologies".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn rejects_blank_and_overlong_name() {
        let input = CategoryInput {
            name: String::new(),
            description: None,
        };
        assert!(input.validate().is_err());

        let input = CategoryInput {
            name: "x".repeat(51),
            description: None,
        };
        assert!(input.validate().is_err());
    }
}
