//! Photo classification
//!
//! Turns an uploaded photo into the text of a shopping query. The only
//! implementation today is [`StubClassifier`], which ignores the image and
//! answers from a fixed table keyed by the category the user picked.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Photo category has to be either product, shopping-list or barcode.")]
    InvalidCategory(String),
}

/// What the user says the photo shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhotoCategory {
    Product,
    ShoppingList,
    Barcode,
}

impl PhotoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoCategory::Product => "product",
            PhotoCategory::ShoppingList => "shopping-list",
            PhotoCategory::Barcode => "barcode",
        }
    }
}

impl fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoCategory {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(PhotoCategory::Product),
            "shopping-list" => Ok(PhotoCategory::ShoppingList),
            "barcode" => Ok(PhotoCategory::Barcode),
            other => Err(ClassifyError::InvalidCategory(other.to_string())),
        }
    }
}

#[async_trait]
pub trait QueryClassifier: Send + Sync {
    /// Derive the shopping query for `image`, using the caller-supplied
    /// `category` to pick the detection path.
    async fn classify(&self, category: &str, image: &[u8]) -> Result<String, ClassifyError>;
}

/// Fixed category to query table standing in for real image detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubClassifier;

impl StubClassifier {
    pub fn query_for(category: PhotoCategory) -> &'static str {
        match category {
            PhotoCategory::Product => "Fountain pen",
            PhotoCategory::ShoppingList => "Fuzzy socks",
            PhotoCategory::Barcode => "Running shoes",
        }
    }
}

#[async_trait]
impl QueryClassifier for StubClassifier {
    async fn classify(&self, category: &str, image: &[u8]) -> Result<String, ClassifyError> {
        let category: PhotoCategory = category.parse()?;
        debug!(%category, image_size = image.len(), "Resolving stub shopping query");
        Ok(Self::query_for(category).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_categories() {
        let classifier = StubClassifier;
        let image = b"\x89PNG";

        assert_eq!(classifier.classify("product", image).await.unwrap(), "Fountain pen");
        assert_eq!(classifier.classify("shopping-list", image).await.unwrap(), "Fuzzy socks");
        assert_eq!(classifier.classify("barcode", image).await.unwrap(), "Running shoes");
    }

    #[tokio::test]
    async fn test_unknown_categories_rejected() {
        let classifier = StubClassifier;
        for category in ["", "unknown", "Product", "shopping_list", " barcode"] {
            assert_eq!(
                classifier.classify(category, b"").await,
                Err(ClassifyError::InvalidCategory(category.to_string())),
                "category {:?}",
                category
            );
        }
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in [
            PhotoCategory::Product,
            PhotoCategory::ShoppingList,
            PhotoCategory::Barcode,
        ] {
            assert_eq!(category.as_str().parse::<PhotoCategory>(), Ok(category));
        }
    }
}
