//! Shopping search
//!
//! The pipeline talks to the product-search provider through the
//! [`ShoppingQuerier`] trait. [`SerpApiShoppingClient`] is the production
//! implementation, backed by SerpAPI's Google Shopping engine.

pub mod serpapi;

pub use serpapi::SerpApiShoppingClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the shopping provider.
///
/// The HTTP layer answers all of them the same way; the variants exist for
/// logs and tests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShoppingError {
    #[error("Invalid shopping query: {0}")]
    InvalidArgument(String),

    #[error("Shopping service connection failed: {0}")]
    Connection(String),

    #[error("Failed to read shopping results: {0}")]
    Io(String),
}

/// One product from the shopping results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub title: String,
    pub image_link: Option<String>,
    pub price_and_seller: Option<String>,
    pub link: Option<String>,
    pub shipping_price: Option<String>,
}

/// A fully specified shopping query. Build it with [`ShoppingQueryInput::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingQueryInput {
    query: String,
    language: String,
    max_results: usize,
}

impl ShoppingQueryInput {
    pub fn builder(query: impl Into<String>) -> ShoppingQueryInputBuilder {
        ShoppingQueryInputBuilder {
            query: query.into(),
            language: "en".to_string(),
            max_results: 24,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

#[derive(Debug, Clone)]
pub struct ShoppingQueryInputBuilder {
    query: String,
    language: String,
    max_results: usize,
}

impl ShoppingQueryInputBuilder {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn build(self) -> Result<ShoppingQueryInput, ShoppingError> {
        if self.query.trim().is_empty() {
            return Err(ShoppingError::InvalidArgument(
                "query text must not be empty".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(ShoppingError::InvalidArgument(
                "max results must be at least 1".to_string(),
            ));
        }

        Ok(ShoppingQueryInput {
            query: self.query,
            language: self.language,
            max_results: self.max_results,
        })
    }
}

#[async_trait]
pub trait ShoppingQuerier: Send + Sync {
    async fn query(&self, input: &ShoppingQueryInput) -> Result<Vec<Product>, ShoppingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let input = ShoppingQueryInput::builder("Fountain pen")
            .language("de")
            .max_results(5)
            .build()
            .unwrap();

        assert_eq!(input.query(), "Fountain pen");
        assert_eq!(input.language(), "de");
        assert_eq!(input.max_results(), 5);
    }

    #[test]
    fn test_builder_rejects_empty_query() {
        assert!(matches!(
            ShoppingQueryInput::builder("  ").build(),
            Err(ShoppingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_builder_rejects_zero_results() {
        assert!(matches!(
            ShoppingQueryInput::builder("socks").max_results(0).build(),
            Err(ShoppingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_product_uses_camel_case_keys() {
        let product = Product {
            title: "Pen".to_string(),
            image_link: Some("https://img.test/pen.jpg".to_string()),
            price_and_seller: Some("$5.00 from Shop".to_string()),
            link: None,
            shipping_price: None,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["imageLink"], "https://img.test/pen.jpg");
        assert_eq!(json["priceAndSeller"], "$5.00 from Shop");
        assert!(json["shippingPrice"].is_null());
    }
}
