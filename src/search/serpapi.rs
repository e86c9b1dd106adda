//! SerpAPI Google Shopping client
//!
//! Sends the query to SerpAPI's `google_shopping` engine and maps each entry
//! of `shopping_results` onto a [`Product`]:
//!
//! | SerpAPI field             | Product field    |
//! |---------------------------|------------------|
//! | `title`                   | `title`          |
//! | `thumbnail`               | `imageLink`      |
//! | `price` + `source`        | `priceAndSeller` |
//! | `link` / `product_link`   | `link`           |
//! | `delivery`                | `shippingPrice`  |

use super::{Product, ShoppingError, ShoppingQuerier, ShoppingQueryInput};
use async_trait::async_trait;
use serde_json::Value;
use serpapi_search_rust::serp_api_search::SerpApiSearch;
use std::collections::HashMap;
use tracing::{debug, info, warn};

const ENGINE: &str = "google_shopping";

/// SerpAPI client for product search
pub struct SerpApiShoppingClient {
    api_key: String,
}

impl SerpApiShoppingClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// Configure client from config
    pub fn from_config(config: &crate::config::ShoppingConfig) -> Self {
        if config.serpapi_key.is_empty() {
            warn!("SERPAPI_KEY is not set, shopping queries will fail");
        }
        Self::new(config.serpapi_key.clone())
    }
}

#[async_trait]
impl ShoppingQuerier for SerpApiShoppingClient {
    async fn query(&self, input: &ShoppingQueryInput) -> Result<Vec<Product>, ShoppingError> {
        if self.api_key.is_empty() {
            return Err(ShoppingError::InvalidArgument(
                "SerpAPI key not configured".to_string(),
            ));
        }

        info!(query = %input.query(), "Searching Google Shopping via SerpAPI");

        let mut params = HashMap::<String, String>::new();
        params.insert("q".to_string(), input.query().to_string());
        params.insert("hl".to_string(), input.language().to_string());
        params.insert("num".to_string(), input.max_results().to_string());

        let search = SerpApiSearch::new(ENGINE.to_string(), params, self.api_key.clone());

        let raw = search
            .json()
            .await
            .map_err(|e| ShoppingError::Connection(e.to_string()))?;

        debug!("Raw shopping response received");

        let products = parse_shopping_results(&raw, input.max_results())?;
        info!(count = products.len(), "Google Shopping search completed");
        Ok(products)
    }
}

/// Convert a SerpAPI response body into at most `max_results` products.
pub fn parse_shopping_results(
    results: &Value,
    max_results: usize,
) -> Result<Vec<Product>, ShoppingError> {
    if let Some(error) = results.get("error").and_then(|v| v.as_str()) {
        // SerpAPI reports an empty results page as an error.
        if error.contains("hasn't returned any results") {
            return Ok(Vec::new());
        }
        return Err(ShoppingError::Connection(error.to_string()));
    }

    let shopping_results = match results.get("shopping_results") {
        Some(value) => value,
        None => return Ok(Vec::new()),
    };

    let results_array = shopping_results
        .as_array()
        .ok_or_else(|| ShoppingError::Io("Expected array of shopping results".to_string()))?;

    Ok(results_array
        .iter()
        .take(max_results)
        .map(parse_product)
        .collect())
}

fn parse_product(result: &Value) -> Product {
    let text = |key: &str| {
        result
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let title = text("title").unwrap_or_else(|| "Untitled".to_string());

    let price_and_seller = match (text("price"), text("source")) {
        (Some(price), Some(source)) => Some(format!("{} from {}", price, source)),
        (Some(price), None) => Some(price),
        (None, Some(source)) => Some(source),
        (None, None) => None,
    };

    Product {
        title,
        image_link: text("thumbnail"),
        price_and_seller,
        link: text("link").or_else(|| text("product_link")),
        shipping_price: text("delivery"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_maps_fields() {
        let body = json!({
            "shopping_results": [
                {
                    "title": "Lamy Safari Fountain Pen",
                    "thumbnail": "https://img.test/lamy.jpg",
                    "price": "$29.60",
                    "source": "Pen Shop",
                    "product_link": "https://shop.test/lamy",
                    "delivery": "Free delivery"
                },
                {
                    "price": "$3.00",
                    "link": "https://shop.test/generic"
                }
            ]
        });

        let products = parse_shopping_results(&body, 24).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(
            products[0],
            Product {
                title: "Lamy Safari Fountain Pen".to_string(),
                image_link: Some("https://img.test/lamy.jpg".to_string()),
                price_and_seller: Some("$29.60 from Pen Shop".to_string()),
                link: Some("https://shop.test/lamy".to_string()),
                shipping_price: Some("Free delivery".to_string()),
            }
        );
        assert_eq!(products[1].title, "Untitled");
        assert_eq!(products[1].price_and_seller.as_deref(), Some("$3.00"));
        assert_eq!(products[1].link.as_deref(), Some("https://shop.test/generic"));
    }

    #[test]
    fn test_parse_caps_results() {
        let entries: Vec<Value> = (0..10).map(|i| json!({ "title": format!("item {}", i) })).collect();
        let body = json!({ "shopping_results": entries });

        let products = parse_shopping_results(&body, 3).unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[2].title, "item 2");
    }

    #[test]
    fn test_parse_missing_results_is_empty() {
        assert!(parse_shopping_results(&json!({}), 24).unwrap().is_empty());
        assert!(parse_shopping_results(
            &json!({ "error": "Google hasn't returned any results for this query." }),
            24
        )
        .unwrap()
        .is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_shopping_results(&json!({ "error": "Invalid API key." }), 24),
            Err(ShoppingError::Connection(_))
        ));
        assert!(matches!(
            parse_shopping_results(&json!({ "shopping_results": "nope" }), 24),
            Err(ShoppingError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_is_invalid_argument() {
        let client = SerpApiShoppingClient::new(String::new());
        let input = ShoppingQueryInput::builder("Fuzzy socks").build().unwrap();
        assert!(matches!(
            client.query(&input).await,
            Err(ShoppingError::InvalidArgument(_))
        ));
    }
}
