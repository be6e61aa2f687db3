use serde::{Deserialize, Serialize};

/// Identifier for a product in the mirrored catalog.
///
/// The upstream commerce backend serves string ids (database object ids and
/// stringified numeric ids alike), so we keep them opaque.
pub type ProductId = String;

/// Fallback category label when the upstream record carries none.
pub const DEFAULT_CATEGORY: &str = "Others";

/// A product in the mirrored catalog.
///
/// `rating`, `reviews` and `tags` are not provided by the upstream backend;
/// they are filled in during catalog sync (see `services::catalog_sync`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price, non-negative.
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    /// Star rating in `[3.5, 5.0]` when synthetically assigned.
    pub rating: f64,
    pub reviews: u32,
    /// At most 5 tags, extraction order preserved.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Product {
    /// Rating weighted by review volume, used to rank products within a
    /// category and as a component of the popularity metric.
    pub fn quality_score(&self) -> f64 {
        self.rating * self.reviews as f64
    }
}

/// A product as returned by the recommendation endpoint: the catalog record
/// plus a short label naming the strategy that proposed it.
///
/// The catalog copy is never mutated; the reason exists only on this
/// response-side copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub recommendation_reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_score() {
        let product = Product {
            id: "1".to_string(),
            name: "Desk Lamp".to_string(),
            price: 25.0,
            image: String::new(),
            description: String::new(),
            category: "Home".to_string(),
            rating: 4.5,
            reviews: 100,
            tags: vec![],
        };
        assert_eq!(product.quality_score(), 450.0);
    }

    #[test]
    fn test_category_defaults_on_deserialize() {
        let json = r#"{"id":"7","name":"Mug","price":9.5,"rating":4.0,"reviews":12}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert!(product.tags.is_empty());
    }

    #[test]
    fn test_recommended_product_flattens() {
        let product = Product {
            id: "3".to_string(),
            name: "Mug".to_string(),
            price: 9.5,
            image: String::new(),
            description: String::new(),
            category: "Kitchen".to_string(),
            rating: 4.0,
            reviews: 12,
            tags: vec![],
        };
        let recommended = RecommendedProduct {
            product,
            recommendation_reason: "Trending now".to_string(),
        };
        let value = serde_json::to_value(&recommended).unwrap();
        assert_eq!(value["id"], "3");
        assert_eq!(value["recommendation_reason"], "Trending now");
    }
}
