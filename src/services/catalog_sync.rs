//! Mirrors the product catalog from the external commerce backend.
//!
//! The upstream record carries only merchandising fields; rating, review
//! count, and tags are synthesized here so the scoring heuristics always see
//! fully populated products.

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{Product, ProductId, DEFAULT_CATEGORY};
use crate::store::CatalogStore;

/// Tags are matched against this fixed attribute vocabulary.
const TAG_KEYWORDS: [&str; 21] = [
    "wireless",
    "bluetooth",
    "smart",
    "premium",
    "portable",
    "waterproof",
    "leather",
    "cotton",
    "organic",
    "eco-friendly",
    "rechargeable",
    "lightweight",
    "durable",
    "comfortable",
    "stylish",
    "modern",
    "vintage",
    "classic",
    "professional",
    "gaming",
    "fitness",
];

/// At most this many tags per product.
const MAX_TAGS: usize = 5;

/// A product as served by the commerce backend.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamProduct {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Source of upstream catalog data, behind a trait so tests can substitute a
/// fixture without a network.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_products(&self) -> AppResult<Vec<UpstreamProduct>>;
}

/// Live provider talking to the commerce backend over HTTP.
#[derive(Clone)]
pub struct CommerceBackendProvider {
    http_client: HttpClient,
    base_url: String,
}

impl CommerceBackendProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }
}

#[async_trait]
impl CatalogProvider for CommerceBackendProvider {
    async fn fetch_products(&self) -> AppResult<Vec<UpstreamProduct>> {
        let url = format!("{}/api/products", self.base_url);
        let response = self.http_client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// Keyword tags found in the product's name and description, lowercased,
/// capped at [`MAX_TAGS`], vocabulary order preserved.
pub fn extract_tags(name: &str, description: &str) -> Vec<String> {
    let text = format!("{name} {description}").to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .take(MAX_TAGS)
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Star rating in `[3.5, 5.0]`, rounded to one decimal.
pub fn synthetic_rating(rng: &mut impl Rng) -> f64 {
    (rng.gen_range(3.5..=5.0_f64) * 10.0).round() / 10.0
}

/// Review count in `[10, 500]`.
pub fn synthetic_reviews(rng: &mut impl Rng) -> u32 {
    rng.gen_range(10..=500)
}

/// Converts an upstream record into a catalog product, filling the fields the
/// backend does not carry.
pub fn into_product(upstream: UpstreamProduct, rng: &mut impl Rng) -> Product {
    let tags = extract_tags(&upstream.name, &upstream.description);
    Product {
        id: upstream.id,
        name: upstream.name,
        price: upstream.price,
        image: upstream.image,
        description: upstream.description,
        category: upstream
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        rating: synthetic_rating(rng),
        reviews: synthetic_reviews(rng),
        tags,
    }
}

/// Fetches the upstream catalog and replaces the local mirror with it.
/// Returns the number of products mirrored.
pub async fn sync_catalog(
    provider: &dyn CatalogProvider,
    catalog: &mut CatalogStore,
    rng: &mut (impl Rng + Send),
) -> AppResult<usize> {
    let upstream = provider.fetch_products().await?;
    let products: Vec<Product> = upstream
        .into_iter()
        .map(|p| into_product(p, rng))
        .collect();
    let count = products.len();
    catalog.replace_all(products);
    tracing::info!(count, "Catalog synced from commerce backend");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn upstream(name: &str, description: &str) -> UpstreamProduct {
        UpstreamProduct {
            id: "1".to_string(),
            name: name.to_string(),
            price: 20.0,
            image: String::new(),
            description: description.to_string(),
            category: None,
        }
    }

    #[test]
    fn test_extract_tags_matches_case_insensitively() {
        let tags = extract_tags("Wireless Headphones", "Premium GAMING sound");
        assert_eq!(tags, vec!["wireless", "premium", "gaming"]);
    }

    #[test]
    fn test_extract_tags_caps_at_five() {
        let tags = extract_tags(
            "wireless bluetooth smart premium portable",
            "waterproof leather cotton",
        );
        assert_eq!(tags.len(), 5);
    }

    #[test]
    fn test_extract_tags_none_found() {
        assert!(extract_tags("Plain Chair", "Just a chair").is_empty());
    }

    #[test]
    fn test_synthetic_fields_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let rating = synthetic_rating(&mut rng);
            assert!((3.5..=5.0).contains(&rating), "rating {rating}");
            // one decimal place
            assert!((rating * 10.0 - (rating * 10.0).round()).abs() < 1e-9);
            let reviews = synthetic_reviews(&mut rng);
            assert!((10..=500).contains(&reviews), "reviews {reviews}");
        }
    }

    #[test]
    fn test_into_product_defaults_category() {
        let mut rng = StdRng::seed_from_u64(7);
        let product = into_product(upstream("Smart Lamp", "modern and stylish"), &mut rng);
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert_eq!(product.tags, vec!["smart", "stylish", "modern"]);
    }

    struct FixtureProvider(Vec<UpstreamProduct>);

    #[async_trait]
    impl CatalogProvider for FixtureProvider {
        async fn fetch_products(&self) -> AppResult<Vec<UpstreamProduct>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_sync_replaces_catalog() {
        let mut catalog = CatalogStore::new();
        let mut rng = StdRng::seed_from_u64(7);
        catalog.add(into_product(upstream("Old", ""), &mut rng));

        let provider = FixtureProvider(vec![
            UpstreamProduct {
                id: "10".to_string(),
                name: "New Thing".to_string(),
                price: 5.0,
                image: String::new(),
                description: String::new(),
                category: Some("Gadgets".to_string()),
            },
            UpstreamProduct {
                id: "11".to_string(),
                name: "Other Thing".to_string(),
                price: 6.0,
                image: String::new(),
                description: String::new(),
                category: None,
            },
        ]);

        let count = sync_catalog(&provider, &mut catalog, &mut rng).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("10").unwrap().category, "Gadgets");
        assert_eq!(catalog.get("11").unwrap().category, DEFAULT_CATEGORY);
    }
}
