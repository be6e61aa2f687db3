mod product;

pub use product::{Product, ProductId, RecommendedProduct, DEFAULT_CATEGORY};
