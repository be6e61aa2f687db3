//! Recommendation scoring and blending.
//!
//! Four heuristic strategies (similarity, category affinity, price band,
//! popularity) plus a uniform random fill, orchestrated by [`recommend`].
//! Everything here is synchronous and in-memory; the only side effects are
//! the counter updates performed up front by the blender.

use std::collections::HashSet;

use rand::Rng;

use crate::models::{Product, ProductId, RecommendedProduct};
use crate::store::{CatalogStore, InteractionStore};

/// Weight of an exact category match in the similarity score.
const CATEGORY_WEIGHT: f64 = 0.4;
/// Weight of price proximity in the similarity score.
const PRICE_WEIGHT: f64 = 0.3;
/// Weight of tag overlap (Jaccard index) in the similarity score.
const TAG_WEIGHT: f64 = 0.3;
/// Price ratio below which proximity contributes nothing.
const PRICE_RATIO_FLOOR: f64 = 0.5;
/// Minimum similarity for a product to count as a candidate.
const SIMILARITY_THRESHOLD: f64 = 0.3;
/// Candidates consumed from each strategy during blending.
const PER_STRATEGY_CAP: usize = 2;
/// Maximum results from the price-band strategy.
const PRICE_BAND_LIMIT: usize = 3;
/// Relative distance from the mean purchase price still considered "in band".
const PRICE_BAND_TOLERANCE: f64 = 0.5;

/// Pairwise product similarity in `[0, 1]`.
///
/// Weighted sum of three independent signals: category match, price
/// proximity, and tag overlap. Symmetric. A zero price on either side simply
/// drops the price signal; it never errors.
pub fn similarity(a: &Product, b: &Product) -> f64 {
    let mut score = 0.0;

    if a.category == b.category {
        score += CATEGORY_WEIGHT;
    }

    let max_price = a.price.max(b.price);
    if max_price > 0.0 {
        let ratio = a.price.min(b.price) / max_price;
        if ratio > PRICE_RATIO_FLOOR {
            score += PRICE_WEIGHT * ratio;
        }
    }

    if !a.tags.is_empty() && !b.tags.is_empty() {
        let a_tags: HashSet<&str> = a.tags.iter().map(String::as_str).collect();
        let b_tags: HashSet<&str> = b.tags.iter().map(String::as_str).collect();
        let common = a_tags.intersection(&b_tags).count();
        let union = a_tags.union(&b_tags).count();
        if union > 0 {
            score += TAG_WEIGHT * common as f64 / union as f64;
        }
    }

    score
}

fn popularity_score(product: &Product, interactions: &InteractionStore) -> f64 {
    interactions.views(&product.id) as f64 * 0.3
        + interactions.purchases(&product.id) as f64 * 0.5
        + product.quality_score() * 0.2
}

/// The whole catalog, most popular first.
///
/// Popularity blends view count, purchase count, and rating weighted by
/// review volume. The sort is stable, so ties keep catalog insertion order
/// and repeated calls over unchanged state yield identical rankings.
pub fn popular_products<'a>(
    catalog: &'a CatalogStore,
    interactions: &InteractionStore,
) -> Vec<&'a Product> {
    let mut scored: Vec<(&Product, f64)> = catalog
        .all()
        .iter()
        .map(|p| (p, popularity_score(p, interactions)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(p, _)| p).collect()
}

/// Products similar to the user's purchases.
///
/// For each purchased product, every non-excluded catalog entry scoring above
/// the similarity threshold is a candidate; the top two per purchase are kept
/// and accumulated into one flat list. The blender caps consumption further.
pub fn similar_products<'a>(
    catalog: &'a CatalogStore,
    purchased: &[&Product],
    exclude: &HashSet<ProductId>,
) -> Vec<&'a Product> {
    let mut recommendations = Vec::new();

    for bought in purchased {
        let mut candidates: Vec<(&Product, f64)> = catalog
            .all()
            .iter()
            .filter(|p| !exclude.contains(&p.id))
            .map(|p| (p, similarity(bought, p)))
            .filter(|(_, score)| *score > SIMILARITY_THRESHOLD)
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        recommendations.extend(candidates.into_iter().take(PER_STRATEGY_CAP).map(|(p, _)| p));
    }

    recommendations
}

/// Top-rated products from the categories the user buys most.
///
/// Categories are ranked by frequency in the purchase history (equal counts
/// keep first-seen order); each contributes its two best products by
/// rating x reviews.
pub fn category_recommendations<'a>(
    catalog: &'a CatalogStore,
    purchased_categories: &[&str],
    exclude: &HashSet<ProductId>,
) -> Vec<&'a Product> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for category in purchased_categories {
        match counts.iter_mut().find(|(label, _)| label == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((*category, 1)),
        }
    }
    // Stable sort keeps first-encountered order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut recommendations = Vec::new();
    for (category, _) in counts {
        let mut in_category: Vec<&Product> = catalog
            .all()
            .iter()
            .filter(|p| p.category == category && !exclude.contains(&p.id))
            .collect();
        in_category.sort_by(|a, b| b.quality_score().total_cmp(&a.quality_score()));
        recommendations.extend(in_category.into_iter().take(PER_STRATEGY_CAP));
    }

    recommendations
}

/// Products priced within 50% of the user's mean purchase price, best rated
/// first, at most three.
///
/// Empty history or a zero mean price yields no candidates; the zero guard
/// keeps the relative-distance computation well defined.
pub fn price_band_recommendations<'a>(
    catalog: &'a CatalogStore,
    purchased: &[&Product],
    exclude: &HashSet<ProductId>,
) -> Vec<&'a Product> {
    if purchased.is_empty() {
        return Vec::new();
    }
    let avg_price = purchased.iter().map(|p| p.price).sum::<f64>() / purchased.len() as f64;
    if avg_price == 0.0 {
        return Vec::new();
    }

    let mut in_band: Vec<&Product> = catalog
        .all()
        .iter()
        .filter(|p| {
            !exclude.contains(&p.id)
                && (p.price - avg_price).abs() / avg_price <= PRICE_BAND_TOLERANCE
        })
        .collect();
    in_band.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    in_band.truncate(PRICE_BAND_LIMIT);
    in_band
}

/// Blends all strategies into an ordered, deduplicated, reason-annotated
/// recommendation list of at most `limit` products.
///
/// Side effects happen first: the user's purchase history is overwritten with
/// the ids declared in this request, and each declared id's purchase counter
/// is incremented. The increment fires on every recommendation call carrying
/// the id, not only on a confirmed purchase — longstanding behavior the rest
/// of the system expects.
///
/// Strategy order is fixed: similarity, category, price band (two picks
/// each), then popularity fill, then uniform random fill over whatever
/// remains. Purchased products never appear in the output, and no product
/// appears twice.
pub fn recommend(
    catalog: &CatalogStore,
    interactions: &mut InteractionStore,
    user_id: &str,
    history_ids: &[ProductId],
    limit: usize,
    rng: &mut impl Rng,
) -> Vec<RecommendedProduct> {
    let bought_ids: HashSet<ProductId> = history_ids.iter().cloned().collect();
    let purchased: Vec<&Product> = history_ids.iter().filter_map(|id| catalog.get(id)).collect();

    interactions.replace_user_history(user_id, bought_ids.clone());
    for id in &bought_ids {
        interactions.record_purchase(id.clone());
    }

    let mut picks: Vec<&Product> = Vec::new();
    let mut reasons: Vec<String> = Vec::new();

    if !purchased.is_empty() {
        tracing::debug!(
            user_id,
            purchases = purchased.len(),
            "Blending history-based strategies"
        );

        // The reason names the first purchase regardless of which purchase
        // actually drove the match; callers rely on the wording.
        let anchor_name = &purchased[0].name;
        for product in similar_products(catalog, &purchased, &bought_ids)
            .into_iter()
            .take(PER_STRATEGY_CAP)
        {
            if picks.iter().all(|p| p.id != product.id) {
                picks.push(product);
                reasons.push(format!("Similar to {anchor_name}"));
            }
        }

        let categories: Vec<&str> = purchased.iter().map(|p| p.category.as_str()).collect();
        for product in category_recommendations(catalog, &categories, &bought_ids)
            .into_iter()
            .take(PER_STRATEGY_CAP)
        {
            if picks.iter().all(|p| p.id != product.id) {
                reasons.push(format!("Popular in {}", product.category));
                picks.push(product);
            }
        }

        for product in price_band_recommendations(catalog, &purchased, &bought_ids)
            .into_iter()
            .take(PER_STRATEGY_CAP)
        {
            if picks.iter().all(|p| p.id != product.id) {
                picks.push(product);
                reasons.push("In your price range".to_string());
            }
        }
    }

    for product in popular_products(catalog, interactions) {
        if picks.len() >= limit {
            break;
        }
        if !bought_ids.contains(&product.id) && picks.iter().all(|p| p.id != product.id) {
            picks.push(product);
            reasons.push("Trending now".to_string());
        }
    }

    let mut remaining: Vec<&Product> = catalog
        .all()
        .iter()
        .filter(|p| !bought_ids.contains(&p.id) && picks.iter().all(|s| s.id != p.id))
        .collect();
    while picks.len() < limit && !remaining.is_empty() {
        let index = rng.gen_range(0..remaining.len());
        picks.push(remaining.remove(index));
        reasons.push("You might like this".to_string());
    }

    picks
        .into_iter()
        .zip(reasons)
        .take(limit)
        .map(|(product, recommendation_reason)| RecommendedProduct {
            product: product.clone(),
            recommendation_reason,
        })
        .collect()
}
