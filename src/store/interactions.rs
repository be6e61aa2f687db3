use std::collections::{HashMap, HashSet};

use crate::models::ProductId;

/// Process-wide interaction counters: per-product view and purchase counts,
/// plus each user's most recently declared purchase history.
///
/// Counters are monotonically non-decreasing for the lifetime of the process;
/// nothing is persisted across restarts. A user's history is overwritten, not
/// merged, on every recommendation request — it reflects only the latest
/// submitted history.
#[derive(Debug, Default)]
pub struct InteractionStore {
    views: HashMap<ProductId, u64>,
    purchases: HashMap<ProductId, u64>,
    user_purchases: HashMap<String, HashSet<ProductId>>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self, id: &str) -> u64 {
        self.views.get(id).copied().unwrap_or(0)
    }

    pub fn purchases(&self, id: &str) -> u64 {
        self.purchases.get(id).copied().unwrap_or(0)
    }

    pub fn record_view(&mut self, id: ProductId) -> u64 {
        let count = self.views.entry(id).or_insert(0);
        *count += 1;
        *count
    }

    pub fn record_purchase(&mut self, id: ProductId) -> u64 {
        let count = self.purchases.entry(id).or_insert(0);
        *count += 1;
        *count
    }

    /// Overwrites the user's purchase history with the given id set.
    pub fn replace_user_history(&mut self, user_id: &str, ids: HashSet<ProductId>) {
        self.user_purchases.insert(user_id.to_string(), ids);
    }

    pub fn user_history(&self, user_id: &str) -> Option<&HashSet<ProductId>> {
        self.user_purchases.get(user_id)
    }

    pub fn user_count(&self) -> usize {
        self.user_purchases.len()
    }

    /// Top `n` most viewed product ids, count descending, id ascending on ties.
    pub fn top_viewed(&self, n: usize) -> Vec<(ProductId, u64)> {
        Self::top_n(&self.views, n)
    }

    /// Top `n` most purchased product ids, count descending, id ascending on ties.
    pub fn top_purchased(&self, n: usize) -> Vec<(ProductId, u64)> {
        Self::top_n(&self.purchases, n)
    }

    fn top_n(counts: &HashMap<ProductId, u64>, n: usize) -> Vec<(ProductId, u64)> {
        let mut entries: Vec<(ProductId, u64)> =
            counts.iter().map(|(id, c)| (id.clone(), *c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }
}
