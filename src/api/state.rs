use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;

use crate::services::catalog_sync::CatalogProvider;
use crate::store::{CatalogStore, InteractionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    /// Upstream catalog source, swappable in tests.
    pub provider: Arc<dyn CatalogProvider>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub catalog: CatalogStore,
    pub interactions: InteractionStore,
    /// Single RNG for synthetic product fields and the random recommendation
    /// fill; seedable so both are reproducible under test.
    pub rng: StdRng,
}

impl AppState {
    /// Creates empty state with an entropy-seeded RNG.
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self::with_rng(provider, StdRng::from_entropy())
    }

    /// Creates empty state with a fixed RNG seed, for deterministic tests.
    pub fn with_seed(provider: Arc<dyn CatalogProvider>, seed: u64) -> Self {
        Self::with_rng(provider, StdRng::seed_from_u64(seed))
    }

    fn with_rng(provider: Arc<dyn CatalogProvider>, rng: StdRng) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                catalog: CatalogStore::new(),
                interactions: InteractionStore::new(),
                rng,
            })),
            provider,
        }
    }
}
