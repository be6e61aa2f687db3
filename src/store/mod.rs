mod catalog;
mod interactions;

pub use catalog::CatalogStore;
pub use interactions::InteractionStore;
