pub mod catalog_sync;
pub mod recommendations;
