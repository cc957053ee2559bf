pub mod allocation;
pub mod cart;
pub mod error;
pub mod formatters;
pub mod images;
pub mod io;
pub mod marketplace;
pub mod models;
pub mod scoring;

// Re-export commonly used items
pub use allocation::{allocate_collection, AggregatedCard, AllocatedCopy};
pub use cart::Cart;
pub use error::{CollectionError, CollectionResult};
pub use formatters::{format_allocation_summary, format_marketplace_listing};
pub use images::{ImageCacheStore, ImageResolver};
pub use io::read_collection;
pub use marketplace::{filter_items, project_marketplace, sort_items, MarketplaceFilter, SortOrder};
pub use models::{CardRow, CartItem};
