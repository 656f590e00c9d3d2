// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheManager, ResultCache};
pub use memory::InMemoryMatchStore;
pub use postgres::PostgresMatchStore;
pub use store::{MatchRepository, StoreError};
