//! Persistence contracts for the menu catalog and orders, plus in-memory
//! implementations for tests/dev.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{InMemoryMenuCatalog, InMemoryOrderRepository};
pub use r#trait::{ItemLoading, MenuCatalog, OrderRepository, RepositoryError};
