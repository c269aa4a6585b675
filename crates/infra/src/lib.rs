//! Infrastructure layer: repositories, use-case services, read models, config.

pub mod config;
pub mod projections;
pub mod repository;
pub mod services;

#[cfg(test)]
mod integration_tests;

pub use config::{ConfigError, OrderDeskConfig};
pub use projections::{MenuItemView, OrderItemView, OrderView};
pub use repository::{
    InMemoryMenuCatalog, InMemoryOrderRepository, ItemLoading, MenuCatalog, OrderRepository,
    RepositoryError,
};
pub use services::{MenuService, OrderService, OrderUpdate, ServiceError};
