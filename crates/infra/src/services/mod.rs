//! Application services: the use cases callers invoke.
//!
//! Services compose repository traits and domain types; they contain no IO of
//! their own.

pub mod error;
pub mod menu_service;
pub mod order_service;

pub use error::ServiceError;
pub use menu_service::MenuService;
pub use order_service::{OrderService, OrderUpdate};
