//! Orders domain module.
//!
//! The `Order` aggregate guards which menu items may coexist in one order and
//! keeps its derived totals (subtotal, discount, total) in step with a pluggable
//! [`DiscountPolicy`]. Pure domain logic: no IO, no HTTP, no storage.

pub mod discount;
pub mod error;
pub mod line;
pub mod order;

pub use discount::{ComboDiscountPolicy, ComboTier, DiscountPolicy, NoDiscount, round_currency};
pub use error::CompositionError;
pub use line::{ComboSlot, OrderItem, OrderItemId, subtotal};
pub use order::{Order, OrderHeader, OrderId, OrderStatus};
