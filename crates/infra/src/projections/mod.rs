//! Response projections (read models).
//!
//! Views are built from aggregates after they have been persisted, so they
//! always carry the stored version and recomputed totals.

pub mod menu;
pub mod orders;

pub use menu::MenuItemView;
pub use orders::{OrderItemView, OrderView};
