//! Menu catalog domain module.
//!
//! This crate contains the business rules for menu items (sandwiches and
//! extras), implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod item;

pub use item::{
    MenuCategory, MenuItem, MenuItemChanges, MenuItemId, MenuLimits, MenuSubCategory, NewMenuItem,
    MAX_NAME_LEN,
};
