//! Order lines: frozen copies of menu items taken when they were added.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderdesk_core::{AggregateId, Entity};
use orderdesk_menu::{MenuCategory, MenuItem, MenuItemId, MenuSubCategory};

use crate::error::CompositionError;
use crate::order::OrderId;

/// Order line identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItemId(pub AggregateId);

impl OrderItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// The kinds of items an order may hold at most once.
///
/// The same classification drives the combo discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboSlot {
    Sandwich,
    Fries,
    SoftDrink,
}

impl ComboSlot {
    pub fn of(category: MenuCategory, subcategory: MenuSubCategory) -> Option<Self> {
        match (category, subcategory) {
            (MenuCategory::Sandwich, _) => Some(ComboSlot::Sandwich),
            (MenuCategory::Extra, MenuSubCategory::Fries) => Some(ComboSlot::Fries),
            (MenuCategory::Extra, MenuSubCategory::SoftDrink) => Some(ComboSlot::SoftDrink),
            (MenuCategory::Extra, MenuSubCategory::None) => None,
        }
    }

    /// The error raised when a second item of this kind is added.
    pub fn duplicate_error(self) -> CompositionError {
        match self {
            ComboSlot::Sandwich => CompositionError::DuplicateSandwich,
            ComboSlot::Fries => CompositionError::DuplicateFries,
            ComboSlot::SoftDrink => CompositionError::DuplicateSoftDrink,
        }
    }
}

/// A line within an order.
///
/// Holds a snapshot of the menu item's name, price and classification at the
/// moment it was added; `item_id` is kept for traceability only and is never
/// dereferenced for pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    order_id: OrderId,
    item_id: MenuItemId,
    name_snapshot: String,
    unit_price_snapshot: Decimal,
    category_snapshot: MenuCategory,
    subcategory_snapshot: MenuSubCategory,
    quantity: u32,
}

impl OrderItem {
    pub(crate) fn snapshot(order_id: OrderId, menu_item: &MenuItem) -> Self {
        Self {
            id: OrderItemId::new(AggregateId::new()),
            order_id,
            item_id: menu_item.id_typed(),
            name_snapshot: menu_item.name().to_string(),
            unit_price_snapshot: menu_item.base_price(),
            category_snapshot: menu_item.category(),
            subcategory_snapshot: menu_item.subcategory(),
            quantity: 1,
        }
    }

    /// Rebuild a line that was read back from storage.
    ///
    /// Only for persistence adapters; the result is handed to [`crate::Order::set_items`].
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: OrderItemId,
        order_id: OrderId,
        item_id: MenuItemId,
        name_snapshot: String,
        unit_price_snapshot: Decimal,
        category_snapshot: MenuCategory,
        subcategory_snapshot: MenuSubCategory,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            order_id,
            item_id,
            name_snapshot,
            unit_price_snapshot,
            category_snapshot,
            subcategory_snapshot,
            quantity,
        }
    }

    pub fn id_typed(&self) -> OrderItemId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn item_id(&self) -> MenuItemId {
        self.item_id
    }

    pub fn name(&self) -> &str {
        &self.name_snapshot
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price_snapshot
    }

    pub fn category(&self) -> MenuCategory {
        self.category_snapshot
    }

    pub fn subcategory(&self) -> MenuSubCategory {
        self.subcategory_snapshot
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price_snapshot * Decimal::from(self.quantity)
    }

    pub fn combo_slot(&self) -> Option<ComboSlot> {
        ComboSlot::of(self.category_snapshot, self.subcategory_snapshot)
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Sum of `unit_price × quantity` over all lines.
pub fn subtotal(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}
