use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use orderdesk_core::{AggregateRoot, UserId};
use orderdesk_menu::{MenuCategory, MenuItemId};
use orderdesk_orders::{Order, OrderId, OrderItem, OrderItemId, OrderStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemView {
    pub id: OrderItemId,
    pub item_id: MenuItemId,
    pub item_name: String,
    pub unit_price: Decimal,
    pub category: MenuCategory,
    /// `null` for sandwiches and plain extras.
    pub subcategory: Option<&'static str>,
    pub quantity: u32,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id_typed(),
            item_id: item.item_id(),
            item_name: item.name().to_string(),
            unit_price: item.unit_price(),
            category: item.category(),
            subcategory: item.subcategory().label(),
            quantity: item.quantity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub discount_applied: Decimal,
    pub total: Decimal,
    pub version: u64,
    pub items: Vec<OrderItemView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id_typed(),
            user_id: order.user_id(),
            created_at: order.created_at(),
            status: order.status(),
            subtotal: order.subtotal(),
            discount_applied: order.discount_applied(),
            total: order.total(),
            version: order.version(),
            items: order.items().iter().map(OrderItemView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use orderdesk_core::AggregateId;
    use orderdesk_menu::{MenuItem, MenuLimits, MenuSubCategory, NewMenuItem};
    use orderdesk_orders::ComboDiscountPolicy;

    #[test]
    fn view_serializes_plain_subcategory_as_null() {
        let mut order = Order::new(OrderId::new(AggregateId::new()), UserId::new(), Utc::now());
        for (name, cents, category, sub) in [
            ("X Burger", 500, MenuCategory::Sandwich, MenuSubCategory::None),
            ("Soda", 250, MenuCategory::Extra, MenuSubCategory::SoftDrink),
        ] {
            let input = NewMenuItem::new(name, Decimal::new(cents, 2), category).with_subcategory(sub);
            let item = MenuItem::create(input, &MenuLimits::default(), Utc::now()).unwrap();
            order.add_item(&item).unwrap();
        }
        order.recalculate_totals(&ComboDiscountPolicy);

        let view = OrderView::from(&order);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total, view.subtotal - view.discount_applied);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "Pending");
        assert!(json["items"][0]["subcategory"].is_null());
        assert_eq!(json["items"][0]["item_name"], "X Burger");
        assert_eq!(json["items"][1]["subcategory"], "SoftDrink");
        assert_eq!(json["items"][1]["quantity"], 1);
    }
}
