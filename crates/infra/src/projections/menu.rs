use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use orderdesk_menu::{MenuCategory, MenuItem, MenuItemId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemView {
    pub id: MenuItemId,
    pub name: String,
    pub base_price: Decimal,
    pub category: MenuCategory,
    pub subcategory: Option<&'static str>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&MenuItem> for MenuItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id_typed(),
            name: item.name().to_string(),
            base_price: item.base_price(),
            category: item.category(),
            subcategory: item.subcategory().label(),
            active: item.is_active(),
            created_at: item.created_at(),
        }
    }
}
