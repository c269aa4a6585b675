//! `orderdesk` application wiring.
//!
//! Builds the services on top of the in-memory stores, seeds a small menu and
//! drives a scripted walkthrough of the order use cases. Each step yields a
//! JSON document the binary prints.

use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;
use serde_json::{Value as JsonValue, json};

use orderdesk_auth::Principal;
use orderdesk_core::UserId;
use orderdesk_infra::{
    InMemoryMenuCatalog, InMemoryOrderRepository, MenuService, OrderDeskConfig, OrderService,
    OrderUpdate,
};
use orderdesk_menu::{MenuCategory, MenuItemId, MenuSubCategory, NewMenuItem};
use orderdesk_orders::OrderStatus;

pub type Catalog = Arc<InMemoryMenuCatalog>;
pub type Orders = Arc<InMemoryOrderRepository>;

pub struct App {
    pub menu: MenuService<Catalog>,
    pub orders: OrderService<Catalog, Orders>,
}

impl App {
    pub fn in_memory(config: &OrderDeskConfig) -> Self {
        let catalog: Catalog = Arc::new(InMemoryMenuCatalog::new());
        let orders: Orders = Arc::new(InMemoryOrderRepository::new());

        Self {
            menu: MenuService::new(catalog.clone(), config.menu),
            orders: OrderService::new(catalog, orders),
        }
    }
}

/// IDs of the seeded menu.
#[derive(Debug, Clone, Copy)]
pub struct SeededMenu {
    pub x_burger: MenuItemId,
    pub x_egg: MenuItemId,
    pub x_bacon: MenuItemId,
    pub fries: MenuItemId,
    pub soft_drink: MenuItemId,
}

pub async fn seed_menu(app: &App, admin: &Principal) -> anyhow::Result<SeededMenu> {
    use MenuCategory::{Extra, Sandwich};

    Ok(SeededMenu {
        x_burger: seed_item(app, admin, "X Burger", 500, Sandwich, MenuSubCategory::None).await?,
        x_egg: seed_item(app, admin, "X Egg", 450, Sandwich, MenuSubCategory::None).await?,
        x_bacon: seed_item(app, admin, "X Bacon", 700, Sandwich, MenuSubCategory::None).await?,
        fries: seed_item(app, admin, "Fries", 200, Extra, MenuSubCategory::Fries).await?,
        soft_drink: seed_item(app, admin, "Soft drink", 250, Extra, MenuSubCategory::SoftDrink).await?,
    })
}

async fn seed_item(
    app: &App,
    admin: &Principal,
    name: &str,
    cents: i64,
    category: MenuCategory,
    subcategory: MenuSubCategory,
) -> anyhow::Result<MenuItemId> {
    let input = NewMenuItem::new(name, Decimal::new(cents, 2), category).with_subcategory(subcategory);
    let view = app
        .menu
        .create(admin, input)
        .await
        .with_context(|| format!("seeding menu item '{name}'"))?;
    Ok(view.id)
}

/// One printed step of the walkthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: &'static str,
    pub body: JsonValue,
}

impl Step {
    fn new(title: &'static str, body: JsonValue) -> Self {
        Self { title, body }
    }

    pub fn to_json(&self) -> JsonValue {
        json!({ "step": self.title, "result": self.body })
    }
}

/// Scripted tour of the order use cases against a freshly seeded menu.
pub async fn walkthrough(app: &App) -> anyhow::Result<Vec<Step>> {
    let admin = Principal::admin(UserId::new());
    let customer = Principal::user(UserId::new());
    let stranger = Principal::user(UserId::new());
    let menu = seed_menu(app, &admin).await?;
    let mut steps = Vec::new();

    steps.push(Step::new("menu", serde_json::to_value(app.menu.list(false).await?)?));

    let combo = app
        .orders
        .create_order(customer.user_id, &[menu.x_burger, menu.fries, menu.soft_drink])
        .await?;
    steps.push(Step::new("create full combo", serde_json::to_value(&combo)?));

    let rejected = app
        .orders
        .create_order(customer.user_id, &[menu.x_egg, menu.x_bacon])
        .await;
    let rejection = match rejected {
        Ok(view) => serde_json::to_value(view)?,
        Err(e) => json!({ "error": e.to_string() }),
    };
    steps.push(Step::new("create with two sandwiches", rejection));

    let swapped = app
        .orders
        .update_order(&customer, combo.id, OrderUpdate::items(vec![menu.x_egg, menu.soft_drink]))
        .await?
        .context("customer lost access to their own order")?;
    steps.push(Step::new("replace items", serde_json::to_value(&swapped)?));

    let confirmed = app
        .orders
        .update_order(&admin, combo.id, OrderUpdate::status(OrderStatus::Confirmed))
        .await?;
    steps.push(Step::new("admin confirms", serde_json::to_value(&confirmed)?));

    let peek = app.orders.get_order(&stranger, combo.id).await?;
    steps.push(Step::new("stranger looks up order", serde_json::to_value(&peek)?));

    let listed = app.orders.list_orders(&customer).await?;
    steps.push(Step::new("customer lists orders", serde_json::to_value(&listed)?));

    let deleted = app.orders.delete_order(&customer, combo.id).await?;
    steps.push(Step::new("customer deletes order", json!({ "deleted": deleted })));

    Ok(steps)
}
