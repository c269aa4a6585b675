//! Integration tests for the order use cases.
//!
//! Tests: Service → MenuCatalog / OrderRepository → OrderView
//!
//! Verifies:
//! - Totals and combo discounts on created and updated orders
//! - Unknown, inactive and duplicate items are rejected and nothing is stored
//! - Other users' orders look exactly like missing ones
//! - Optimistic concurrency conflicts are detected

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use rust_decimal::Decimal;

    use orderdesk_auth::Principal;
    use orderdesk_core::{AggregateId, ExpectedVersion, UserId};
    use orderdesk_menu::{
        MenuCategory, MenuItem, MenuItemChanges, MenuItemId, MenuLimits, MenuSubCategory,
        NewMenuItem,
    };
    use orderdesk_orders::{CompositionError, Order, OrderId, OrderStatus};

    use crate::repository::{
        InMemoryMenuCatalog, InMemoryOrderRepository, ItemLoading, OrderRepository,
        RepositoryError,
    };
    use crate::services::{MenuService, OrderService, OrderUpdate, ServiceError};

    struct Menu {
        burger: MenuItemId,
        egg: MenuItemId,
        bacon: MenuItemId,
        fries: MenuItemId,
        soda: MenuItemId,
        cookie: MenuItemId,
    }

    type Service = OrderService<Arc<InMemoryMenuCatalog>, Arc<InMemoryOrderRepository>>;

    fn item(name: &str, cents: i64, category: MenuCategory, sub: MenuSubCategory) -> MenuItem {
        let input = NewMenuItem::new(name, Decimal::new(cents, 2), category).with_subcategory(sub);
        MenuItem::create(input, &MenuLimits::default(), Utc::now()).unwrap()
    }

    fn setup() -> (Service, Arc<InMemoryOrderRepository>, Menu) {
        let burger = item("X Burger", 800, MenuCategory::Sandwich, MenuSubCategory::None);
        let egg = item("X Egg", 700, MenuCategory::Sandwich, MenuSubCategory::None);
        let mut bacon = item("X Bacon", 900, MenuCategory::Sandwich, MenuSubCategory::None);
        bacon.deactivate();
        let fries = item("Fries", 300, MenuCategory::Extra, MenuSubCategory::Fries);
        let soda = item("Soda", 200, MenuCategory::Extra, MenuSubCategory::SoftDrink);
        let cookie = item("Cookie", 150, MenuCategory::Extra, MenuSubCategory::None);

        let menu = Menu {
            burger: burger.id_typed(),
            egg: egg.id_typed(),
            bacon: bacon.id_typed(),
            fries: fries.id_typed(),
            soda: soda.id_typed(),
            cookie: cookie.id_typed(),
        };

        let catalog = Arc::new(InMemoryMenuCatalog::with_items([
            burger, egg, bacon, fries, soda, cookie,
        ]));
        let orders = Arc::new(InMemoryOrderRepository::new());
        let service = OrderService::new(catalog, orders.clone());
        (service, orders, menu)
    }

    fn money(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[tokio::test]
    async fn full_combo_gets_twenty_percent() {
        let (service, _, menu) = setup();
        let user = UserId::new();

        let view = service
            .create_order(user, &[menu.burger, menu.fries, menu.soda])
            .await
            .unwrap();

        assert_eq!(view.subtotal, money(1300));
        assert_eq!(view.discount_applied, money(260));
        assert_eq!(view.total, money(1040));
        assert_eq!(view.status, OrderStatus::Pending);
        assert_eq!(view.user_id, user);
        assert_eq!(view.version, 1);
        let names: Vec<&str> = view.items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["X Burger", "Fries", "Soda"]);
    }

    #[tokio::test]
    async fn sandwich_and_drink_gets_fifteen_percent() {
        let (service, _, menu) = setup();

        let view = service
            .create_order(UserId::new(), &[menu.burger, menu.soda])
            .await
            .unwrap();

        assert_eq!(view.subtotal, money(1000));
        assert_eq!(view.discount_applied, money(150));
        assert_eq!(view.total, money(850));
    }

    #[tokio::test]
    async fn extras_alone_get_no_discount() {
        let (service, _, menu) = setup();

        let view = service
            .create_order(UserId::new(), &[menu.fries, menu.soda, menu.cookie, menu.cookie])
            .await
            .unwrap();

        assert_eq!(view.items.len(), 4);
        assert_eq!(view.subtotal, money(800));
        assert_eq!(view.discount_applied, Decimal::ZERO);
        assert_eq!(view.total, money(800));
    }

    #[tokio::test]
    async fn same_sandwich_twice_is_a_duplicate_sandwich() {
        let (service, orders, menu) = setup();

        let err = service
            .create_order(UserId::new(), &[menu.burger, menu.burger])
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Composition(CompositionError::DuplicateSandwich));
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn two_different_sandwiches_are_rejected() {
        let (service, orders, menu) = setup();

        let err = service
            .create_order(UserId::new(), &[menu.burger, menu.fries, menu.egg])
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Composition(CompositionError::DuplicateSandwich));
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn unknown_item_is_named_and_nothing_is_stored() {
        let (service, orders, menu) = setup();
        let ghost = MenuItemId::generate();

        let err = service
            .create_order(UserId::new(), &[menu.burger, ghost, ghost])
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::UnknownItems(vec![ghost]));
        assert!(err.to_string().contains(&ghost.to_string()));
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn inactive_item_is_named_and_nothing_is_stored() {
        let (service, orders, menu) = setup();

        let err = service
            .create_order(UserId::new(), &[menu.bacon, menu.soda])
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::UnavailableItems(vec!["X Bacon".to_string()]));
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn empty_selection_is_rejected() {
        let (service, orders, _) = setup();

        let err = service.create_order(UserId::new(), &[]).await.unwrap_err();

        assert_eq!(err, ServiceError::EmptySelection);
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn other_users_order_looks_missing() {
        let (service, _, menu) = setup();
        let owner = UserId::new();
        let created = service.create_order(owner, &[menu.burger]).await.unwrap();

        let stranger = Principal::user(UserId::new());
        let hidden = service.get_order(&stranger, created.id).await.unwrap();
        let missing = service
            .get_order(&stranger, OrderId::new(AggregateId::new()))
            .await
            .unwrap();
        assert_eq!(hidden, None);
        assert_eq!(hidden, missing);

        let mine = service.get_order(&Principal::user(owner), created.id).await.unwrap();
        assert_eq!(mine, Some(created.clone()));

        let admin = service
            .get_order(&Principal::admin(UserId::new()), created.id)
            .await
            .unwrap();
        assert_eq!(admin, Some(created));
    }

    #[tokio::test]
    async fn update_replaces_items_and_recomputes_totals() {
        let (service, _, menu) = setup();
        let owner = UserId::new();
        let created = service.create_order(owner, &[menu.burger]).await.unwrap();
        assert_eq!(created.discount_applied, Decimal::ZERO);

        let updated = service
            .update_order(
                &Principal::user(owner),
                created.id,
                OrderUpdate::items(vec![menu.egg, menu.fries, menu.cookie, menu.cookie]),
            )
            .await
            .unwrap()
            .unwrap();

        let names: Vec<&str> = updated.items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["X Egg", "Fries", "Cookie", "Cookie"]);
        // 7.00 + 3.00 + 1.50 + 1.50 = 13.00; sandwich + fries = 10%
        assert_eq!(updated.subtotal, money(1300));
        assert_eq!(updated.discount_applied, money(130));
        assert_eq!(updated.total, money(1170));
        assert_eq!(updated.version, 2);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn status_only_update_leaves_items_alone() {
        let (service, _, menu) = setup();
        let owner = UserId::new();
        let principal = Principal::user(owner);
        let created = service
            .create_order(owner, &[menu.burger, menu.soda])
            .await
            .unwrap();

        let confirmed = service
            .update_order(&principal, created.id, OrderUpdate::status(OrderStatus::Confirmed))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
        assert_eq!(confirmed.items, created.items);
        assert_eq!(confirmed.total, created.total);

        let update = OrderUpdate {
            item_ids: Some(Vec::new()),
            status: Some(OrderStatus::Preparing),
        };
        let preparing = service
            .update_order(&principal, created.id, update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(preparing.status, OrderStatus::Preparing);
        assert_eq!(preparing.items, created.items);
        assert_eq!(preparing.version, 3);
    }

    #[tokio::test]
    async fn rejected_update_leaves_stored_order_untouched() {
        let (service, _, menu) = setup();
        let owner = UserId::new();
        let principal = Principal::user(owner);
        let created = service
            .create_order(owner, &[menu.burger, menu.fries])
            .await
            .unwrap();

        let err = service
            .update_order(
                &principal,
                created.id,
                OrderUpdate {
                    item_ids: Some(vec![menu.soda, menu.soda]),
                    status: Some(OrderStatus::Cancelled),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Composition(CompositionError::DuplicateSoftDrink));

        let err = service
            .update_order(&principal, created.id, OrderUpdate::items(vec![menu.bacon]))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::UnavailableItems(vec!["X Bacon".to_string()]));

        let stored = service.get_order(&principal, created.id).await.unwrap();
        assert_eq!(stored, Some(created));
    }

    #[tokio::test]
    async fn stranger_cannot_update_or_delete() {
        let (service, orders, menu) = setup();
        let created = service.create_order(UserId::new(), &[menu.burger]).await.unwrap();
        let stranger = Principal::user(UserId::new());

        let updated = service
            .update_order(&stranger, created.id, OrderUpdate::status(OrderStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(updated, None);

        assert!(!service.delete_order(&stranger, created.id).await.unwrap());
        assert_eq!(orders.len(), 1);

        let stored = orders
            .load(created.id, ItemLoading::HeaderOnly)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn owner_and_admin_can_delete() {
        let (service, orders, menu) = setup();
        let owner = UserId::new();
        let first = service.create_order(owner, &[menu.burger]).await.unwrap();
        let second = service.create_order(owner, &[menu.soda]).await.unwrap();

        assert!(service.delete_order(&Principal::user(owner), first.id).await.unwrap());
        assert!(!service.delete_order(&Principal::user(owner), first.id).await.unwrap());
        assert!(
            service
                .delete_order(&Principal::admin(UserId::new()), second.id)
                .await
                .unwrap()
        );
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn listing_is_scoped_by_role() {
        let (service, _, menu) = setup();
        let alice = UserId::new();
        let bob = UserId::new();
        service.create_order(alice, &[menu.burger]).await.unwrap();
        service.create_order(alice, &[menu.soda]).await.unwrap();
        service.create_order(bob, &[menu.fries]).await.unwrap();

        let mine = service.list_orders(&Principal::user(alice)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.user_id == alice));

        let all = service.list_orders(&Principal::admin(UserId::new())).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    /// Serves a fixed snapshot on `load`, as if another caller saved in between.
    struct StaleReads {
        inner: Arc<InMemoryOrderRepository>,
        snapshot: Mutex<Option<Order>>,
    }

    #[async_trait::async_trait]
    impl OrderRepository for StaleReads {
        async fn load(
            &self,
            id: OrderId,
            loading: ItemLoading,
        ) -> Result<Option<Order>, RepositoryError> {
            let snapshot = self.snapshot.lock().unwrap().clone();
            match snapshot {
                Some(order) => Ok(Some(order)),
                None => self.inner.load(id, loading).await,
            }
        }

        async fn load_all_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
            self.inner.load_all_for_user(user_id).await
        }

        async fn load_all(&self) -> Result<Vec<Order>, RepositoryError> {
            self.inner.load_all().await
        }

        async fn save(
            &self,
            order: &Order,
            expected: ExpectedVersion,
        ) -> Result<Order, RepositoryError> {
            self.inner.save(order, expected).await
        }

        async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn concurrent_edit_is_a_conflict() {
        let (service, orders, menu) = setup();
        let owner = UserId::new();
        let created = service.create_order(owner, &[menu.burger]).await.unwrap();

        let snapshot = orders
            .load(created.id, ItemLoading::WithItems)
            .await
            .unwrap();
        let stale = StaleReads {
            inner: orders.clone(),
            snapshot: Mutex::new(snapshot),
        };
        let catalog = Arc::new(InMemoryMenuCatalog::new());
        let racing = OrderService::new(catalog, stale);

        // Someone else moves the order forward first.
        service
            .update_order(&Principal::user(owner), created.id, OrderUpdate::status(OrderStatus::Confirmed))
            .await
            .unwrap()
            .unwrap();

        let err = racing
            .update_order(&Principal::user(owner), created.id, OrderUpdate::status(OrderStatus::Cancelled))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let stored = service
            .get_order(&Principal::user(owner), created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn menu_changes_do_not_reprice_existing_orders() {
        let burger = item("X Burger", 800, MenuCategory::Sandwich, MenuSubCategory::None);
        let burger_id = burger.id_typed();
        let catalog = Arc::new(InMemoryMenuCatalog::with_items([burger]));
        let orders = Arc::new(InMemoryOrderRepository::new());
        let order_service = OrderService::new(catalog.clone(), orders);
        let menu_service = MenuService::new(catalog, MenuLimits::default());
        let owner = UserId::new();

        let created = order_service.create_order(owner, &[burger_id]).await.unwrap();

        let admin = Principal::admin(UserId::new());
        let changes = MenuItemChanges {
            name: "X Burger Deluxe".to_string(),
            base_price: money(1200),
            category: MenuCategory::Sandwich,
            subcategory: MenuSubCategory::None,
            active: true,
        };
        menu_service
            .update(&admin, burger_id, changes)
            .await
            .unwrap()
            .unwrap();

        let stored = order_service
            .get_order(&Principal::user(owner), created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.items[0].item_name, "X Burger");
        assert_eq!(stored.items[0].unit_price, money(800));
        assert_eq!(stored.total, money(800));

        assert!(menu_service.deactivate(&admin, burger_id).await.unwrap());
        let err = order_service.create_order(owner, &[burger_id]).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::UnavailableItems(vec!["X Burger Deluxe".to_string()])
        );
    }

    #[tokio::test]
    async fn menu_mutations_require_admin() {
        let catalog = Arc::new(InMemoryMenuCatalog::new());
        let menu_service = MenuService::new(catalog, MenuLimits::default());
        let user = Principal::user(UserId::new());
        let admin = Principal::admin(UserId::new());
        let input = NewMenuItem::new("Fries", money(300), MenuCategory::Extra)
            .with_subcategory(MenuSubCategory::Fries);

        let err = menu_service.create(&user, input.clone()).await.unwrap_err();
        assert_eq!(err, ServiceError::Forbidden);
        assert!(menu_service.list(true).await.unwrap().is_empty());

        let created = menu_service.create(&admin, input).await.unwrap();
        assert!(created.active);
        assert_eq!(created.subcategory, Some("Fries"));

        assert_eq!(
            menu_service.deactivate(&user, created.id).await.unwrap_err(),
            ServiceError::Forbidden
        );
        assert!(!menu_service.deactivate(&admin, MenuItemId::generate()).await.unwrap());

        assert_eq!(menu_service.extras().await.unwrap().len(), 1);
        assert!(menu_service.sandwiches().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn menu_validation_errors_surface_as_validation() {
        let catalog = Arc::new(InMemoryMenuCatalog::new());
        let menu_service = MenuService::new(catalog, MenuLimits::default());
        let admin = Principal::admin(UserId::new());

        let sandwich_with_fries = NewMenuItem::new("X Fries", money(800), MenuCategory::Sandwich)
            .with_subcategory(MenuSubCategory::Fries);
        let err = menu_service.create(&admin, sandwich_with_fries).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let free = NewMenuItem::new("Water", Decimal::ZERO, MenuCategory::Extra);
        let err = menu_service.create(&admin, free).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert!(menu_service.list(true).await.unwrap().is_empty());
    }
}
