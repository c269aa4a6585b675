use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use orderdesk_core::{ExpectedVersion, UserId};
use orderdesk_menu::{MenuCategory, MenuItem, MenuItemId};
use orderdesk_orders::{Order, OrderHeader, OrderId, OrderItem};

use super::r#trait::{ItemLoading, MenuCatalog, OrderRepository, RepositoryError};

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("lock poisoned".to_string())
}

/// In-memory menu catalog.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryMenuCatalog {
    items: RwLock<HashMap<MenuItemId, MenuItem>>,
}

impl InMemoryMenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog pre-populated with `items`.
    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = MenuItem>,
    {
        let map = items.into_iter().map(|i| (i.id_typed(), i)).collect();
        Self {
            items: RwLock::new(map),
        }
    }
}

#[async_trait::async_trait]
impl MenuCatalog for InMemoryMenuCatalog {
    async fn get_by_id(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(&id).cloned())
    }

    async fn get_by_ids(&self, ids: &[MenuItemId]) -> Result<Vec<MenuItem>, RepositoryError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        let mut seen = HashSet::new();

        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| items.get(id).cloned())
            .collect())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<MenuItem>, RepositoryError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        let mut out: Vec<MenuItem> = items
            .values()
            .filter(|i| include_inactive || i.is_active())
            .cloned()
            .collect();

        out.sort_by(|a, b| {
            a.category()
                .cmp(&b.category())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(out)
    }

    async fn list_by_category(&self, category: MenuCategory) -> Result<Vec<MenuItem>, RepositoryError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        let mut out: Vec<MenuItem> = items
            .values()
            .filter(|i| i.category() == category && i.is_active())
            .cloned()
            .collect();

        out.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(out)
    }

    async fn insert(&self, item: MenuItem) -> Result<MenuItem, RepositoryError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        if items.contains_key(&item.id_typed()) {
            return Err(RepositoryError::Conflict(format!(
                "menu item {} already exists",
                item.id_typed()
            )));
        }
        items.insert(item.id_typed(), item.clone());
        Ok(item)
    }

    async fn update(&self, item: MenuItem) -> Result<MenuItem, RepositoryError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        match items.get_mut(&item.id_typed()) {
            Some(slot) => {
                *slot = item.clone();
                Ok(item)
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Debug, Default)]
struct OrderTables {
    headers: HashMap<OrderId, OrderHeader>,
    lines: HashMap<OrderId, Vec<OrderItem>>,
}

impl OrderTables {
    fn materialize(&self, header: &OrderHeader, loading: ItemLoading) -> Order {
        let mut order = Order::from_header(header.clone());
        if loading == ItemLoading::WithItems {
            let lines = self.lines.get(&header.id).cloned().unwrap_or_default();
            order.set_items(lines);
        }
        order
    }

    fn newest_first<'a, I>(&self, headers: I) -> Vec<Order>
    where
        I: Iterator<Item = &'a OrderHeader>,
    {
        let mut selected: Vec<&OrderHeader> = headers.collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        selected
            .into_iter()
            .map(|h| self.materialize(h, ItemLoading::WithItems))
            .collect()
    }
}

/// In-memory order store.
///
/// Keeps headers and lines in separate tables, the way a relational backend
/// would, and rebuilds aggregates on every read. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    tables: RwLock<OrderTables>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.tables.read().unwrap().headers.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn load(&self, id: OrderId, loading: ItemLoading) -> Result<Option<Order>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.headers.get(&id).map(|h| tables.materialize(h, loading)))
    }

    async fn load_all_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.newest_first(tables.headers.values().filter(|h| h.user_id == user_id)))
    }

    async fn load_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.newest_first(tables.headers.values()))
    }

    async fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<Order, RepositoryError> {
        if !order.lines_loaded() {
            return Err(RepositoryError::LinesNotLoaded(order.id_typed()));
        }
        if !order.totals_are_current() {
            return Err(RepositoryError::StaleTotals(order.id_typed()));
        }

        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        let id = order.id_typed();
        let current = tables.headers.get(&id).map(|h| h.version).unwrap_or(0);

        expected
            .check(current)
            .map_err(|e| RepositoryError::Conflict(format!("order {id}: {e}")))?;

        let mut header = order.header();
        header.version = current + 1;

        tables.headers.insert(id, header.clone());
        tables.lines.insert(id, order.items().to_vec());

        Ok(tables.materialize(&header, ItemLoading::WithItems))
    }

    async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables.lines.remove(&id);
        Ok(tables.headers.remove(&id).is_some())
    }
}
