use std::sync::Arc;

use thiserror::Error;

use orderdesk_core::{ExpectedVersion, UserId};
use orderdesk_menu::{MenuCategory, MenuItem, MenuItemId};
use orderdesk_orders::{Order, OrderId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Optimistic concurrency failure (stored version differs from the expected one).
    #[error("concurrency conflict: {0}")]
    Conflict(String),

    /// The record to update does not exist.
    #[error("not found")]
    NotFound,

    /// The aggregate was handed over with totals that do not match its lines.
    #[error("order {0} has stale totals; recalculate before saving")]
    StaleTotals(OrderId),

    /// The aggregate was loaded without its lines, so saving it would drop them.
    #[error("order {0} was loaded without its lines; load it with items before saving")]
    LinesNotLoaded(OrderId),

    /// Backend failure (connection, lock poisoning, serialization, ...).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Whether to read an order's lines along with its header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ItemLoading {
    WithItems,
    HeaderOnly,
}

/// Read/write access to the menu catalog.
///
/// Lookups return whatever exists; callers work out missing IDs by set
/// difference.
#[async_trait::async_trait]
pub trait MenuCatalog: Send + Sync {
    async fn get_by_id(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError>;

    /// Batch lookup. Unknown IDs are silently skipped.
    async fn get_by_ids(&self, ids: &[MenuItemId]) -> Result<Vec<MenuItem>, RepositoryError>;

    /// All items ordered by category, then name. Inactive items only on request.
    async fn list(&self, include_inactive: bool) -> Result<Vec<MenuItem>, RepositoryError>;

    /// Active items of one category, ordered by name.
    async fn list_by_category(&self, category: MenuCategory) -> Result<Vec<MenuItem>, RepositoryError>;

    async fn insert(&self, item: MenuItem) -> Result<MenuItem, RepositoryError>;

    /// Overwrite an existing item. `RepositoryError::NotFound` if it does not exist.
    async fn update(&self, item: MenuItem) -> Result<MenuItem, RepositoryError>;
}

/// Persistence for the `Order` aggregate.
///
/// Lists are returned newest first.
#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync {
    async fn load(&self, id: OrderId, loading: ItemLoading) -> Result<Option<Order>, RepositoryError>;

    async fn load_all_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    async fn load_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Insert or overwrite the order, checking the stored version first.
    ///
    /// A never-saved order is at version 0, so `ExpectedVersion::Exact(0)`
    /// means "insert". Returns the order as stored, with its new version.
    async fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<Order, RepositoryError>;

    /// Remove the order and its lines. Returns whether anything was removed.
    async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError>;
}

#[async_trait::async_trait]
impl<S> MenuCatalog for Arc<S>
where
    S: MenuCatalog + ?Sized,
{
    async fn get_by_id(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        (**self).get_by_id(id).await
    }

    async fn get_by_ids(&self, ids: &[MenuItemId]) -> Result<Vec<MenuItem>, RepositoryError> {
        (**self).get_by_ids(ids).await
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<MenuItem>, RepositoryError> {
        (**self).list(include_inactive).await
    }

    async fn list_by_category(&self, category: MenuCategory) -> Result<Vec<MenuItem>, RepositoryError> {
        (**self).list_by_category(category).await
    }

    async fn insert(&self, item: MenuItem) -> Result<MenuItem, RepositoryError> {
        (**self).insert(item).await
    }

    async fn update(&self, item: MenuItem) -> Result<MenuItem, RepositoryError> {
        (**self).update(item).await
    }
}

#[async_trait::async_trait]
impl<S> OrderRepository for Arc<S>
where
    S: OrderRepository + ?Sized,
{
    async fn load(&self, id: OrderId, loading: ItemLoading) -> Result<Option<Order>, RepositoryError> {
        (**self).load(id, loading).await
    }

    async fn load_all_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        (**self).load_all_for_user(user_id).await
    }

    async fn load_all(&self) -> Result<Vec<Order>, RepositoryError> {
        (**self).load_all().await
    }

    async fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<Order, RepositoryError> {
        (**self).save(order, expected).await
    }

    async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        (**self).delete(id).await
    }
}
