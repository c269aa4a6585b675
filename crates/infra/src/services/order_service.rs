//! Order use cases.
//!
//! Item IDs arriving here are untrusted. The service resolves them against the
//! catalog, rejects unknown or inactive items, and only then lets the `Order`
//! aggregate apply its composition rule. Every read or write of an existing
//! order goes through a single ownership-or-admin lookup that answers `None`
//! for both "does not exist" and "not yours".

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use orderdesk_auth::{Principal, can_access};
use orderdesk_core::{AggregateId, AggregateRoot, ExpectedVersion, UserId};
use orderdesk_menu::{MenuItem, MenuItemId};
use orderdesk_orders::{ComboDiscountPolicy, DiscountPolicy, Order, OrderId, OrderStatus};

use crate::projections::OrderView;
use crate::repository::{ItemLoading, MenuCatalog, OrderRepository};
use crate::services::ServiceError;

/// Requested changes to an existing order.
///
/// `item_ids`, when present and non-empty, replaces the whole item list.
/// An omitted or empty list leaves the items alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(default)]
    pub item_ids: Option<Vec<MenuItemId>>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl OrderUpdate {
    pub fn items(item_ids: Vec<MenuItemId>) -> Self {
        Self {
            item_ids: Some(item_ids),
            status: None,
        }
    }

    pub fn status(status: OrderStatus) -> Self {
        Self {
            item_ids: None,
            status: Some(status),
        }
    }
}

#[derive(Debug)]
pub struct OrderService<M, O, P = ComboDiscountPolicy> {
    catalog: M,
    orders: O,
    policy: P,
}

impl<M, O> OrderService<M, O>
where
    M: MenuCatalog,
    O: OrderRepository,
{
    pub fn new(catalog: M, orders: O) -> Self {
        Self::with_policy(catalog, orders, ComboDiscountPolicy)
    }
}

impl<M, O, P> OrderService<M, O, P>
where
    M: MenuCatalog,
    O: OrderRepository,
    P: DiscountPolicy,
{
    pub fn with_policy(catalog: M, orders: O, policy: P) -> Self {
        Self {
            catalog,
            orders,
            policy,
        }
    }

    /// Place a new order for `user_id`.
    ///
    /// Duplicates in `item_ids` are kept and applied in request order, so a
    /// second sandwich fails with the aggregate's own duplicate error.
    #[instrument(skip(self, item_ids), fields(items = item_ids.len()))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        item_ids: &[MenuItemId],
    ) -> Result<OrderView, ServiceError> {
        if item_ids.is_empty() {
            warn!("order rejected: no items selected");
            return Err(ServiceError::EmptySelection);
        }

        let menu_items = self.resolve(item_ids).await?;

        let mut order = Order::new(OrderId::new(AggregateId::new()), user_id, Utc::now());
        for menu_item in &menu_items {
            if let Err(e) = order.add_item(menu_item) {
                warn!(error = %e, "order rejected: composition conflict");
                return Err(e.into());
            }
        }
        order.recalculate_totals(&self.policy);

        let saved = self.save(&order, ExpectedVersion::Exact(0)).await?;
        info!(
            order_id = %saved.id_typed(),
            total = %saved.total(),
            discount = %saved.discount_applied(),
            "order created"
        );
        Ok(OrderView::from(&saved))
    }

    /// `None` when the order does not exist or belongs to someone else.
    #[instrument(skip(self))]
    pub async fn get_order(
        &self,
        principal: &Principal,
        order_id: OrderId,
    ) -> Result<Option<OrderView>, ServiceError> {
        let order = self
            .load_accessible(principal, order_id, ItemLoading::WithItems)
            .await?;
        Ok(order.as_ref().map(OrderView::from))
    }

    /// Every order for admins, the caller's own orders otherwise. Newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, principal: &Principal) -> Result<Vec<OrderView>, ServiceError> {
        let orders = if principal.is_admin() {
            self.orders.load_all().await?
        } else {
            self.orders.load_all_for_user(principal.user_id).await?
        };

        debug!(count = orders.len(), "orders listed");
        Ok(orders.iter().map(OrderView::from).collect())
    }

    /// Apply `update` to an order the caller may access.
    ///
    /// Returns `None` under the same conditions as [`Self::get_order`].
    #[instrument(skip(self))]
    pub async fn update_order(
        &self,
        principal: &Principal,
        order_id: OrderId,
        update: OrderUpdate,
    ) -> Result<Option<OrderView>, ServiceError> {
        let Some(mut order) = self
            .load_accessible(principal, order_id, ItemLoading::WithItems)
            .await?
        else {
            return Ok(None);
        };
        let loaded_version = order.version();

        if let Some(status) = update.status {
            order.set_status(status);
        }

        if let Some(item_ids) = update.item_ids.filter(|ids| !ids.is_empty()) {
            let menu_items = self.resolve(&item_ids).await?;
            if let Err(e) = order.replace_items(&menu_items) {
                warn!(error = %e, "order update rejected: composition conflict");
                return Err(e.into());
            }
            order.recalculate_totals(&self.policy);
        }

        let saved = self.save(&order, ExpectedVersion::Exact(loaded_version)).await?;
        info!(
            order_id = %saved.id_typed(),
            status = %saved.status(),
            version = saved.version(),
            "order updated"
        );
        Ok(Some(OrderView::from(&saved)))
    }

    /// `false` when nothing the caller may access was removed.
    #[instrument(skip(self))]
    pub async fn delete_order(
        &self,
        principal: &Principal,
        order_id: OrderId,
    ) -> Result<bool, ServiceError> {
        if self
            .load_accessible(principal, order_id, ItemLoading::HeaderOnly)
            .await?
            .is_none()
        {
            return Ok(false);
        }

        let deleted = self.orders.delete(order_id).await?;
        if deleted {
            info!(order_id = %order_id, "order deleted");
        }
        Ok(deleted)
    }

    async fn load_accessible(
        &self,
        principal: &Principal,
        order_id: OrderId,
        loading: ItemLoading,
    ) -> Result<Option<Order>, ServiceError> {
        let order = self.orders.load(order_id, loading).await?;

        Ok(order.filter(|o| {
            let allowed = can_access(principal, o.user_id());
            if !allowed {
                debug!(order_id = %order_id, "order hidden from caller");
            }
            allowed
        }))
    }

    /// Resolve `item_ids` against the catalog in one batch.
    ///
    /// The result lines up with `item_ids`, duplicates included.
    async fn resolve(&self, item_ids: &[MenuItemId]) -> Result<Vec<MenuItem>, ServiceError> {
        let mut seen = HashSet::new();
        let distinct: Vec<MenuItemId> = item_ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        let found: HashMap<MenuItemId, MenuItem> = self
            .catalog
            .get_by_ids(&distinct)
            .await?
            .into_iter()
            .map(|item| (item.id_typed(), item))
            .collect();
        debug!(requested = distinct.len(), found = found.len(), "menu items resolved");

        let missing: Vec<MenuItemId> = distinct
            .iter()
            .copied()
            .filter(|id| !found.contains_key(id))
            .collect();
        if !missing.is_empty() {
            warn!(missing = ?missing, "request names unknown menu items");
            return Err(ServiceError::UnknownItems(missing));
        }

        let unavailable: Vec<String> = distinct
            .iter()
            .filter_map(|id| found.get(id))
            .filter(|item| !item.is_active())
            .map(|item| item.name().to_string())
            .collect();
        if !unavailable.is_empty() {
            warn!(unavailable = ?unavailable, "request names inactive menu items");
            return Err(ServiceError::UnavailableItems(unavailable));
        }

        Ok(item_ids
            .iter()
            .filter_map(|id| found.get(id).cloned())
            .collect())
    }

    async fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<Order, ServiceError> {
        self.orders.save(order, expected).await.map_err(|e| {
            warn!(order_id = %order.id_typed(), error = %e, "order not saved");
            ServiceError::from(e)
        })
    }
}
