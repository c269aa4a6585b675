use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderdesk_core::{AggregateId, AggregateRoot, DomainError, UserId};
use orderdesk_menu::{MenuItem, MenuItemId};

use crate::discount::DiscountPolicy;
use crate::error::CompositionError;
use crate::line::{ComboSlot, OrderItem, OrderItemId, subtotal};

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for OrderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(AggregateId::from_str(s)?))
    }
}

/// Order status.
///
/// Any recognised status may be set at any time; no transition graph is
/// enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!("unknown order status '{other}'"))),
        }
    }
}

/// Everything about an order except its lines, as stored by persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub id: OrderId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub discount_applied: Decimal,
    pub total: Decimal,
    pub version: u64,
}

/// Aggregate root: Order.
///
/// Owns its lines and enforces the composition rule on insertion: at most one
/// sandwich, one fries and one soft drink; other extras are unrestricted.
///
/// `subtotal`, `discount_applied` and `total` are plain stored values. Any
/// change to the lines leaves them stale until [`Order::recalculate_totals`] is
/// called; callers must recompute before reading or persisting totals
/// ([`Order::totals_are_current`] tells whether they did).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    created_at: DateTime<Utc>,
    status: OrderStatus,
    items: Vec<OrderItem>,
    subtotal: Decimal,
    discount_applied: Decimal,
    total: Decimal,
    totals_stale: bool,
    lines_loaded: bool,
    version: u64,
}

impl Order {
    /// A new, empty, pending order that has never been persisted.
    pub fn new(id: OrderId, user_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            created_at,
            status: OrderStatus::Pending,
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            discount_applied: Decimal::ZERO,
            total: Decimal::ZERO,
            totals_stale: false,
            lines_loaded: true,
            version: 0,
        }
    }

    /// Rebuild an order from its stored header.
    ///
    /// The result has no lines until [`Order::set_items`] (or
    /// [`Order::replace_items`]) attaches them, and must not be persisted
    /// before that.
    pub fn from_header(header: OrderHeader) -> Self {
        Self {
            id: header.id,
            user_id: header.user_id,
            created_at: header.created_at,
            status: header.status,
            items: Vec::new(),
            subtotal: header.subtotal,
            discount_applied: header.discount_applied,
            total: header.total,
            totals_stale: false,
            lines_loaded: false,
            version: header.version,
        }
    }

    pub fn header(&self) -> OrderHeader {
        OrderHeader {
            id: self.id,
            user_id: self.user_id,
            created_at: self.created_at,
            status: self.status,
            subtotal: self.subtotal,
            discount_applied: self.discount_applied,
            total: self.total,
            version: self.version,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn discount_applied(&self) -> Decimal {
        self.discount_applied
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// `false` between a line mutation and the next recompute.
    pub fn totals_are_current(&self) -> bool {
        !self.totals_stale
    }

    /// `false` for an order rebuilt from its header alone: `items()` is empty
    /// while the stored totals still describe the real lines.
    pub fn lines_loaded(&self) -> bool {
        self.lines_loaded
    }

    /// Append a snapshot of `menu_item` as a new line (quantity 1).
    pub fn add_item(&mut self, menu_item: &MenuItem) -> Result<(), CompositionError> {
        check_can_add(&self.items, menu_item)?;
        self.items.push(OrderItem::snapshot(self.id, menu_item));
        self.totals_stale = true;
        Ok(())
    }

    /// Remove the line with the given id. Returns whether a line was removed.
    pub fn remove_item(&mut self, order_item_id: OrderItemId) -> bool {
        self.remove_first(|i| i.id_typed() == order_item_id)
    }

    /// Remove the first line that snapshots the given menu item.
    pub fn remove_item_by_menu_item_id(&mut self, menu_item_id: MenuItemId) -> bool {
        self.remove_first(|i| i.item_id() == menu_item_id)
    }

    /// Replace every line with snapshots of `menu_items`, in the given order.
    ///
    /// The composition rule is checked from scratch against the new sequence.
    /// On the first duplicate the whole replacement fails and the current
    /// lines are left untouched.
    pub fn replace_items<'a, I>(&mut self, menu_items: I) -> Result<(), CompositionError>
    where
        I: IntoIterator<Item = &'a MenuItem>,
    {
        let mut staged: Vec<OrderItem> = Vec::new();
        for menu_item in menu_items {
            check_can_add(&staged, menu_item)?;
            staged.push(OrderItem::snapshot(self.id, menu_item));
        }

        self.items = staged;
        self.totals_stale = true;
        self.lines_loaded = true;
        Ok(())
    }

    /// Recompute subtotal, discount and total from the current lines.
    pub fn recalculate_totals<P>(&mut self, policy: &P)
    where
        P: DiscountPolicy + ?Sized,
    {
        self.subtotal = subtotal(&self.items);
        self.discount_applied = policy.discount(&self.items);
        self.total = self.subtotal - self.discount_applied;
        self.totals_stale = false;
    }

    /// Attach lines read back from storage.
    ///
    /// Skips the composition check: only for lines that passed it when they
    /// were first stored. Never use this for new input.
    pub fn set_items(&mut self, items: Vec<OrderItem>) {
        self.items = items;
        self.lines_loaded = true;
    }

    fn remove_first<F>(&mut self, pred: F) -> bool
    where
        F: Fn(&OrderItem) -> bool,
    {
        match self.items.iter().position(pred) {
            Some(idx) => {
                self.items.remove(idx);
                self.totals_stale = true;
                true
            }
            None => false,
        }
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

fn check_can_add(current: &[OrderItem], menu_item: &MenuItem) -> Result<(), CompositionError> {
    let Some(slot) = ComboSlot::of(menu_item.category(), menu_item.subcategory()) else {
        return Ok(());
    };

    if current.iter().any(|i| i.combo_slot() == Some(slot)) {
        return Err(slot.duplicate_error());
    }
    Ok(())
}
