//! Menu catalog use cases. Reads are open; every mutation requires an admin.

use chrono::Utc;
use tracing::{info, instrument, warn};

use orderdesk_auth::{Principal, require_admin};
use orderdesk_menu::{MenuCategory, MenuItem, MenuItemChanges, MenuItemId, MenuLimits, NewMenuItem};

use crate::projections::MenuItemView;
use crate::repository::{MenuCatalog, RepositoryError};
use crate::services::ServiceError;

#[derive(Debug)]
pub struct MenuService<M> {
    catalog: M,
    limits: MenuLimits,
}

impl<M> MenuService<M>
where
    M: MenuCatalog,
{
    pub fn new(catalog: M, limits: MenuLimits) -> Self {
        Self { catalog, limits }
    }

    /// Sorted by category, then name.
    #[instrument(skip(self))]
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<MenuItemView>, ServiceError> {
        Ok(views(&self.catalog.list(include_inactive).await?))
    }

    /// Active items of one category, sorted by name.
    #[instrument(skip(self))]
    pub async fn list_by_category(
        &self,
        category: MenuCategory,
    ) -> Result<Vec<MenuItemView>, ServiceError> {
        Ok(views(&self.catalog.list_by_category(category).await?))
    }

    pub async fn sandwiches(&self) -> Result<Vec<MenuItemView>, ServiceError> {
        self.list_by_category(MenuCategory::Sandwich).await
    }

    pub async fn extras(&self) -> Result<Vec<MenuItemView>, ServiceError> {
        self.list_by_category(MenuCategory::Extra).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: MenuItemId) -> Result<Option<MenuItemView>, ServiceError> {
        let item = self.catalog.get_by_id(id).await?;
        Ok(item.as_ref().map(MenuItemView::from))
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        principal: &Principal,
        input: NewMenuItem,
    ) -> Result<MenuItemView, ServiceError> {
        self.authorize(principal)?;

        let item = MenuItem::create(input, &self.limits, Utc::now()).map_err(|e| {
            warn!(error = %e, "menu item rejected");
            ServiceError::from(e)
        })?;
        let stored = self.catalog.insert(item).await?;

        info!(item_id = %stored.id_typed(), name = stored.name(), "menu item created");
        Ok(MenuItemView::from(&stored))
    }

    /// `None` when the item does not exist.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        principal: &Principal,
        id: MenuItemId,
        changes: MenuItemChanges,
    ) -> Result<Option<MenuItemView>, ServiceError> {
        self.authorize(principal)?;

        let Some(mut item) = self.catalog.get_by_id(id).await? else {
            return Ok(None);
        };
        item.update(changes, &self.limits).map_err(|e| {
            warn!(item_id = %id, error = %e, "menu item update rejected");
            ServiceError::from(e)
        })?;

        match self.catalog.update(item).await {
            Ok(stored) => {
                info!(item_id = %id, "menu item updated");
                Ok(Some(MenuItemView::from(&stored)))
            }
            Err(RepositoryError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Soft delete. `false` when the item does not exist.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, principal: &Principal, id: MenuItemId) -> Result<bool, ServiceError> {
        self.authorize(principal)?;

        let Some(mut item) = self.catalog.get_by_id(id).await? else {
            return Ok(false);
        };
        item.deactivate();

        match self.catalog.update(item).await {
            Ok(_) => {
                info!(item_id = %id, "menu item deactivated");
                Ok(true)
            }
            Err(RepositoryError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn authorize(&self, principal: &Principal) -> Result<(), ServiceError> {
        require_admin(principal).map_err(|e| {
            warn!(user_id = %principal.user_id, "catalog change refused");
            ServiceError::from(e)
        })
    }
}

fn views(items: &[MenuItem]) -> Vec<MenuItemView> {
    items.iter().map(MenuItemView::from).collect()
}
