use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderdesk_core::{AggregateId, DomainError, DomainResult, Entity};

/// Maximum length of a menu item name (after trimming).
pub const MAX_NAME_LEN: usize = 100;

/// Menu item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub AggregateId);

impl MenuItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for MenuItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(AggregateId::from_str(s)?))
    }
}

/// Top-level menu category.
///
/// Declaration order is the catalog listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MenuCategory {
    Sandwich,
    Extra,
}

impl MenuCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Sandwich => "Sandwich",
            MenuCategory::Extra => "Extra",
        }
    }
}

impl core::fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandwich" => Ok(MenuCategory::Sandwich),
            "extra" => Ok(MenuCategory::Extra),
            other => Err(DomainError::validation(format!(
                "unknown menu category '{other}'"
            ))),
        }
    }
}

/// Subcategory of an extra. Only meaningful for [`MenuCategory::Extra`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum MenuSubCategory {
    #[default]
    None,
    Fries,
    SoftDrink,
}

impl MenuSubCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuSubCategory::None => "None",
            MenuSubCategory::Fries => "Fries",
            MenuSubCategory::SoftDrink => "SoftDrink",
        }
    }

    /// `None` for the placeholder subcategory, the display name otherwise.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            MenuSubCategory::None => None,
            other => Some(other.as_str()),
        }
    }
}

impl core::fmt::Display for MenuSubCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuSubCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "" | "none" => Ok(MenuSubCategory::None),
            "fries" => Ok(MenuSubCategory::Fries),
            "softdrink" => Ok(MenuSubCategory::SoftDrink),
            other => Err(DomainError::validation(format!(
                "unknown menu subcategory '{other}'"
            ))),
        }
    }
}

/// Catalog limits applied when creating or editing items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuLimits {
    /// Inclusive upper bound for `base_price`.
    pub max_price: Decimal,
}

impl Default for MenuLimits {
    fn default() -> Self {
        Self {
            max_price: Decimal::new(10_000, 0),
        }
    }
}

/// Input for creating a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub base_price: Decimal,
    pub category: MenuCategory,
    #[serde(default)]
    pub subcategory: MenuSubCategory,
}

impl NewMenuItem {
    pub fn new(name: impl Into<String>, base_price: Decimal, category: MenuCategory) -> Self {
        Self {
            name: name.into(),
            base_price,
            category,
            subcategory: MenuSubCategory::None,
        }
    }

    pub fn with_subcategory(mut self, subcategory: MenuSubCategory) -> Self {
        self.subcategory = subcategory;
        self
    }
}

/// Full replacement of the mutable fields of a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemChanges {
    pub name: String,
    pub base_price: Decimal,
    pub category: MenuCategory,
    #[serde(default)]
    pub subcategory: MenuSubCategory,
    pub active: bool,
}

/// A sandwich or extra offered by the restaurant.
///
/// Identity and creation time are fixed at construction; everything else can be
/// edited through [`MenuItem::update`]. Items are soft-deactivated, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    id: MenuItemId,
    name: String,
    base_price: Decimal,
    category: MenuCategory,
    subcategory: MenuSubCategory,
    active: bool,
    created_at: DateTime<Utc>,
}

impl MenuItem {
    /// Validate input and create a new, active menu item.
    pub fn create(
        input: NewMenuItem,
        limits: &MenuLimits,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::create_with_id(MenuItemId::generate(), input, limits, created_at)
    }

    pub fn create_with_id(
        id: MenuItemId,
        input: NewMenuItem,
        limits: &MenuLimits,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = validate_name(&input.name)?;
        validate_price(input.base_price, limits)?;
        validate_classification(input.category, input.subcategory)?;

        Ok(Self {
            id,
            name,
            base_price: input.base_price,
            category: input.category,
            subcategory: input.subcategory,
            active: true,
            created_at,
        })
    }

    /// Replace all mutable fields. Nothing changes if validation fails.
    pub fn update(&mut self, changes: MenuItemChanges, limits: &MenuLimits) -> DomainResult<()> {
        let name = validate_name(&changes.name)?;
        validate_price(changes.base_price, limits)?;
        validate_classification(changes.category, changes.subcategory)?;

        self.name = name;
        self.base_price = changes.base_price;
        self.category = changes.category;
        self.subcategory = changes.subcategory;
        self.active = changes.active;
        Ok(())
    }

    /// Soft delete: the item stays in the catalog but can no longer be ordered.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn id_typed(&self) -> MenuItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn category(&self) -> MenuCategory {
        self.category
    }

    pub fn subcategory(&self) -> MenuSubCategory {
        self.subcategory
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for MenuItem {
    type Id = MenuItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_price(price: Decimal, limits: &MenuLimits) -> DomainResult<()> {
    if price <= Decimal::ZERO {
        return Err(DomainError::validation("base_price must be positive"));
    }
    if price > limits.max_price {
        return Err(DomainError::validation(format!(
            "base_price cannot exceed {}",
            limits.max_price
        )));
    }
    Ok(())
}

fn validate_classification(category: MenuCategory, subcategory: MenuSubCategory) -> DomainResult<()> {
    if category == MenuCategory::Sandwich && subcategory != MenuSubCategory::None {
        return Err(DomainError::validation(
            "sandwiches cannot have a subcategory",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn sandwich(name: &str) -> NewMenuItem {
        NewMenuItem::new(name, price(800), MenuCategory::Sandwich)
    }

    #[test]
    fn create_trims_name_and_starts_active() {
        let item = MenuItem::create(sandwich("  X Burger "), &MenuLimits::default(), Utc::now())
            .unwrap();

        assert_eq!(item.name(), "X Burger");
        assert!(item.is_active());
        assert_eq!(item.base_price(), price(800));
        assert_eq!(item.subcategory(), MenuSubCategory::None);
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = MenuItem::create(sandwich("   "), &MenuLimits::default(), Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn create_rejects_overlong_name() {
        let long = "a".repeat(MAX_NAME_LEN + 1);
        let err = MenuItem::create(sandwich(&long), &MenuLimits::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("100")));
    }

    #[test]
    fn create_enforces_price_bounds() {
        let limits = MenuLimits {
            max_price: Decimal::new(50, 0),
        };

        let zero = NewMenuItem::new("Free", Decimal::ZERO, MenuCategory::Extra);
        assert!(MenuItem::create(zero, &limits, Utc::now()).is_err());

        let pricey = NewMenuItem::new("Gold", Decimal::new(5001, 2), MenuCategory::Extra);
        assert!(MenuItem::create(pricey, &limits, Utc::now()).is_err());

        let at_ceiling = NewMenuItem::new("Ceiling", Decimal::new(50, 0), MenuCategory::Extra);
        assert!(MenuItem::create(at_ceiling, &limits, Utc::now()).is_ok());
    }

    #[test]
    fn sandwich_cannot_carry_a_subcategory() {
        let input = sandwich("Odd").with_subcategory(MenuSubCategory::Fries);
        let err = MenuItem::create(input, &MenuLimits::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn update_is_all_or_nothing() {
        let limits = MenuLimits::default();
        let mut item = MenuItem::create(sandwich("X Bacon"), &limits, Utc::now()).unwrap();
        let before = item.clone();

        let bad = MenuItemChanges {
            name: "X Bacon Deluxe".to_string(),
            base_price: Decimal::ZERO,
            category: MenuCategory::Sandwich,
            subcategory: MenuSubCategory::None,
            active: true,
        };
        assert!(item.update(bad, &limits).is_err());
        assert_eq!(item, before);

        let good = MenuItemChanges {
            name: "X Bacon Deluxe".to_string(),
            base_price: price(950),
            category: MenuCategory::Sandwich,
            subcategory: MenuSubCategory::None,
            active: false,
        };
        item.update(good, &limits).unwrap();
        assert_eq!(item.name(), "X Bacon Deluxe");
        assert_eq!(item.base_price(), price(950));
        assert!(!item.is_active());
        assert_eq!(item.id_typed(), before.id_typed());
        assert_eq!(item.created_at(), before.created_at());
    }

    #[test]
    fn deactivate_keeps_the_item() {
        let mut item = MenuItem::create(sandwich("X Egg"), &MenuLimits::default(), Utc::now()).unwrap();
        item.deactivate();
        assert!(!item.is_active());
        assert_eq!(item.name(), "X Egg");
    }

    #[test]
    fn parses_categories_case_insensitively() {
        assert_eq!("SANDWICH".parse::<MenuCategory>().unwrap(), MenuCategory::Sandwich);
        assert_eq!("soft_drink".parse::<MenuSubCategory>().unwrap(), MenuSubCategory::SoftDrink);
        assert_eq!("SoftDrink".parse::<MenuSubCategory>().unwrap(), MenuSubCategory::SoftDrink);
        assert!("dessert".parse::<MenuCategory>().is_err());
        assert_eq!(MenuSubCategory::None.label(), None);
        assert_eq!(MenuSubCategory::Fries.label(), Some("Fries"));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any positive price up to the ceiling with a sane name is accepted.
            #[test]
            fn valid_input_is_accepted(
                name in "[A-Za-z][A-Za-z0-9 ]{0,98}",
                cents in 1i64..=1_000_000,
            ) {
                let input = NewMenuItem::new(name, Decimal::new(cents, 2), MenuCategory::Extra);
                let item = MenuItem::create(input, &MenuLimits::default(), Utc::now());
                prop_assert!(item.is_ok());
            }

            /// Property: non-positive prices are always rejected.
            #[test]
            fn non_positive_price_is_rejected(cents in -1_000_000i64..=0) {
                let input = NewMenuItem::new("Item", Decimal::new(cents, 2), MenuCategory::Extra);
                let result = MenuItem::create(input, &MenuLimits::default(), Utc::now());
                prop_assert!(matches!(result, Err(DomainError::Validation(_))));
            }
        }
    }
}
