use thiserror::Error;

/// An item could not be added because the order already holds one of its kind.
///
/// Each rule has its own variant so callers can tell them apart; the display
/// text is meant to be shown to the customer as-is.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CompositionError {
    #[error("an order can contain only one sandwich; remove the current sandwich before adding another")]
    DuplicateSandwich,

    #[error("an order can contain only one portion of fries; remove the current fries before adding more")]
    DuplicateFries,

    #[error("an order can contain only one soft drink; remove the current soft drink before adding another")]
    DuplicateSoftDrink,
}
