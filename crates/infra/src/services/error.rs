use thiserror::Error;

use orderdesk_auth::AuthzError;
use orderdesk_core::DomainError;
use orderdesk_menu::MenuItemId;
use orderdesk_orders::CompositionError;

use crate::repository::RepositoryError;

/// Everything a use case can reject a request with.
///
/// Missing orders are not errors: services return `Ok(None)` / `Ok(false)`
/// both for absent orders and for orders the caller may not see.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("at least one menu item must be selected")]
    EmptySelection,

    #[error("unknown menu items: {}", join(.0))]
    UnknownItems(Vec<MenuItemId>),

    #[error("menu items not available: {}", .0.join(", "))]
    UnavailableItems(Vec<String>),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("forbidden")]
    Forbidden,

    #[error("concurrency conflict: {0}")]
    Conflict(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

fn join(ids: &[MenuItemId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                ServiceError::Validation(msg)
            }
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(_: AuthzError) -> Self {
        ServiceError::Forbidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_enumerate_offending_items() {
        let a = MenuItemId::generate();
        let b = MenuItemId::generate();
        let msg = ServiceError::UnknownItems(vec![a, b]).to_string();
        assert!(msg.contains(&a.to_string()));
        assert!(msg.contains(&b.to_string()));

        let msg = ServiceError::UnavailableItems(vec!["X Egg".into(), "Soda".into()]).to_string();
        assert_eq!(msg, "menu items not available: X Egg, Soda");
    }

    #[test]
    fn repository_conflicts_surface_as_conflicts() {
        let err: ServiceError = RepositoryError::Conflict("v1 != v2".into()).into();
        assert_eq!(err, ServiceError::Conflict("v1 != v2".into()));

        let err: ServiceError = RepositoryError::Storage("down".into()).into();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::Storage(_))));
    }

    #[test]
    fn composition_errors_keep_their_message() {
        let err: ServiceError = CompositionError::DuplicateFries.into();
        assert_eq!(err.to_string(), CompositionError::DuplicateFries.to_string());
    }
}
