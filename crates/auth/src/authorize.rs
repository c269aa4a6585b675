use thiserror::Error;

use orderdesk_core::UserId;

use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: admin role required")]
    AdminRequired,
}

/// Ownership-or-admin gate for user-owned resources.
///
/// Callers must report `false` exactly like a missing resource.
///
/// - No IO
/// - No panics
pub fn can_access(principal: &Principal, owner: UserId) -> bool {
    principal.is_admin() || principal.user_id == owner
}

/// Gate for catalog management and other admin-only operations.
pub fn require_admin(principal: &Principal) -> Result<(), AuthzError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired)
    }
}
