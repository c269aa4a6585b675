//! `orderdesk-auth` — caller identity and access decisions.
//!
//! Token issuance and password handling live elsewhere; this crate only sees
//! an already-authenticated caller (user id + role) and answers whether that
//! caller may touch a given resource. No IO, no HTTP.

pub mod authorize;
pub mod principal;
pub mod roles;

pub use authorize::{can_access, require_admin, AuthzError};
pub use principal::Principal;
pub use roles::Role;
