//! Authenticated session state and role-based route access.

mod context;
mod role;
mod routes;

pub use context::{Session, SessionContext, SessionError};
pub use role::Role;
pub use routes::{Access, AppRoute, RouteAccess, RouteDecision};
