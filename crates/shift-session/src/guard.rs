//! Route-gating decisions.
//!
//! A pure function of the session and the required role, so any guard
//! collaborator can derive the same decision without touching the
//! directory.

use crate::models::{SessionUser, UserRole};

/// What a route guard should do with a protected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the protected content
    Allow,
    /// No session: send the user to the login screen
    RedirectToLogin,
    /// Wrong role: send the user to their own role's home
    RedirectToRoleHome(UserRole),
}

/// Decide whether a session may access content gated on `required`.
pub fn authorize_role(session: Option<&SessionUser>, required: UserRole) -> RouteDecision {
    let Some(user) = session else {
        return RouteDecision::RedirectToLogin;
    };

    if user.role() != required {
        return RouteDecision::RedirectToRoleHome(user.role());
    }

    RouteDecision::Allow
}
