//! Role-based route decisions
//!
//! Route access is a pure function of the requested path and the current
//! [`Session`]: no hidden lookups, so the same inputs always produce the
//! same decision and the rules can be tested without any I/O.
//!
//! Rules, checked in order:
//! 1. Without a session only the public paths are served; everything else
//!    redirects to `/login`.
//! 2. Signed-in users are bounced from `/welcome` and `/login` to their
//!    role's dashboard (the root `/` stays reachable).
//! 3. Farmers are barred from the staff area and land on the farmer
//!    dashboard.
//! 4. Staff are barred from the farmer area and land on the admin
//!    dashboard.

use crate::session::Session;
use crate::types::UserRole;

/// Paths reachable without signing in
const PUBLIC_PATHS: &[&str] = &["/", "/welcome", "/login"];

/// Staff-only screens, barred to farmers
const ADMIN_AREA: &[&str] = &[
    "/admin",
    "/dashboard",
    "/farmers",
    "/add-farmer",
    "/claims",
    "/visits",
    "/check",
];

/// Farmer-only screens, barred to staff
const FARMER_AREA: &[&str] = &["/farmer-dashboard", "/components/farmers"];

/// Outcome of a route check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the requested path
    Allow,
    /// Send the user elsewhere
    Redirect(&'static str),
}

impl RouteDecision {
    /// Check if the path may be served as requested
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The redirect target, if any
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Redirect(target) => Some(target),
            Self::Allow => None,
        }
    }
}

/// The role's home screen
pub fn dashboard_path(role: UserRole) -> &'static str {
    match role {
        UserRole::Farmer => "/farmer-dashboard",
        UserRole::Admin | UserRole::SuperAdmin => "/admin/dashboard",
    }
}

/// Decide whether `path` may be served under the given session
pub fn decide(path: &str, session: Option<&Session>) -> RouteDecision {
    let public = is_public(path);

    let Some(session) = session else {
        return if public {
            RouteDecision::Allow
        } else {
            RouteDecision::Redirect("/login")
        };
    };

    // Signed-in users skip the welcome and login screens
    if public && path != "/" {
        return RouteDecision::Redirect(dashboard_path(session.role));
    }

    if session.is_farmer() && in_area(path, ADMIN_AREA) {
        return RouteDecision::Redirect(dashboard_path(UserRole::Farmer));
    }

    if session.is_staff() && in_area(path, FARMER_AREA) {
        return RouteDecision::Redirect(dashboard_path(session.role));
    }

    RouteDecision::Allow
}

/// Prefix match with a `/` boundary: `/farmers` covers `/farmers/f1` but
/// not `/farmersville`
fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|p| matches_prefix(path, p))
}

fn in_area(path: &str, area: &[&str]) -> bool {
    area.iter().any(|p| matches_prefix(path, p))
}
