//! Session types

use crate::models::LoginOutcome;
use crate::types::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user's identity, issued at login and valid until logout
///
/// Everything downstream code needs to know about who is signed in lives
/// here: no separate lookups for role, name or ids that could drift out of
/// sync with each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Backend record id of the account
    pub user_id: String,
    pub role: UserRole,
    /// Name shown in greetings and `whoami`
    pub display_name: String,
    /// PCIC insurance id, present for farmers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcic_id: Option<String>,
    /// Account email, present for staff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a successful login answer
    pub fn from_login(outcome: &LoginOutcome) -> Self {
        Self {
            user_id: outcome.user_id.clone(),
            role: outcome.user_type,
            display_name: outcome.display_name(),
            pcic_id: outcome.user.pcicid.clone(),
            email: outcome.user.email.clone(),
            issued_at: Utc::now(),
        }
    }

    /// Check if the user is program staff (admin or super admin)
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Check if the user is a farmer
    pub fn is_farmer(&self) -> bool {
        self.role == UserRole::Farmer
    }
}
