//! Domain models for the insurance portal
//!
//! Typed equivalents of the records the portal backend serves: farmers,
//! program admins, inspection schedules, claim evidence photos and rice
//! diseases. Response bodies use snake_case field names; request payload
//! types live next to the API wrappers that send them.

use crate::types::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Farmer
// ============================================================================

/// A registered farmer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmer {
    /// Backend record id
    pub id: String,
    /// PCIC insurance id, the farmer-facing identifier
    pub pcicid: String,
    /// First name
    pub fname: String,
    /// Middle name
    #[serde(default)]
    pub mname: Option<String>,
    /// Last name
    pub lname: String,
    /// Contact number
    #[serde(default)]
    pub contact: Option<String>,
    /// Home address
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Farmer {
    /// Full display name, middle name included when present
    pub fn full_name(&self) -> String {
        match self.mname.as_deref().filter(|m| !m.is_empty()) {
            Some(mname) => format!("{} {} {}", self.fname, mname, self.lname),
            None => format!("{} {}", self.fname, self.lname),
        }
    }

    /// Case-insensitive search across name, PCIC id, contact and address
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if query.is_empty() {
            return true;
        }

        let mut fields = vec![self.fname.as_str(), self.lname.as_str(), self.pcicid.as_str()];
        if let Some(contact) = &self.contact {
            fields.push(contact);
        }
        if let Some(address) = &self.address {
            fields.push(address);
        }

        fields.iter().any(|f| f.to_lowercase().contains(&query))
    }
}

// ============================================================================
// Admin
// ============================================================================

/// A program staff account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Schedule
// ============================================================================

/// Lifecycle of a field inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScheduleStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl ScheduleStatus {
    /// Wire name as the backend sends it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field inspection appointment between an admin and a farmer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub farmer_id: String,
    pub admin_id: String,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded farmer record, present on joined responses
    #[serde(default, rename = "farmers")]
    pub farmer: Option<Farmer>,
}

/// Aggregate inspection counts for dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl ScheduleStats {
    /// Tally statuses over a schedule list
    pub fn from_schedules(schedules: &[Schedule]) -> Self {
        let mut stats = Self {
            total: schedules.len(),
            ..Self::default()
        };
        for schedule in schedules {
            match schedule.status {
                ScheduleStatus::Pending => stats.pending += 1,
                ScheduleStatus::InProgress => stats.in_progress += 1,
                ScheduleStatus::Done => stats.done += 1,
            }
        }
        stats
    }
}

// ============================================================================
// Evidence
// ============================================================================

/// A geotagged claim evidence photo submitted by a farmer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    #[serde(default)]
    pub farmer_id: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Reverse-geocoded capture location
    #[serde(default)]
    pub address: Option<String>,
    /// Inspection this photo is linked to, if any
    #[serde(default)]
    pub claim_schedule_id: Option<String>,
    pub captured_at: DateTime<Utc>,
    /// Embedded farmer record, present on joined responses
    #[serde(default)]
    pub farmer: Option<Farmer>,
    /// Embedded schedule record, present on joined responses
    #[serde(default, rename = "claim_schedules")]
    pub schedule: Option<Schedule>,
}

impl Evidence {
    /// Capture coordinates when both latitude and longitude are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Map link for the capture location
    pub fn map_url(&self) -> Option<String> {
        self.coordinates()
            .map(|(lat, lng)| format!("https://www.google.com/maps?q={lat},{lng}"))
    }
}

// ============================================================================
// Disease
// ============================================================================

/// A rice disease reference entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Login
// ============================================================================

/// Identity payload embedded in a successful login response
///
/// Farmers carry `fname` and `pcicid`; staff carry `name` and `email`.
/// The backend sends only the fields relevant to the role, so everything
/// here is optional and [`LoginOutcome::display_name`] picks the right one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub fname: Option<String>,
    #[serde(default)]
    pub pcicid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Successful login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user_type: UserRole,
    pub user_id: String,
    pub user: LoginUser,
}

impl LoginOutcome {
    /// Best display name for the signed-in user
    pub fn display_name(&self) -> String {
        match self.user_type {
            UserRole::Farmer => self
                .user
                .fname
                .clone()
                .unwrap_or_else(|| "Farmer".to_string()),
            UserRole::Admin | UserRole::SuperAdmin => self
                .user
                .name
                .clone()
                .unwrap_or_else(|| "Admin".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn farmer(fname: &str, mname: Option<&str>, lname: &str) -> Farmer {
        Farmer {
            id: "f1".to_string(),
            pcicid: "PCIC-001".to_string(),
            fname: fname.to_string(),
            mname: mname.map(String::from),
            lname: lname.to_string(),
            contact: Some("09171234567".to_string()),
            address: Some("Brgy. Malaya, Nueva Ecija".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn test_farmer_full_name() {
        assert_eq!(
            farmer("Juan", Some("Reyes"), "Dela Cruz").full_name(),
            "Juan Reyes Dela Cruz"
        );
        assert_eq!(farmer("Juan", None, "Dela Cruz").full_name(), "Juan Dela Cruz");
        assert_eq!(farmer("Juan", Some(""), "Dela Cruz").full_name(), "Juan Dela Cruz");
    }

    #[test]
    fn test_farmer_matches() {
        let f = farmer("Juan", None, "Dela Cruz");
        assert!(f.matches("juan"));
        assert!(f.matches("DELA"));
        assert!(f.matches("pcic-001"));
        assert!(f.matches("0917"));
        assert!(f.matches("nueva ecija"));
        assert!(f.matches(""));
        assert!(!f.matches("maria"));
    }

    #[test]
    fn test_schedule_status_serde() {
        let status: ScheduleStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, ScheduleStatus::InProgress);

        assert_eq!(
            serde_json::to_string(&ScheduleStatus::Done).unwrap(),
            "\"done\""
        );
        assert_eq!(ScheduleStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_schedule_deserialize_with_embedded_farmer() {
        let body = json!({
            "id": "s1",
            "farmer_id": "f1",
            "admin_id": "a1",
            "scheduled_date": "2025-06-10T08:00:00Z",
            "status": "pending",
            "farmers": {
                "id": "f1",
                "pcicid": "PCIC-001",
                "fname": "Juan",
                "lname": "Dela Cruz"
            }
        });

        let schedule: Schedule = serde_json::from_value(body).unwrap();
        assert_eq!(schedule.status, ScheduleStatus::Pending);
        assert_eq!(schedule.farmer.unwrap().pcicid, "PCIC-001");
        assert!(schedule.notes.is_none());
    }

    #[test]
    fn test_schedule_stats() {
        let mk = |status| Schedule {
            id: "s".to_string(),
            farmer_id: "f".to_string(),
            admin_id: "a".to_string(),
            scheduled_date: Utc::now(),
            notes: None,
            status,
            created_at: None,
            farmer: None,
        };

        let schedules = vec![
            mk(ScheduleStatus::Pending),
            mk(ScheduleStatus::Pending),
            mk(ScheduleStatus::InProgress),
            mk(ScheduleStatus::Done),
        ];

        let stats = ScheduleStats::from_schedules(&schedules);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.done, 1);

        assert_eq!(ScheduleStats::from_schedules(&[]), ScheduleStats::default());
    }

    #[test]
    fn test_evidence_coordinates_and_map_url() {
        let body = json!({
            "id": "e1",
            "farmer_id": "f1",
            "image_url": "https://cdn.example.com/e1.jpg",
            "latitude": 15.486_2,
            "longitude": 120.967_1,
            "captured_at": "2025-06-01T09:30:00Z"
        });

        let evidence: Evidence = serde_json::from_value(body).unwrap();
        assert_eq!(evidence.coordinates(), Some((15.4862, 120.9671)));
        assert_eq!(
            evidence.map_url().unwrap(),
            "https://www.google.com/maps?q=15.4862,120.9671"
        );
    }

    #[test]
    fn test_evidence_without_coordinates() {
        let body = json!({
            "id": "e2",
            "image_url": "https://cdn.example.com/e2.jpg",
            "latitude": 15.0,
            "captured_at": "2025-06-01T09:30:00Z"
        });

        let evidence: Evidence = serde_json::from_value(body).unwrap();
        assert!(evidence.farmer_id.is_none());
        assert!(evidence.coordinates().is_none());
        assert!(evidence.map_url().is_none());
    }

    #[test]
    fn test_login_outcome_display_name() {
        let farmer_login: LoginOutcome = serde_json::from_value(json!({
            "userType": "farmer",
            "userId": "f1",
            "user": {"fname": "Juan", "pcicid": "PCIC-001"}
        }))
        .unwrap();
        assert_eq!(farmer_login.user_type, UserRole::Farmer);
        assert_eq!(farmer_login.display_name(), "Juan");

        let admin_login: LoginOutcome = serde_json::from_value(json!({
            "userType": "super_admin",
            "userId": "a1",
            "user": {"name": "Alice", "email": "alice@example.com"}
        }))
        .unwrap();
        assert_eq!(admin_login.display_name(), "Alice");

        let bare: LoginOutcome = serde_json::from_value(json!({
            "userType": "farmer",
            "userId": "f2",
            "user": {}
        }))
        .unwrap();
        assert_eq!(bare.display_name(), "Farmer");
    }

    #[test]
    fn test_disease_deserialize_minimal() {
        let disease: Disease = serde_json::from_value(json!({
            "id": "d1",
            "name": "Rice blast"
        }))
        .unwrap();
        assert_eq!(disease.name, "Rice blast");
        assert!(disease.solution.is_none());
    }
}
