//! Per-resource endpoint wrappers
//!
//! One small typed wrapper per backend resource, mirroring the endpoint
//! surface the portal pages call. All wrappers share a single [`ApiClient`]
//! behind an `Arc`, handed out by [`PortalClient`].

use super::client::{ApiClient, ApiClientConfig, RequestConfig};
use super::envelope::{ApiResponse, Listing};
use crate::error::{Error, Result};
use crate::models::{
    Admin, Disease, Evidence, Farmer, LoginOutcome, Schedule, ScheduleStats, ScheduleStatus,
};
use crate::types::JsonValue;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// Request payloads
// ============================================================================

/// Payload for registering a farmer
#[derive(Debug, Clone, Serialize)]
pub struct NewFarmer {
    pub pcicid: String,
    pub password: String,
    pub fname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mname: Option<String>,
    pub lname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Partial farmer update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct FarmerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Payload for creating an admin account
#[derive(Debug, Clone, Serialize)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial admin update
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload for scheduling an inspection; the wire uses camelCase keys
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub farmer_id: String,
    pub admin_id: String,
    pub scheduled_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Inspection update; the date is always resent, notes and status optionally
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub scheduled_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ScheduleStatus>,
}

/// Payload for submitting an evidence photo; the wire uses camelCase keys
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvidence {
    pub farmer_id: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
}

/// Partial evidence update; uses the record's snake_case field names
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvidenceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_schedule_id: Option<String>,
}

/// Payload for adding a disease reference entry
#[derive(Debug, Clone, Serialize)]
pub struct NewDisease {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial disease update
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiseaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// ============================================================================
// Farmers
// ============================================================================

/// Farmer registry endpoints
#[derive(Debug, Clone)]
pub struct FarmersApi {
    client: Arc<ApiClient>,
}

impl FarmersApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All registered farmers
    pub async fn get_all(&self) -> Result<Listing<Farmer>> {
        let response: ApiResponse<Vec<Farmer>> = self.client.get_json("/api/farmers").await?;
        response.into_listing()
    }

    /// One farmer by record id
    pub async fn get_by_id(&self, id: &str) -> Result<Farmer> {
        let response: ApiResponse<Farmer> =
            self.client.get_json(&format!("/api/farmers/{id}")).await?;
        response.into_result()
    }

    /// Farmers registered by a given admin
    pub async fn get_by_admin(&self, admin_id: &str) -> Result<Listing<Farmer>> {
        let response: ApiResponse<Vec<Farmer>> = self
            .client
            .get_json(&format!("/api/farmers/admin/{admin_id}"))
            .await?;
        response.into_listing()
    }

    /// Register a farmer
    pub async fn create(&self, farmer: &NewFarmer) -> Result<Farmer> {
        let response: ApiResponse<Farmer> = self
            .client
            .post_json("/api/farmers", serde_json::to_value(farmer)?)
            .await?;
        response.into_result()
    }

    /// Replace a farmer's editable fields, addressed by PCIC id
    pub async fn update(&self, pcicid: &str, update: &FarmerUpdate) -> Result<()> {
        let response: ApiResponse<JsonValue> = self
            .client
            .put_json(
                &format!("/api/farmers/{pcicid}"),
                serde_json::to_value(update)?,
            )
            .await?;
        response.into_unit()
    }

    /// Patch individual farmer fields, addressed by PCIC id
    pub async fn update_fields(&self, pcicid: &str, update: &FarmerUpdate) -> Result<()> {
        let response: ApiResponse<JsonValue> = self
            .client
            .patch_json(
                &format!("/api/farmers/{pcicid}/fields"),
                Some(serde_json::to_value(update)?),
            )
            .await?;
        response.into_unit()
    }

    /// Remove a farmer, addressed by PCIC id
    pub async fn delete(&self, pcicid: &str) -> Result<()> {
        let response: ApiResponse<JsonValue> = self
            .client
            .delete_json(&format!("/api/farmers/{pcicid}"))
            .await?;
        response.into_unit()
    }
}

// ============================================================================
// Admins
// ============================================================================

/// Program staff endpoints
#[derive(Debug, Clone)]
pub struct AdminsApi {
    client: Arc<ApiClient>,
}

impl AdminsApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All staff accounts
    pub async fn get_all(&self) -> Result<Listing<Admin>> {
        let response: ApiResponse<Vec<Admin>> = self.client.get_json("/api/admins").await?;
        response.into_listing()
    }

    /// One staff account by id
    pub async fn get_by_id(&self, id: &str) -> Result<Admin> {
        let response: ApiResponse<Admin> =
            self.client.get_json(&format!("/api/admins/{id}")).await?;
        response.into_result()
    }

    /// Create a staff account
    pub async fn create(&self, admin: &NewAdmin) -> Result<Admin> {
        let response: ApiResponse<Admin> = self
            .client
            .post_json("/api/admins", serde_json::to_value(admin)?)
            .await?;
        response.into_result()
    }

    /// Update a staff account
    pub async fn update(&self, id: &str, update: &AdminUpdate) -> Result<Admin> {
        let response: ApiResponse<Admin> = self
            .client
            .put_json(&format!("/api/admins/{id}"), serde_json::to_value(update)?)
            .await?;
        response.into_result()
    }

    /// Remove a staff account
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response: ApiResponse<JsonValue> = self
            .client
            .delete_json(&format!("/api/admins/{id}"))
            .await?;
        response.into_unit()
    }
}

// ============================================================================
// Schedules
// ============================================================================

/// Inspection schedule endpoints
#[derive(Debug, Clone)]
pub struct SchedulesApi {
    client: Arc<ApiClient>,
}

impl SchedulesApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All inspections
    pub async fn get_all(&self) -> Result<Listing<Schedule>> {
        let response: ApiResponse<Vec<Schedule>> = self.client.get_json("/api/schedules").await?;
        response.into_listing()
    }

    /// All inspections for a farmer
    pub async fn get_by_farmer(&self, farmer_id: &str) -> Result<Listing<Schedule>> {
        let response: ApiResponse<Vec<Schedule>> = self
            .client
            .get_json(&format!("/api/schedules/farmer/{farmer_id}"))
            .await?;
        response.into_listing()
    }

    /// The farmer's single next inspection
    pub async fn get_single_by_farmer(&self, farmer_id: &str) -> Result<Schedule> {
        let response: ApiResponse<Schedule> = self
            .client
            .get_json(&format!("/api/schedules/farmer/{farmer_id}/single"))
            .await?;
        response.into_result()
    }

    /// Inspections with a given status (fetches all, filters locally)
    pub async fn get_by_status(&self, status: ScheduleStatus) -> Result<Vec<Schedule>> {
        let mut listing = self.get_all().await?;
        listing.items.retain(|schedule| schedule.status == status);
        Ok(listing.items)
    }

    /// Status tallies across all inspections
    pub async fn stats(&self) -> Result<ScheduleStats> {
        let listing = self.get_all().await?;
        Ok(ScheduleStats::from_schedules(&listing.items))
    }

    /// Book an inspection
    pub async fn create(&self, schedule: &NewSchedule) -> Result<Schedule> {
        let response: ApiResponse<Schedule> = self
            .client
            .post_json("/api/schedules", serde_json::to_value(schedule)?)
            .await?;
        response.into_result()
    }

    /// Update an inspection's date, notes or status
    pub async fn update(&self, id: &str, update: &ScheduleUpdate) -> Result<()> {
        let response: ApiResponse<JsonValue> = self
            .client
            .put_json(
                &format!("/api/schedules/{id}"),
                serde_json::to_value(update)?,
            )
            .await?;
        response.into_unit()
    }

    /// Mark an inspection as completed
    pub async fn mark_as_done(&self, id: &str) -> Result<()> {
        let response: ApiResponse<JsonValue> = self
            .client
            .patch_json(&format!("/api/schedules/{id}/done"), None)
            .await?;
        response.into_unit()
    }

    /// Attach a farmer's unlinked evidence to an inspection
    pub async fn link_evidence(&self, farmer_id: &str, schedule_id: &str) -> Result<()> {
        let body = json!({"farmerId": farmer_id, "scheduleId": schedule_id});
        let response: ApiResponse<JsonValue> = self
            .client
            .post_json("/api/schedules/link-evidence", body)
            .await?;
        response.into_unit()
    }
}

// ============================================================================
// Evidence
// ============================================================================

/// Claim evidence endpoints
#[derive(Debug, Clone)]
pub struct EvidenceApi {
    client: Arc<ApiClient>,
}

impl EvidenceApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All evidence photos
    pub async fn get_all(&self) -> Result<Listing<Evidence>> {
        let response: ApiResponse<Vec<Evidence>> = self.client.get_json("/api/evidence").await?;
        response.into_listing()
    }

    /// One evidence photo by id
    pub async fn get_by_id(&self, id: &str) -> Result<Evidence> {
        let response: ApiResponse<Evidence> =
            self.client.get_json(&format!("/api/evidence/{id}")).await?;
        response.into_result()
    }

    /// All evidence submitted by a farmer
    pub async fn get_by_farmer(&self, farmer_id: &str) -> Result<Listing<Evidence>> {
        let response: ApiResponse<Vec<Evidence>> = self
            .client
            .get_json(&format!("/api/evidence/farmer/{farmer_id}"))
            .await?;
        response.into_listing()
    }

    /// All evidence linked to an inspection
    pub async fn get_by_schedule(&self, schedule_id: &str) -> Result<Listing<Evidence>> {
        let response: ApiResponse<Vec<Evidence>> = self
            .client
            .get_json(&format!("/api/evidence/schedule/{schedule_id}"))
            .await?;
        response.into_listing()
    }

    /// Evidence not yet linked to any inspection, optionally per farmer
    pub async fn get_unlinked(&self, farmer_id: Option<&str>) -> Result<Listing<Evidence>> {
        let mut config = RequestConfig::new();
        if let Some(farmer_id) = farmer_id {
            config = config.query("farmerId", farmer_id);
        }
        let response: ApiResponse<Vec<Evidence>> = self
            .client
            .get_json_with("/api/evidence/unlinked/all", config)
            .await?;
        response.into_listing()
    }

    /// Submit an evidence photo
    pub async fn create(&self, evidence: &NewEvidence) -> Result<Evidence> {
        let response: ApiResponse<Evidence> = self
            .client
            .post_json("/api/evidence", serde_json::to_value(evidence)?)
            .await?;
        response.into_result()
    }

    /// Update an evidence record
    pub async fn update(&self, id: &str, update: &EvidenceUpdate) -> Result<Evidence> {
        let response: ApiResponse<Evidence> = self
            .client
            .put_json(&format!("/api/evidence/{id}"), serde_json::to_value(update)?)
            .await?;
        response.into_result()
    }

    /// Remove an evidence record
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response: ApiResponse<JsonValue> = self
            .client
            .delete_json(&format!("/api/evidence/{id}"))
            .await?;
        response.into_unit()
    }

    /// Remove all of a farmer's evidence, deleting concurrently
    ///
    /// Returns the number of records deleted.
    pub async fn delete_for_farmer(&self, farmer_id: &str) -> Result<usize> {
        let listing = self.get_by_farmer(farmer_id).await?;
        let deletions = listing.items.iter().map(|evidence| self.delete(&evidence.id));
        try_join_all(deletions).await?;
        Ok(listing.items.len())
    }

    /// Download the photo behind an evidence record
    pub async fn download_image(&self, evidence: &Evidence) -> Result<Bytes> {
        self.client.get_bytes(&evidence.image_url).await
    }
}

// ============================================================================
// Diseases
// ============================================================================

/// Rice disease reference endpoints
#[derive(Debug, Clone)]
pub struct DiseasesApi {
    client: Arc<ApiClient>,
}

impl DiseasesApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All disease entries
    pub async fn get_all(&self) -> Result<Listing<Disease>> {
        let response: ApiResponse<Vec<Disease>> = self.client.get_json("/api/diseases").await?;
        response.into_listing()
    }

    /// Disease entries matching a search term
    pub async fn search(&self, term: &str) -> Result<Listing<Disease>> {
        let config = RequestConfig::new().query("search", term);
        let response: ApiResponse<Vec<Disease>> =
            self.client.get_json_with("/api/diseases", config).await?;
        response.into_listing()
    }

    /// One disease entry by id
    pub async fn get_by_id(&self, id: &str) -> Result<Disease> {
        let response: ApiResponse<Disease> =
            self.client.get_json(&format!("/api/diseases/{id}")).await?;
        response.into_result()
    }

    /// Add a disease entry
    pub async fn create(&self, disease: &NewDisease) -> Result<Disease> {
        let response: ApiResponse<Disease> = self
            .client
            .post_json("/api/diseases", serde_json::to_value(disease)?)
            .await?;
        response.into_result()
    }

    /// Update a disease entry
    pub async fn update(&self, id: &str, update: &DiseaseUpdate) -> Result<Disease> {
        let response: ApiResponse<Disease> = self
            .client
            .put_json(&format!("/api/diseases/{id}"), serde_json::to_value(update)?)
            .await?;
        response.into_result()
    }

    /// Remove a disease entry
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response: ApiResponse<JsonValue> = self
            .client
            .delete_json(&format!("/api/diseases/{id}"))
            .await?;
        response.into_unit()
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Login endpoint
///
/// The backend routes the identifier to the right account table (PCIC id
/// for farmers, email for staff) and answers with a flat
/// [`LoginOutcome`], not the usual envelope.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Sign in with a PCIC id or staff email plus password
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutcome> {
        let body = json!({"identifier": identifier, "password": password});
        match self.client.post_json("/api/auth/login", body).await {
            Ok(outcome) => Ok(outcome),
            Err(Error::HttpStatus { status, body }) if status < 500 => {
                Err(Error::auth(rejection_message(&body)))
            }
            Err(e) => Err(e),
        }
    }
}

/// Pull the backend's message out of a login rejection body
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(JsonValue::as_str).map(String::from))
        .unwrap_or_else(|| "Invalid credentials".to_string())
}

// ============================================================================
// Portal client
// ============================================================================

/// Facade bundling all resource wrappers over one shared transport
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Arc<ApiClient>,
}

impl PortalClient {
    /// Create a client against the hosted backend with default settings
    pub fn new() -> Self {
        Self::with_config(ApiClientConfig::default())
    }

    /// Create a client with custom transport configuration
    pub fn with_config(config: ApiClientConfig) -> Self {
        Self {
            client: Arc::new(ApiClient::with_config(config)),
        }
    }

    /// The shared transport
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Farmer registry endpoints
    pub fn farmers(&self) -> FarmersApi {
        FarmersApi::new(Arc::clone(&self.client))
    }

    /// Program staff endpoints
    pub fn admins(&self) -> AdminsApi {
        AdminsApi::new(Arc::clone(&self.client))
    }

    /// Inspection schedule endpoints
    pub fn schedules(&self) -> SchedulesApi {
        SchedulesApi::new(Arc::clone(&self.client))
    }

    /// Claim evidence endpoints
    pub fn evidence(&self) -> EvidenceApi {
        EvidenceApi::new(Arc::clone(&self.client))
    }

    /// Rice disease reference endpoints
    pub fn diseases(&self) -> DiseasesApi {
        DiseasesApi::new(Arc::clone(&self.client))
    }

    /// Login endpoint
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(Arc::clone(&self.client))
    }
}

impl Default for PortalClient {
    fn default() -> Self {
        Self::new()
    }
}
