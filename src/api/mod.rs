//! Portal API module
//!
//! Typed client for the portal backend's REST endpoints.
//!
//! # Overview
//!
//! [`ApiClient`] is the transport: base-URL joining, default headers,
//! retries with configurable backoff, Retry-After handling and token-bucket
//! rate limiting. Every backend payload arrives wrapped in an
//! [`ApiResponse`] envelope whose only way out is [`ApiResponse::into_result`]
//! (or [`ApiResponse::into_listing`] for collections), so a failed response
//! can never be read as data. The per-resource wrappers (farmers, admins,
//! schedules, evidence, diseases, auth) mirror the backend's endpoint
//! surface; [`PortalClient`] bundles them over one shared transport.

mod client;
mod envelope;
mod rate_limit;
mod resources;

pub use client::{
    ApiClient, ApiClientConfig, ApiClientConfigBuilder, RequestConfig, DEFAULT_BASE_URL,
};
pub use envelope::{ApiResponse, Listing};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use resources::{
    AdminUpdate, AdminsApi, AuthApi, DiseaseUpdate, DiseasesApi, EvidenceApi, EvidenceUpdate,
    FarmerUpdate, FarmersApi, NewAdmin, NewDisease, NewEvidence, NewFarmer, NewSchedule,
    PortalClient, ScheduleUpdate, SchedulesApi,
};

#[cfg(test)]
mod tests;
