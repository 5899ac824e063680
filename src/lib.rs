// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # RiceScan Portal SDK
//!
//! Client SDK and CLI for the RiceScan rice-crop insurance portal: insured
//! farmers submit geotagged claim evidence, program staff schedule field
//! inspections and review claims.
//!
//! ## Features
//!
//! - **Typed API client**: Every backend resource (farmers, schedules,
//!   evidence, diseases, admins) behind a typed wrapper with retries and
//!   rate limiting
//! - **Tagged response envelope**: Backend failures become errors at the
//!   deserialization boundary, never half-read payloads
//! - **Session lifecycle**: Issue on login, persist, read, invalidate
//! - **Pagination engine**: Clamped 1-based paging with an elided
//!   page-number strip for any list
//! - **Route rules**: The portal's role-based access checks as a pure
//!   function
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ricescan_portal::api::PortalClient;
//! use ricescan_portal::session::SessionManager;
//! use ricescan_portal::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let portal = PortalClient::new();
//!     let sessions = SessionManager::in_memory(portal.auth());
//!
//!     // Sign in and page through farmers
//!     sessions.login("2023-0001", "secret").await?;
//!     let mut pager = portal.farmers().get_all().await?.into_pager(10);
//!     for farmer in pager.current_slice() {
//!         println!("{}", farmer.full_name());
//!     }
//!     pager.next_page();
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          CLI                                │
//! │  login/logout/whoami   farmers   schedules   evidence  ...  │
//! └─────────────────────────────────────────────────────────────┘
//!                │                │                 │
//! ┌──────────────┴───┬────────────┴─────┬───────────┴──────────┐
//! │     Session      │       API        │   Presentation       │
//! ├──────────────────┼──────────────────┼──────────────────────┤
//! │ Login/Logout     │ Envelope         │ Pagination           │
//! │ File store       │ Resources        │ Claims grouping      │
//! │ Route rules      │ Retry/Backoff    │ Carousel             │
//! │                  │ Rate limit       │                      │
//! └──────────────────┴──────────────────┴──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the portal SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Backend data models
pub mod models;

/// Pagination engine
pub mod pagination;

/// API client, envelope and per-resource wrappers
pub mod api;

/// Claims-review helpers (grouping, carousel)
pub mod claims;

/// Session lifecycle and persistence
pub mod session;

/// Role-based route decisions
pub mod routes;

/// Portal configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use api::PortalClient;
pub use config::PortalConfig;
pub use pagination::Pager;
pub use session::{Session, SessionManager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
