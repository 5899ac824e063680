//! Session module
//!
//! One explicit identity object for the signed-in user instead of loose
//! per-key reads scattered across the app.
//!
//! # Overview
//!
//! A [`Session`] is issued once at login from the backend's answer, carried
//! by value wherever the user's identity matters (route decisions, CLI
//! output), and invalidated as a whole at logout. [`SessionStore`] persists
//! it between runs; [`SessionManager`] ties the login endpoint and the
//! store together into the issue / read / invalidate lifecycle.

mod manager;
mod store;
mod types;

pub use manager::SessionManager;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use types::Session;
