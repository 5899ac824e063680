//! Response envelope
//!
//! The backend wraps every payload as
//! `{success, data?, count?, message?, error?}`. Instead of letting callers
//! poke at those fields, the envelope is consumed through a single gate:
//! [`ApiResponse::into_result`] (or `into_listing` / `into_unit`), which
//! turns `success: false` into [`Error::Api`]. A failed response can never
//! be mistaken for data.

use crate::error::{Error, Result};
use crate::pagination::Pager;
use serde::Deserialize;

/// Raw envelope as deserialized off the wire
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    /// Server-side total for collection endpoints
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, or fail with the envelope's own message
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(Error::api(self.failure_message()));
        }
        self.data
            .ok_or_else(|| Error::api("response contained no data"))
    }

    /// Accept a payload-less acknowledgement (update/delete endpoints)
    pub fn into_unit(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(Error::api(self.failure_message()))
        }
    }

    fn failure_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "API request failed".to_string())
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Unwrap a collection payload together with the server's count
    pub fn into_listing(self) -> Result<Listing<T>> {
        let count = self.count;
        let items = self.into_result()?;
        Ok(Listing { items, count })
    }
}

/// A collection payload with the server-reported total
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Total as reported by the server, when it sends one
    pub count: Option<u64>,
}

impl<T> Listing<T> {
    /// Number of items actually received
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the listing is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Server-reported total, falling back to the received length
    pub fn total(&self) -> u64 {
        self.count.unwrap_or(self.items.len() as u64)
    }

    /// Page the received items
    pub fn into_pager(self, page_size: usize) -> Pager<T> {
        Pager::new(self.items).with_page_size(page_size)
    }
}
