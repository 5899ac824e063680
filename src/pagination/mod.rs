//! Pagination module
//!
//! Client-side pagination over an in-memory collection, the way the portal
//! lists (farmers, schedules, evidence, diseases) present their data.
//!
//! # Overview
//!
//! [`Pager`] owns an ordered collection and exposes one page of it at a
//! time. The current page is 1-based and always clamped to the valid range,
//! so every operation is infallible: out-of-range requests are adjusted, not
//! rejected. [`page_tokens`] turns a (total, current) pair into the compact
//! page-number strip with gap markers that the portal shows under its lists.

mod pager;
mod tokens;

pub use pager::{ItemRange, Pager, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use tokens::{page_tokens, token_strip, PageToken};
