//! FinCommerce Core - Preference aggregation domain library.
//!
//! This crate provides the types and pure functions used by the other
//! FinCommerce components:
//! - `profile` - HTTP service persisting and serving preference profiles
//! - `integration-tests` - End-to-end coverage over the service router
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP handlers. Every function here is total and
//! deterministic given its inputs, so consumers can unit test against it
//! without infrastructure.
//!
//! # Modules
//!
//! - [`types`] - Profile, wishlist, and purchase documents
//! - [`extract`] - Heuristic brand/material extraction from listing titles
//! - [`dedup`] - Duplicate-purchase detection over recent history
//! - [`aggregate`] - Wholesale recomputation of the derived summary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregate;
pub mod dedup;
pub mod extract;
pub mod types;

pub use types::*;
