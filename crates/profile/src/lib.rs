//! FinCommerce profile engine library.
//!
//! The service is a library plus a thin binary so the router can be driven
//! in-process by the integration test crate without a network listener.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`error`] - Unified error type and response mapping
//! - [`routes`] - Axum handlers, one per profile operation
//! - [`state`] - Shared application state
//! - [`store`] - Profile store trait with Postgres and in-memory backends
//! - [`sync`] - Orchestration of reads, pure recomputation, and writes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod sync;
