//! Copperleaf Core - Shared types library.
//!
//! Common types used across the Copperleaf components:
//! - `storefront` - Public-facing shop site
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database support (sqlx `Type`/`Encode`/`Decode` impls) is gated behind the
//! `postgres` feature so the crate stays lightweight for pure consumers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
