//! Core types for Copperleaf.
//!
//! Type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod slug;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use slug::{Slug, SlugError};
