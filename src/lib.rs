//! Suite integration toolkit.
//!
//! - [`api`]: Suite API client (administrator, contact, keyring,
//!   automation center)
//! - [`authentication`]: signed-URL axum layer producing [`ValidatedData`]
//! - [`translations`]: per-admin translation middleware and axum layer
//! - [`superadmin`]: superadmin check over the administrator API

pub mod api;
pub mod authentication;
pub mod config;
pub mod retry;
pub mod superadmin;
pub mod translations;
pub mod validated_data;

pub use validated_data::ValidatedData;
