//! # prospect-core
//!
//! Core types, traits, configuration, and error handling for Prospect.

pub mod config;
pub mod error;
pub mod phone;
pub mod record;
pub mod traits;

pub use config::shellexpand;
pub use error::ProspectError;
