//! # prospect-store
//!
//! SQLite-backed persistence for Prospect.

pub mod store;

pub use store::settings::Settings;
pub use store::Store;
