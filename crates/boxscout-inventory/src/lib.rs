//! boxscout-inventory — NetBox REST API client.
//!
//! Lists devices and virtual machines that carry a primary IP, following
//! NetBox's cursor pagination. Any transport or status failure surfaces as
//! an [`InventoryError`] so the caller can abort the cycle without touching
//! previously-written files.

pub mod client;
pub mod error;

pub use client::NetBoxClient;
pub use error::InventoryError;
