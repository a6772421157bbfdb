//! Prowlarr and *arr REST API access.

mod client;
mod types;

pub use client::*;
pub use types::*;
