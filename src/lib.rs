//! arrlink - wires a Prowlarr / *arr / download client stack together
//!
//! This library crate exposes the core functionality for integration testing.

pub mod apps;
pub mod arr;
pub mod config;
pub mod configure;
pub mod context;
mod error;
pub mod secrets;

pub use error::{Error, Result};
