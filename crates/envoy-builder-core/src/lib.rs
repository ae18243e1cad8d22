//! Core types for the Envoy builder script generator.
//!
//! This crate defines the flag model of a generated script ([`Parameter`]),
//! the per-profile rendering input ([`BuildScript`]), the registry of known
//! profiles ([`profile`]), and shared error types.

pub mod error;
pub mod parameter;
pub mod profile;
pub mod script;

pub use error::{Error, Result};
pub use parameter::{ParamValue, Parameter};
pub use script::BuildScript;
