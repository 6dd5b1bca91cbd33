//! Auth0 Resource Controller Library
//!
//! Declarative log stream and hook resources for the Auth0 Management API.
//! Each resource maps a declared configuration onto create, read, update and
//! delete calls, and converges the remote state to what was declared.
//! Tests are included in the module files and under `tests/`.
//!
//! ## Quick Start
//!
//! ```rust
//! use auth0_resources::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod controller;
pub mod management;
pub mod manifest;
pub mod observability;
pub mod prelude;
pub mod schema;
