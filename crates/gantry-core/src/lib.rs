//! Core utilities for Gantry (service container and provider bootstrap)
//!
//! This crate holds the error taxonomy and the naming rules shared by the
//! main `gantry` library. It is split out so that downstream extensions can
//! speak the same error language without pulling in the full container.

pub mod core;

pub use core::error::{root_cause, DependencyFailure, GantryError, GantryResult};
pub use core::name::validate_name;
