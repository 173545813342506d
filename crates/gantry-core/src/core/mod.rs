//! Core error and naming modules.

pub mod error;
pub mod name;
