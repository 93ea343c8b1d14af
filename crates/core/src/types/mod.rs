//! Domain type definitions.

pub mod email;
pub mod service;
