//! Core use-case services.
//!
//! # Responsibility
//! - Expose the external operations: seed, import, get and list.
//! - Keep UI/CLI hosts decoupled from registry and pipeline details.

pub mod hub_service;
