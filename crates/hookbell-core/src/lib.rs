//! # hookbell-core
//!
//! Core types, traits, configuration, and error handling for hookbell.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod status;
pub mod synthesize;
pub mod traits;
pub mod transcript;
