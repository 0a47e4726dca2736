//! # hookbell-channels
//!
//! Delivery backends for hookbell notifications.

pub mod sound;
pub mod telegram;
pub mod webhook;
