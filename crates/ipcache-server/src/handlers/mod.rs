//! HTTP handlers.

pub mod health;
pub mod ip;
pub mod metrics;
