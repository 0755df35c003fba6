//! Service integrations for external APIs and hosts.
//!
//! This module contains the two edges of the application:
//! - Host event sources (e.g., a line-delimited JSON feed)
//! - Notifiers (e.g., Pushover)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod host;
pub mod notifier;
