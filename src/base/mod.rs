//! Core components, types, and utilities for irc-pushover.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Chat event and alert types, and common result handling.

pub mod config;
pub mod types;
