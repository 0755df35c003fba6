//! Event handling for irc-pushover.
//!
//! This module turns host events into alerts:
//! - Filtering events down to the alert-worthy ones
//! - Exposing one handler per hooked host event

pub mod filter;
pub mod hooks;
