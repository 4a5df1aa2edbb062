//! # rebootr common
//!
//! Shared vocabulary for the `rebootr` workspace: the monitor configuration,
//! the error taxonomy, and the capability traits that separate the monitor
//! from the machinery that actually pings, resolves, and flips outlets.

pub mod capability;
pub mod config;
pub mod error;
pub mod macros;
pub mod network;

pub use error::{Error, Result};
