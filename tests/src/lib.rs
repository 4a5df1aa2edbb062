//! Scenario tests for the connectivity monitor, run against an in-memory
//! network that records every probe, outlet command and pause.

pub mod support;

mod injection;
mod monitor;
