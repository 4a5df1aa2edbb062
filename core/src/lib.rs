//! # rebootr core
//!
//! The connectivity check and the escalating remediation ladder, plus the
//! concrete adapters that back the capability traits from `rebootr-common`.
//!
//! * **[`monitor`]**: the state machine, the only place decisions are made.
//! * **[`retry`]**, **[`probe`]**, **[`failure`]**, **[`power`]**: its building blocks.
//! * **[`system`]**, **[`network`]**: adapters for the OS `ping` utility, DNS over
//!   UDP, and TP-Link outlets (native protocol or the `tplink-smarthome-api` tool).

pub mod failure;
pub mod monitor;
pub mod network;
pub mod power;
pub mod probe;
pub mod retry;
pub mod system;

pub use monitor::{ConnectivityMonitor, MonitorState, Outcome, Verdict};
