//! Wire formats spoken by the `rebootr` adapters.
//!
//! * [`dns`]: minimal DNS query builder and answer inspection.
//! * [`kasa`]: the TP-Link smart-plug command framing and cipher.

pub mod dns;
pub mod kasa;
