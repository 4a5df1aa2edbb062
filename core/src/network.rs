//! Adapters that speak network protocols themselves.

pub mod kasa;
pub mod resolver;
