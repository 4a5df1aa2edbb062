pub mod device;
pub mod target;
