/// Tracing target the terminal formatter renders with the success marker.
pub const SUCCESS_TARGET: &str = "rebootr::success";

/// Tracing target the terminal formatter prints verbatim, without any prefix.
pub const PRINT_TARGET: &str = "rebootr::print";

/// Logs a positive outcome. Rendered like `info!` but with its own marker.
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        ::tracing::info!(target: $crate::macros::SUCCESS_TARGET, $($arg)+)
    };
}
