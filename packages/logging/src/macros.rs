/// Logs the first message at debug level, or the second at trace level when
/// trace logging is enabled.
///
/// ```rust
/// let frame = r#"{"type":"pong"}"#;
/// proxima_logging::debug_or_trace!(("Sending frame"), ("Sending frame {frame}"));
/// ```
#[macro_export]
macro_rules! debug_or_trace {
    (($($debug:tt)+), ($($trace:tt)+)) => {
        if $crate::log::log_enabled!($crate::log::Level::Trace) {
            $crate::log::trace!($($trace)*);
        } else {
            $crate::log::debug!($($debug)*);
        }
    }
}
