//! Logging macros taking a `Code` plus `"key" => value` context pairs
//!
//! Context values may be any `Display` type. Every macro is a no-op until
//! global logging has been initialized.

/// Collects `"key" => value` pairs into owned context entries
#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($key:expr => $value:expr),*) => {
        {
            let context: Vec<(&str, String)> = vec![$(($key, $value.to_string())),*];
            context
        }
    };
}

// ============================================================================
// CODED EVENTS
// ============================================================================

#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($span),
            $crate::__log_context!($($key => $value),*),
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            $crate::__log_context!($($key => $value),*),
        )
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_success_with_context(
            $code,
            $message,
            $crate::__log_context!($($key => $value),*),
        )
    };
}

// ============================================================================
// UNCODED EVENTS
// ============================================================================

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_info_with_context($message, $crate::__log_context!($($key => $value),*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::logging::log_uncoded_with_context(
            $crate::logging::LogLevel::Warning,
            $message,
            $crate::__log_context!($($key => $value),*),
        )
    };
}

/// Debug context is only formatted when the effective level admits it
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::logging::log_uncoded_with_context(
                $crate::logging::LogLevel::Debug,
                $message,
                $crate::__log_context!($($key => $value),*),
            )
        }
    };
}
