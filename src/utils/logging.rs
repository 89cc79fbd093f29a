//! Logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! The session controller and the attention timer log on every transition
//! and tick, which is noisy in tests and normal runs. Each module that uses
//! these macros declares the flag itself:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("entered page {}", index);
//! ```

/// Shared body of the gated macros. `$level` is a `log` macro name.
#[macro_export]
macro_rules! log_gated {
    ($level:ident, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::$level!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::log_gated!(debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::log_gated!(info, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::log_gated!(warn, $($arg)*)
    };
}
