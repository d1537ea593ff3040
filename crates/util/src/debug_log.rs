//! Contains tools for debug-mode logging.
//!
//! Logging cannot be enabled when `cfg!(debug_assertions)` is false, otherwise
//! it's enabled by default. Info goes to stdout, warnings and errors go to
//! stderr.

use std::panic::Location;
#[cfg(debug_assertions)]
use std::sync::atomic::{AtomicBool, Ordering};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Log some info to stdout if both `cfg!(debug_assertions)` and [enabled] are
/// true.
#[macro_export]
macro_rules! debug_log_info {
    ($($arg:tt)*) => {
        $crate::__debug_log!(println, stdout, "\x1b[35m", "INFO", $($arg)*)
    };
}

/// Log a warning to stderr if both `cfg!(debug_assertions)` and [enabled] are
/// true.
#[macro_export]
macro_rules! debug_log_warning {
    ($($arg:tt)*) => {
        $crate::__debug_log!(eprintln, stderr, "\x1b[33m", "WARNING", $($arg)*)
    };
}

/// Log an error to stderr if both `cfg!(debug_assertions)` and [enabled] are
/// true.
#[macro_export]
macro_rules! debug_log_error {
    ($($arg:tt)*) => {
        $crate::__debug_log!(eprintln, stderr, "\x1b[31m", "ERROR", $($arg)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __debug_log {
    ($print:ident, $stream:ident, $level_color:literal, $level:literal, $($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        if $crate::debug_log::enabled() {
            let is_terminal = ::std::io::IsTerminal::is_terminal(&::std::io::$stream());
            let (blue, level_color, reset_color) = if is_terminal {
                ("\x1b[34m", $level_color, "\x1b[0m")
            } else {
                ("", "", "")
            };

            let where_and_when = $crate::debug_log::where_and_when(blue, reset_color);

            ::std::$print!(
                "{blue}DEBUG LOG{reset_color} [{level_color}{}{reset_color}]: {}\n{where_and_when}",
                $level,
                format!($($arg)*),
            );
        }
    }};
}

/// Whether logging is enabled or not.
///
/// Logging cannot be enabled when `cfg!(debug_assertions)` is false, otherwise
/// it's enabled by default.
#[inline(always)]
pub fn enabled() -> bool {
    #[cfg(debug_assertions)]
    return ENABLED.load(Ordering::Relaxed);

    #[cfg(not(debug_assertions))]
    return false;
}

/// Disable logging.
#[inline(always)]
pub fn disable() {
    #[cfg(debug_assertions)]
    ENABLED.store(false, Ordering::Relaxed);
}

/// Enable logging.
///
/// Trying to manually enable logging when `cfg!(debug_assertions)` is false
/// will result in the program panicking.
#[inline(always)]
pub fn enable() {
    #[cfg(not(debug_assertions))]
    panic!("Debug logging cannot be enabled.");

    #[cfg(debug_assertions)]
    ENABLED.store(true, Ordering::Relaxed);
}

/// The location of the caller and the time this was called as an indented,
/// colored block of text.
///
/// This function gets called by the debug log macros (e.g. [debug_log_info])
/// and generally shouldn't be called directly.
#[track_caller]
pub fn where_and_when(color: &str, reset_color: &str) -> String {
    let loc = Location::caller();
    let where_ = format!("{}:{}:{}", loc.file(), loc.line(), loc.column());

    let when = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .format(&Rfc3339)
        .unwrap_or_else(|e| format!("Unknown time: {e}"));

    format!("\tWhere: {color}{where_}{reset_color}\n\tTime:  {color}{when}{reset_color}")
}

#[cfg(debug_assertions)]
static ENABLED: AtomicBool = AtomicBool::new(true);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_and_when_has_a_timestamp() {
        let text = where_and_when("", "");
        let (where_, when) = text.split_once("\n\tTime:  ").unwrap();

        assert!(where_.starts_with("\tWhere: "));
        assert!(where_.contains("debug_log.rs"));
        assert!(!when.starts_with("Unknown time"));
        // e.g. `2024-05-01T12:34:56.789+02:00`
        assert_eq!(&when[4..5], "-");
        assert_eq!(&when[10..11], "T");
    }
}
