//! Defines [eprintln_and_exit].

/// The equivalent to calling [eprintln], then calling [std::process::exit] with
/// an exit code of `1`.
///
/// Useful for exiting gracefully with an error message (e.g. bad command line
/// input) before anything that needs cleaning up has been created.
#[macro_export]
macro_rules! eprintln_and_exit {
    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
        ::std::process::exit(1);
    }};
}
