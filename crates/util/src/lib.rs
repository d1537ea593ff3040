//! Small pieces of shared tooling used by the rest of the workspace: debug
//! logging, a single producer single consumer message channel, RAII thread
//! joining, and stop signal polling.

pub mod channels;
pub mod debug_log;
pub mod drop_join_thread;
pub mod eprint_and_exit;
pub mod stop_signals;
