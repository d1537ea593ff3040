//! This module contains [message_channel], a single producer single consumer
//! queue-based message passing system.

pub mod message_channel;

use std::time::Duration;

use thiserror::Error;

/// An alias for a [Result] that has [ChannelError] as the error type.
pub type ChannelResult<T> = Result<T, ChannelError>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelError {
    #[error("One side of the connection was dropped.")]
    ConnectionDropped,
    #[error("The operation timed out after {}+ milliseconds.", timeout.as_millis())]
    Timeout { timeout: Duration },
}

const THREAD_PANIC_MSG: &str = "Another thread panicked while holding a resource this one needs.";
