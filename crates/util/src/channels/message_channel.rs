//! This module defines the [Inbox] and [Outbox] types for working with a
//! one-way SPSC (single producer single consumer) queue, useful in situations
//! with a single thread producing data and another single thread reading it.
//!
//! Each side marks itself as closed (under the queue's lock) when it's dropped,
//! so a waiting inbox always wakes up and sees the hang-up.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{ChannelError, ChannelResult, THREAD_PANIC_MSG};

/// The inbox (message receiver) of a one-way message channel (single producer
/// single consumer queue). Also see [Outbox].
///
/// See [new] and [with_capacity] to construct.
#[derive(Debug)]
pub struct Inbox<T> {
    channel: Arc<OneWayChannel<T>>,
}

impl<T> Inbox<T> {
    /// Waits for a message from the outbox until one appears.
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the outbox was
    /// dropped and there are no more items in the queue.
    pub fn wait(&self) -> ChannelResult<T> {
        let mut state = self.channel.lock();

        loop {
            if let Some(msg) = state.queue.pop_front() {
                return Ok(msg);
            }

            if !state.outbox_open {
                return Err(ChannelError::ConnectionDropped);
            }

            // Spurious wakeups just bring us back around the loop.
            state = self.channel.notifier.wait(state).expect(THREAD_PANIC_MSG);
        }
    }

    /// Waits for a message from the outbox for up to `timeout` time.
    ///
    /// After `timeout` time, a [ChannelError::Timeout] error is returned. Note
    /// that this function's execution may take slightly longer than `timeout`
    /// time.
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the outbox was
    /// dropped and there are no more items in the queue.
    pub fn wait_timeout(&self, timeout: Duration) -> ChannelResult<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.channel.lock();

        loop {
            if let Some(msg) = state.queue.pop_front() {
                return Ok(msg);
            }

            if !state.outbox_open {
                return Err(ChannelError::ConnectionDropped);
            }

            let time_until_deadline = deadline.saturating_duration_since(Instant::now());
            if time_until_deadline.is_zero() {
                return Err(ChannelError::Timeout { timeout });
            }

            state = self
                .channel
                .notifier
                .wait_timeout(state, time_until_deadline)
                .expect(THREAD_PANIC_MSG)
                .0;
        }
    }

    /// Receives a message from the outbox if a message is waiting, returning
    /// [None] otherwise.
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the outbox was
    /// dropped and there are no more items in the queue.
    pub fn check(&self) -> ChannelResult<Option<T>> {
        let mut state = self.channel.lock();

        match state.queue.pop_front() {
            Some(msg) => Ok(Some(msg)),
            None if state.outbox_open => Ok(None),
            None => Err(ChannelError::ConnectionDropped),
        }
    }

    /// Receives every message that has built up, returning an empty [VecDeque]
    /// if there aren't any.
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the outbox was
    /// dropped and there are no more items in the queue.
    pub fn check_all(&self) -> ChannelResult<VecDeque<T>> {
        let mut state = self.channel.lock();

        if state.queue.is_empty() && !state.outbox_open {
            return Err(ChannelError::ConnectionDropped);
        }

        Ok(state.queue.split_off(0))
    }

    /// Whether the outbox is still alive, the inverse of
    /// [Self::connection_closed].
    pub fn connection_open(&self) -> bool {
        self.channel.lock().outbox_open
    }

    /// Whether the outbox has been dropped, the inverse of
    /// [Self::connection_open].
    pub fn connection_closed(&self) -> bool {
        !self.connection_open()
    }
}

impl<T> Drop for Inbox<T> {
    fn drop(&mut self) {
        let mut state = self.channel.lock();
        state.inbox_open = false;
        // Nothing will ever read these.
        state.queue.clear();
    }
}

/// The outbox (message sender) of a one-way message channel (single producer
/// single consumer queue). Also see [Inbox].
///
/// See [new] and [with_capacity] to construct.
#[derive(Debug)]
pub struct Outbox<T> {
    channel: Arc<OneWayChannel<T>>,
}

impl<T> Outbox<T> {
    /// Sends a message to the inbox, returning the number of messages that have
    /// been sent but not received (after sending the message).
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the inbox was
    /// dropped.
    pub fn send(&self, msg: T) -> ChannelResult<usize> {
        let mut state = self.channel.lock();

        if !state.inbox_open {
            return Err(ChannelError::ConnectionDropped);
        }

        state.queue.push_back(msg);
        let in_flight = state.queue.len();

        self.channel.notifier.notify_one();

        Ok(in_flight)
    }

    /// The number of messages that have been sent but not received.
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the inbox was
    /// dropped.
    pub fn messages_in_flight(&self) -> ChannelResult<usize> {
        let state = self.channel.lock();

        if state.inbox_open {
            Ok(state.queue.len())
        } else {
            Err(ChannelError::ConnectionDropped)
        }
    }

    /// Whether the inbox is still alive, the inverse of
    /// [Self::connection_closed].
    pub fn connection_open(&self) -> bool {
        self.channel.lock().inbox_open
    }

    /// Whether the inbox has been dropped, the inverse of
    /// [Self::connection_open].
    pub fn connection_closed(&self) -> bool {
        !self.connection_open()
    }
}

// The inbox may be waiting, it has to be told that no more messages are
// coming so it doesn't just wait forever.
impl<T> Drop for Outbox<T> {
    fn drop(&mut self) {
        self.channel.lock().outbox_open = false;
        self.channel.notifier.notify_all();
    }
}

/// Create a one-way message channel's [Inbox] and [Outbox].
///
/// - The inbox will be able to receive messages as long as the outbox hasn't
///   been dropped or while there are still pending messages.
/// - The outbox will be able to send messages as long as the inbox hasn't been
///   dropped.
pub fn new<T>() -> (Inbox<T>, Outbox<T>) {
    with_capacity(0)
}

/// Create a one-way message channel's [Inbox] and [Outbox] with space to store
/// `capacity` messages without reallocating memory. More messages than
/// `capacity` can still sit in the inbox at a time (the channel is not
/// bounded).
pub fn with_capacity<T>(capacity: usize) -> (Inbox<T>, Outbox<T>) {
    let channel = Arc::new(OneWayChannel {
        state: Mutex::new(ChannelState {
            queue: VecDeque::with_capacity(capacity),
            inbox_open: true,
            outbox_open: true,
        }),
        notifier: Condvar::new(),
    });

    (
        Inbox {
            channel: channel.clone(),
        },
        Outbox { channel },
    )
}

#[derive(Debug)]
struct OneWayChannel<T> {
    state: Mutex<ChannelState<T>>,
    notifier: Condvar,
}

impl<T> OneWayChannel<T> {
    fn lock(&self) -> MutexGuard<'_, ChannelState<T>> {
        self.state.lock().expect(THREAD_PANIC_MSG)
    }
}

#[derive(Debug)]
struct ChannelState<T> {
    queue: VecDeque<T>,
    inbox_open: bool,
    outbox_open: bool,
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn messages_arrive_in_order() {
        let (inbox, outbox) = new::<i32>();

        let thread = thread::spawn(move || {
            for i in 1..=3 {
                assert!(outbox.send(i).is_ok());
            }
        });

        assert_eq!(inbox.wait(), Ok(1));
        assert_eq!(inbox.wait(), Ok(2));
        assert_eq!(inbox.wait(), Ok(3));

        thread.join().unwrap();
    }

    #[test]
    fn timeout_works() {
        let (inbox, outbox) = new::<i32>();

        assert!(outbox.send(1).is_ok());

        let timeout = Duration::from_millis(200);
        assert_eq!(inbox.wait_timeout(timeout), Ok(1));
        assert_eq!(
            inbox.wait_timeout(timeout),
            Err(ChannelError::Timeout { timeout })
        );
    }

    #[test]
    fn check_and_check_all() {
        let (inbox, outbox) = new::<i32>();

        assert_eq!(inbox.check(), Ok(None));
        assert!(inbox.check_all().unwrap().is_empty());

        assert_eq!(outbox.send(1), Ok(1));
        assert_eq!(outbox.send(2), Ok(2));
        assert_eq!(outbox.messages_in_flight(), Ok(2));

        assert_eq!(inbox.check(), Ok(Some(1)));
        assert_eq!(outbox.send(3), Ok(2));
        assert_eq!(inbox.check_all(), Ok(VecDeque::from([2, 3])));
        assert_eq!(inbox.check(), Ok(None));
    }

    #[test]
    fn dropped_inbox_rejects_sends() {
        let (inbox, outbox) = new::<i32>();

        assert!(outbox.connection_open());
        drop(inbox);

        assert!(outbox.connection_closed());
        assert_eq!(outbox.send(1), Err(ChannelError::ConnectionDropped));
    }

    #[test]
    fn dropped_outbox_wakes_a_waiting_inbox() {
        let (inbox, outbox) = new::<i32>();

        let thread = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            assert!(outbox.send(1).is_ok());
            drop(outbox);
        });

        assert_eq!(inbox.wait(), Ok(1));
        assert_eq!(inbox.wait(), Err(ChannelError::ConnectionDropped));
        assert_eq!(inbox.check(), Err(ChannelError::ConnectionDropped));

        thread.join().unwrap();
    }

    #[test]
    fn pending_messages_survive_an_outbox_drop() {
        let (inbox, outbox) = new::<i32>();

        thread::scope(|s| {
            s.spawn(move || {
                assert!(outbox.send(1).is_ok());
                assert!(outbox.send(2).is_ok());
            });
        });

        assert!(inbox.connection_closed());
        assert_eq!(inbox.wait(), Ok(1));
        assert_eq!(inbox.check_all(), Ok(VecDeque::from([2])));
        assert!(inbox.check_all().is_err());
    }
}
