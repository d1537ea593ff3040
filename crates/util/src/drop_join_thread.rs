//! This module contains the [DropJoinHandle] type, a thin wrapper type around
//! [JoinHandle] that joins the thread when the handle is dropped (RAII style).

use std::thread::{self, JoinHandle};

/// A thin wrapper around [JoinHandle] that joins the thread when the handle is
/// dropped (RAII style).
///
/// Any error in joining the thread will be ignored when dropped. To get at the
/// thread's result, see [Self::join].
#[derive(Debug)]
pub struct DropJoinHandle<T>(Option<JoinHandle<T>>);

impl<T> DropJoinHandle<T> {
    /// Create from an existing join handle.
    pub fn new(handle: JoinHandle<T>) -> Self {
        Self(Some(handle))
    }

    /// Join the thread now, returning its result. [None] is returned if the
    /// thread panicked.
    pub fn join(mut self) -> Option<T> {
        self.0.take().expect(EXPECT_MSG).join().ok()
    }

    /// Whether the thread has finished running.
    pub fn is_finished(&self) -> bool {
        self.0.as_ref().expect(EXPECT_MSG).is_finished()
    }
}

impl<T> From<JoinHandle<T>> for DropJoinHandle<T> {
    fn from(handle: JoinHandle<T>) -> Self {
        Self::new(handle)
    }
}

impl<T> Drop for DropJoinHandle<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            _ = handle.join();
        }
    }
}

/// The same as [thread::spawn], but a [DropJoinHandle] is returned instead.
pub fn spawn<F, T>(f: F) -> DropJoinHandle<T>
where
    F: FnOnce() -> T,
    F: Send + 'static,
    T: Send + 'static,
{
    DropJoinHandle::from(thread::spawn(f))
}

/// Like [spawn], but the thread is given a name (shows up in panic messages and
/// debuggers). An error is returned if the OS fails to create the thread.
pub fn spawn_named<F, T>(name: &str, f: F) -> std::io::Result<DropJoinHandle<T>>
where
    F: FnOnce() -> T,
    F: Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(f)
        .map(DropJoinHandle::from)
}

const EXPECT_MSG: &str = "The handle should be present.";

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[test]
    fn dropping_joins_the_thread() {
        let finished = Arc::new(AtomicBool::new(false));

        let handle = spawn({
            let finished = finished.clone();
            move || {
                thread::sleep(Duration::from_millis(50));
                finished.store(true, Ordering::SeqCst);
            }
        });
        drop(handle);

        assert!(finished.load(Ordering::SeqCst));
    }

    #[test]
    fn join_returns_the_result() {
        let handle = spawn_named("adder", || 2 + 2).unwrap();
        assert_eq!(handle.join(), Some(4));
    }
}
