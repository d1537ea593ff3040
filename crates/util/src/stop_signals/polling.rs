//! Tools for handling stop signals (e.g. `SIGINT`) with polling. This allows
//! you to essentially ignore stop signals until you want to deal with them
//! (e.g. once per played frame), which makes resource cleanup a lot easier.

use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use signal_hook::{SigId, consts, low_level};

/// Enables the polling of stop signals (e.g. `SIGINT`) so that you can call
/// [poll]/[consume] to see if a stop signal has been sent. Also see [disable].
///
/// Calling this while polling is already enabled does nothing.
pub fn enable() -> Result<(), io::Error> {
    let mut sig_ids = SIG_IDS.lock().expect(super::THREAD_EXPECT_MSG);
    if !sig_ids.is_empty() {
        return Ok(());
    }

    for &signal in consts::TERM_SIGNALS {
        // SAFETY: Messing with atomics is one of the only things you can
        // safely do in a signal handler and that's all we're doing here.
        // There's no mutexes, no memory allocations, no functions being called
        // that aren't async-signal-safe, and nothing that can panic.
        let registered = unsafe {
            low_level::register(signal, || {
                STOP_SIGNALS.fetch_add(1, Ordering::SeqCst);
            })
        };

        match registered {
            Ok(sig_id) => sig_ids.push(sig_id),
            Err(e) => {
                crate::debug_log_error!("Failed to register signal handler: {e}");
                for sig_id in sig_ids.drain(..) {
                    low_level::unregister(sig_id);
                }
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Disables stop signal polling if stop signal polling is enabled (see
/// [enable]). [poll]/[consume] will continue to return `true` after this is
/// called if there are unconsumed stop signals.
pub fn disable() {
    let mut sig_ids = SIG_IDS.lock().expect(super::THREAD_EXPECT_MSG);
    for sig_id in sig_ids.drain(..) {
        low_level::unregister(sig_id);
    }
}

/// Returns whether stop signal polling has been enabled or not (see [enable]
/// and [disable]).
pub fn is_enabled() -> bool {
    !SIG_IDS.lock().expect(super::THREAD_EXPECT_MSG).is_empty()
}

/// Returns whether a stop signal (e.g. `SIGINT`) has been captured, consuming
/// the signal in the process. To poll without consuming the signal, see [poll].
///
/// This function will always return `false` if all stop signals have been
/// consumed and polling is disabled (which it is by default).
pub fn consume() -> bool {
    STOP_SIGNALS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
            (count > 0).then(|| count - 1)
        })
        .is_ok()
}

/// Returns whether a stop signal (e.g. `SIGINT`) has been captured without
/// consuming the signal in the process. To consume the signal, see [consume].
pub fn poll() -> bool {
    STOP_SIGNALS.load(Ordering::SeqCst) > 0
}

static STOP_SIGNALS: AtomicUsize = AtomicUsize::new(0);

static SIG_IDS: Mutex<Vec<SigId>> = Mutex::new(Vec::new());
