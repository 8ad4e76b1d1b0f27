//! Bounded polling for elements the mutation stream never reports.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::WaitError;
use crate::signal::AbortToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Runs `check` until it yields a value, the deadline passes, or `token` is
/// aborted.
///
/// Abort is tested before every call of `check`, so a reset that lands
/// before the deadline always surfaces as [`WaitError::Aborted`] rather than
/// a timeout. The check always runs at least once for a live token.
pub fn poll_until<T, F>(
    token: &AbortToken,
    options: PollOptions,
    mut check: F,
) -> Result<T, WaitError>
where
    F: FnMut() -> Option<T>,
{
    debug!(
        interval_ms = options.interval.as_millis() as u64,
        timeout_ms = options.timeout.as_millis() as u64,
        generation = token.generation(),
        "Polling for condition"
    );

    let started = Instant::now();
    let deadline = started + options.timeout;

    loop {
        if token.is_aborted() {
            return Err(WaitError::Aborted {
                started: token.generation(),
                current: token.current_generation(),
            });
        }

        if let Some(value) = check() {
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitError::Timeout {
                elapsed: now.duration_since(started),
            });
        }

        thread::sleep(options.interval.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::AbortSignal;

    fn fast() -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(30),
        }
    }

    #[test]
    fn resolves_once_check_yields() {
        let signal = AbortSignal::new();
        let mut calls = 0;
        let value = poll_until(&signal.token(), fast(), || {
            calls += 1;
            (calls == 3).then_some("ready")
        })
        .expect("poll resolves");
        assert_eq!(value, "ready");
        assert_eq!(calls, 3);
    }

    #[test]
    fn times_out_when_check_never_yields() {
        let signal = AbortSignal::new();
        let err = poll_until(&signal.token(), fast(), || None::<()>).unwrap_err();
        assert!(matches!(err, WaitError::Timeout { .. }));
    }

    #[test]
    fn rotation_during_wait_aborts_instead_of_timing_out() {
        let signal = AbortSignal::new();
        let token = signal.token();
        let resetter = signal.clone();
        let options = PollOptions {
            interval: Duration::from_millis(1),
            timeout: Duration::from_secs(5),
        };

        let mut calls = 0;
        let err = poll_until(&token, options, || {
            calls += 1;
            if calls == 2 {
                resetter.rotate();
            }
            None::<()>
        })
        .unwrap_err();

        assert_eq!(err, WaitError::Aborted { started: 0, current: 1 });
        assert_eq!(calls, 2);
    }

    #[test]
    fn wait_started_after_rotation_is_unaffected() {
        let signal = AbortSignal::new();
        signal.rotate();
        let token = signal.token();
        let err = poll_until(&token, fast(), || None::<()>).unwrap_err();
        assert!(!err.is_aborted());
    }

    #[test]
    fn rotation_from_another_thread_aborts_blocked_wait() {
        let signal = AbortSignal::new();
        let token = signal.token();
        let remote = signal.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.rotate();
        });

        let options = PollOptions {
            interval: Duration::from_millis(2),
            timeout: Duration::from_secs(5),
        };
        let err = poll_until(&token, options, || None::<()>).unwrap_err();
        handle.join().unwrap();
        assert!(err.is_aborted());
    }
}
