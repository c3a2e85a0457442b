//! The bounded polling loop behind every acquisition.

use crate::cancel::CancelSignal;
use crate::store::{ExceptionSink, StoreConnection};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One attempt to claim a key: retries until claimed, timed out, or cancelled.
///
/// Each round:
/// 1. Stop if the signal has fired or `timeout` has elapsed.
/// 2. Claim once. Success ends the attempt; a store error is reported to the
///    sink and logged, then treated like a failed claim.
/// 3. Wait `retry_delay` on the signal, waking early if it fires.
///
/// The check comes before the claim, so the store is called at least once
/// unless the signal has already fired.
pub struct LockAttempt<'a> {
    key: &'a str,
    timeout: Duration,
    retry_delay: Duration,
    sink: Option<&'a dyn ExceptionSink>,
    started_at: Instant,
    polls: u64,
    acquired: bool,
}

impl<'a> LockAttempt<'a> {
    /// Start an attempt on a store key. The clock starts now.
    pub fn new(
        key: &'a str,
        timeout: Duration,
        retry_delay: Duration,
        sink: Option<&'a dyn ExceptionSink>,
    ) -> Self {
        Self {
            key,
            timeout,
            retry_delay,
            sink,
            started_at: Instant::now(),
            polls: 0,
            acquired: false,
        }
    }

    /// Drive the attempt to completion. Returns whether the key was claimed.
    pub fn run<S>(&mut self, store: &S, cancel: &CancelSignal) -> bool
    where
        S: StoreConnection + ?Sized,
    {
        loop {
            if cancel.is_cancelled() {
                debug!(key = self.key, polls = self.polls, "lock attempt cancelled");
                return false;
            }
            if self.started_at.elapsed() >= self.timeout {
                debug!(key = self.key, polls = self.polls, "lock attempt timed out");
                return false;
            }

            self.polls = self.polls.saturating_add(1);
            match store.try_acquire(self.key, self.timeout) {
                Ok(true) => {
                    self.acquired = true;
                    return true;
                }
                Ok(false) => {
                    debug!(key = self.key, poll = self.polls, "lock is held, retrying");
                }
                Err(e) => {
                    warn!(key = self.key, poll = self.polls, error = %e, "store error while acquiring lock");
                    if let Some(sink) = self.sink {
                        sink.notify(&e);
                    }
                }
            }

            cancel.wait_timeout(self.retry_delay);
        }
    }

    /// Whether the attempt ended with a claim.
    pub fn acquired(&self) -> bool {
        self.acquired
    }

    /// Number of claim round-trips made so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }
}
