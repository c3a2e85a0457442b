use crate::error::StoreError;
use crate::store::StoreConnection;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};
use std::time::Duration;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Store double that replays scripted claim results and counts calls.
///
/// Each `try_acquire` pops the next scripted response; once the script runs
/// out, every claim returns `fallback`.
pub(crate) struct ScriptedStore {
    responses: Mutex<VecDeque<Result<bool, String>>>,
    fallback: bool,
    fail_release: bool,
    release_delay: Duration,
    acquire_calls: AtomicUsize,
    release_calls: AtomicUsize,
    acquired_keys: Mutex<Vec<String>>,
    released_keys: Mutex<Vec<String>>,
}

impl ScriptedStore {
    pub(crate) fn always(claimed: bool) -> Self {
        Self::scripted(Vec::new(), claimed)
    }

    pub(crate) fn scripted(responses: Vec<Result<bool, &str>>, fallback: bool) -> Self {
        Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| r.map_err(str::to_string))
                    .collect(),
            ),
            fallback,
            fail_release: false,
            release_delay: Duration::ZERO,
            acquire_calls: AtomicUsize::new(0),
            release_calls: AtomicUsize::new(0),
            acquired_keys: Mutex::new(Vec::new()),
            released_keys: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    pub(crate) fn slow_release(mut self, delay: Duration) -> Self {
        self.release_delay = delay;
        self
    }

    pub(crate) fn acquire_calls(&self) -> usize {
        self.acquire_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn acquired_keys(&self) -> Vec<String> {
        self.acquired_keys.lock().unwrap().clone()
    }

    pub(crate) fn released_keys(&self) -> Vec<String> {
        self.released_keys.lock().unwrap().clone()
    }
}

impl StoreConnection for ScriptedStore {
    fn try_acquire(&self, key: &str, _ttl: Duration) -> Result<bool, StoreError> {
        self.acquire_calls.fetch_add(1, Ordering::SeqCst);
        self.acquired_keys.lock().unwrap().push(key.to_string());

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(claimed)) => Ok(claimed),
            Some(Err(message)) => Err(StoreError::Backend(message)),
            None => Ok(self.fallback),
        }
    }

    fn release(&self, key: &str) -> Result<(), StoreError> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        if !self.release_delay.is_zero() {
            std::thread::sleep(self.release_delay);
        }
        self.released_keys.lock().unwrap().push(key.to_string());

        if self.fail_release {
            return Err(StoreError::Backend("release refused".to_string()));
        }
        Ok(())
    }
}

/// Exception sink that records every error message it is shown.
pub(crate) fn recording_sink() -> (
    Arc<Mutex<Vec<String>>>,
    impl Fn(&StoreError) + Send + Sync + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = seen.clone();
    let sink = move |error: &StoreError| sink_seen.lock().unwrap().push(error.to_string());
    (seen, sink)
}
