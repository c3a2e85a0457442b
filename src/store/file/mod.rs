//! Lock-file store.
//!
//! Each claimed key is a file `<encoded key>.lock` inside one directory; the
//! file body is the JSON [`ClaimRecord`] of the claimant.
//!
//! # Guard files
//!
//! Every claim and release of a key runs while holding an exclusive advisory
//! lock (`fs2`) on the key's `<encoded key>.guard` file. Checking an existing
//! claim, removing it once expired, and creating the new claim therefore
//! happen as one step with respect to every other claimant, in this process
//! or any other. Guard files are never deleted: removing one while another
//! claimant waits on it would let two claimants lock different inodes.
//!
//! # Expiry
//!
//! The filesystem has no native expiry, so a claim past its `expires_at` is
//! removed by the next claimant before it writes its own.
//!
//! A file that cannot be parsed (a claimant crashed between creating and
//! writing it) is treated as live until its modification time is older than
//! the claimant's ttl.

mod naming;


use super::StoreConnection;
use super::record::ClaimRecord;
use crate::error::StoreError;
use fs2::FileExt;
use naming::{GUARD_EXTENSION, LOCK_EXTENSION, decode_key, encode_key};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// A claim found in a [`FileStore`] directory.
#[derive(Debug, Clone)]
pub struct FileClaim {
    /// The store key (decoded from the file name).
    pub key: String,

    /// The lock file path.
    pub path: PathBuf,

    /// The claim record.
    pub record: ClaimRecord,

    /// Whether the claim has passed its expiry.
    pub is_expired: bool,
}

impl std::fmt::Display for FileClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (owner: {}, age: {}, expires: {})",
            self.key,
            self.record.owner,
            self.record.age_string(),
            self.record.remaining_string()
        )
    }
}

enum Staleness {
    Live,
    Stale,
    Gone,
}

/// Store backed by a directory of lock files.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first claim.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The locks directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the lock file for a store key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), LOCK_EXTENSION))
    }

    /// Read the claim on `key`, if a lock file exists.
    pub fn read(&self, key: &str) -> Result<Option<ClaimRecord>, StoreError> {
        match ClaimRecord::from_file(self.path_for(key)) {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List all claims in the directory, sorted by key.
    ///
    /// Files that are not lock files, or whose record cannot be parsed, are
    /// skipped.
    pub fn list(&self) -> Result<Vec<FileClaim>, StoreError> {
        let mut claims = Vec::new();

        if !self.dir.exists() {
            return Ok(claims);
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some(LOCK_EXTENSION) {
                continue;
            }

            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(decode_key)
            else {
                continue;
            };

            let record = match ClaimRecord::from_file(&path) {
                Ok(record) => record,
                Err(_) => continue,
            };

            let is_expired = record.is_expired();
            claims.push(FileClaim {
                key,
                path,
                record,
                is_expired,
            });
        }

        claims.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(claims)
    }

    /// Path of the guard file for a store key.
    fn guard_path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), GUARD_EXTENSION))
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        }
        Ok(())
    }

    /// Block until this caller holds the guard for `key`.
    fn lock_key(&self, key: &str) -> Result<KeyGuard, StoreError> {
        let path = self.guard_path_for(key);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| StoreError::io(&path, e))?;

        FileExt::lock_exclusive(&file).map_err(|e| StoreError::io(&path, e))?;
        Ok(KeyGuard { file })
    }

    fn staleness(&self, path: &Path, ttl: Duration) -> Result<Staleness, StoreError> {
        match ClaimRecord::from_file(path) {
            Ok(record) if record.is_expired() => Ok(Staleness::Stale),
            Ok(_) => Ok(Staleness::Live),
            Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(Staleness::Gone)
            }
            Err(StoreError::Record(_)) => {
                let modified = fs::metadata(path).and_then(|m| m.modified());
                match modified {
                    Ok(at) if at.elapsed().unwrap_or_default() > ttl => Ok(Staleness::Stale),
                    Ok(_) => Ok(Staleness::Live),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(Staleness::Gone),
                    Err(e) => Err(StoreError::io(path, e)),
                }
            }
            Err(e) => Err(e),
        }
    }
}

/// Exclusive hold on a key's guard file, released on drop.
struct KeyGuard {
    file: File,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Closing the file also releases the lock
        let _ = FileExt::unlock(&self.file);
    }
}

impl StoreConnection for FileStore {
    fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        if key.is_empty() {
            return Err(StoreError::Backend("lock key must not be empty".to_string()));
        }

        self.ensure_dir()?;
        let _guard = self.lock_key(key)?;
        let path = self.path_for(key);

        match self.staleness(&path, ttl)? {
            Staleness::Live => return Ok(false),
            Staleness::Gone => {}
            Staleness::Stale => {
                remove_if_present(&path)?;
                debug!(path = %path.display(), "removed expired claim");
            }
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                write_record(file, &path, &ClaimRecord::new(ttl))?;
                Ok(true)
            }
            // Only a writer that bypasses the guard can get here
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn release(&self, key: &str) -> Result<(), StoreError> {
        if !self.dir.exists() {
            return Ok(());
        }

        let _guard = self.lock_key(key)?;
        remove_if_present(&self.path_for(key))
    }
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn write_record(mut file: File, path: &Path, record: &ClaimRecord) -> Result<(), StoreError> {
    let written = record
        .to_json()
        .and_then(|json| file.write_all(json.as_bytes()).map_err(|e| StoreError::io(path, e)))
        .and_then(|()| file.sync_all().map_err(|e| StoreError::io(path, e)));

    if written.is_err() {
        // Clean up the half-written claim so it does not block others
        let _ = fs::remove_file(path);
    }

    written
}
