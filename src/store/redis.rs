//! Redis store.
//!
//! The claim runs as one server-side script so no other client can observe a
//! half-applied claim:
//!
//! ```text
//! if GET(K) then return 0
//! SET(K, owner)
//! EXPIRE(K, ttl_secs)
//! return 1
//! ```
//!
//! Release expires the key immediately; it does not check who set it.

use super::StoreConnection;
use super::record::owner_string;
use crate::error::StoreError;
use redis::{Client, Connection, Script};
use std::time::Duration;
use tracing::debug;

/// Default bound on connecting and on each read or write.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

const CLAIM_SCRIPT: &str = r"
local f, k, v = redis.call, KEYS[1], ARGV[1]
if f('get', k) then return 0 end
f('set', k, v)
f('expire', k, ARGV[2])
return 1
";

/// Store backed by a Redis server.
///
/// Every round-trip opens its own connection, so callers on different threads
/// never wait on each other inside the store. Connecting and each read or
/// write are bounded by the I/O timeout.
pub struct RedisStore {
    client: Client,
    owner: String,
    script: Script,
    io_timeout: Duration,
}

impl RedisStore {
    /// Create a store from a connection URL (e.g., `redis://127.0.0.1:6379`).
    ///
    /// No connection is made until the first round-trip.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            owner: owner_string(),
            script: Script::new(CLAIM_SCRIPT),
            io_timeout: DEFAULT_IO_TIMEOUT,
        })
    }

    /// Replace the bound on connecting and on each read or write.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    pub fn io_timeout(&self) -> Duration {
        self.io_timeout
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        debug!("opening redis connection");
        let conn = self.client.get_connection_with_timeout(self.io_timeout)?;
        conn.set_read_timeout(Some(self.io_timeout))?;
        conn.set_write_timeout(Some(self.io_timeout))?;
        Ok(conn)
    }
}

/// Redis expiry is whole seconds and `EXPIRE k 0` deletes the key, so a claim
/// always lives for at least one second.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

impl StoreConnection for RedisStore {
    fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut conn = self.connect()?;
        let claimed: i64 = self
            .script
            .key(key)
            .arg(&self.owner)
            .arg(ttl_secs(ttl))
            .invoke(&mut conn)?;
        Ok(claimed == 1)
    }

    fn release(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let _: i64 = redis::cmd("EXPIRE").arg(key).arg(0).query(&mut conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_is_floored_to_whole_seconds() {
        assert_eq!(ttl_secs(Duration::from_millis(2500)), 2);
        assert_eq!(ttl_secs(Duration::from_secs(30)), 30);
    }

    #[test]
    fn test_sub_second_ttl_is_kept_alive_one_second() {
        assert_eq!(ttl_secs(Duration::from_millis(10)), 1);
    }

    #[test]
    fn test_invalid_url_is_a_store_error() {
        assert!(RedisStore::open("not a url").is_err());
    }

    #[test]
    fn test_io_timeout_defaults_and_overrides() {
        let store = RedisStore::open("redis://127.0.0.1:6379").unwrap();
        assert_eq!(store.io_timeout(), DEFAULT_IO_TIMEOUT);

        let store = store.with_io_timeout(Duration::from_millis(250));
        assert_eq!(store.io_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_unreachable_server_is_a_store_error() {
        // Port 1 on loopback refuses connections
        let store = RedisStore::open("redis://127.0.0.1:1")
            .unwrap()
            .with_io_timeout(Duration::from_millis(200));

        assert!(store.try_acquire("LOCK_k", Duration::from_secs(1)).is_err());
        assert!(store.release("LOCK_k").is_err());
    }

    fn live_url() -> String {
        std::env::var("KEYLOCK_TEST_REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
    }

    #[test]
    #[ignore = "needs a running redis server (KEYLOCK_TEST_REDIS_URL)"]
    fn test_claim_release_reclaim_against_live_server() {
        let store = RedisStore::open(&live_url()).unwrap();
        let key = format!("LOCK_keylock-test-{}", std::process::id());
        store.release(&key).unwrap();

        assert!(store.try_acquire(&key, Duration::from_secs(30)).unwrap());
        assert!(!store.try_acquire(&key, Duration::from_secs(30)).unwrap());

        let mut conn = store.connect().unwrap();
        let value: String = redis::cmd("GET").arg(&key).query(&mut conn).unwrap();
        assert_eq!(value, owner_string());
        let ttl: i64 = redis::cmd("TTL").arg(&key).query(&mut conn).unwrap();
        assert!((1..=30).contains(&ttl));

        store.release(&key).unwrap();
        let exists: i64 = redis::cmd("EXISTS").arg(&key).query(&mut conn).unwrap();
        assert_eq!(exists, 0);

        assert!(store.try_acquire(&key, Duration::from_secs(30)).unwrap());
        store.release(&key).unwrap();
    }

    #[test]
    #[ignore = "needs a running redis server (KEYLOCK_TEST_REDIS_URL)"]
    fn test_sub_second_claim_expires_on_server() {
        let store = RedisStore::open(&live_url()).unwrap();
        let key = format!("LOCK_keylock-expiry-{}", std::process::id());
        store.release(&key).unwrap();

        assert!(store.try_acquire(&key, Duration::from_millis(10)).unwrap());
        std::thread::sleep(Duration::from_millis(1500));
        assert!(store.try_acquire(&key, Duration::from_millis(10)).unwrap());
        store.release(&key).unwrap();
    }
}
