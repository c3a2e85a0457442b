//! Claim records: the value a backend writes under a claimed key.

use crate::error::StoreError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Who holds a claim and until when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Owner of the claim (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the claimant (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// When the claim was made (RFC3339).
    pub created_at: DateTime<Utc>,

    /// When the store treats the claim as released (RFC3339).
    pub expires_at: DateTime<Utc>,
}

impl ClaimRecord {
    /// Create a record for the current process that expires after `ttl`.
    pub fn new(ttl: std::time::Duration) -> Self {
        let created_at = Utc::now();
        let ttl = Duration::from_std(ttl).unwrap_or(Duration::MAX);
        Self {
            owner: owner_string(),
            pid: Some(std::process::id()),
            created_at,
            expires_at: created_at.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Parse a record from a lock file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Serialize the record to a JSON string.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Age of the claim.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        format_span(self.age())
    }

    /// Whether the claim has passed its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Time left before expiry, formatted; `"expired"` once it has passed.
    pub fn remaining_string(&self) -> String {
        let remaining = self.expires_at.signed_duration_since(Utc::now());
        if remaining <= Duration::zero() {
            "expired".to_string()
        } else {
            format_span(remaining)
        }
    }
}

fn format_span(span: Duration) -> String {
    let seconds = span.num_seconds();
    let minutes = span.num_minutes();
    let hours = span.num_hours();
    let days = span.num_days();

    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds.max(0))
    }
}

/// Identity written as the claim value.
pub fn owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
