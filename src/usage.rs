//! Usage ledger and per-tier monthly limits
//!
//! Recording is best effort: [`UsageRecorder::record`] never blocks and never fails the
//! caller, and a generation's outcome never depends on whether its record was written.

use crate::cache::TtlCache;
use crate::pipeline::Mode;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Limit applied to tiers the limit table does not know
pub const DEFAULT_MONTHLY_LIMIT: i64 = 5;
/// Limit value meaning "no cap"
pub const UNLIMITED: i64 = -1;

pub const GENERATION_ACTION: &str = "generation";
const IDEA_SUMMARY_CHARS: usize = 200;
const TIER_CACHE_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Failed to read usage log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Monthly generation limit reached for tier '{tier}' ({used}/{limit})")]
    LimitReached { tier: String, used: usize, limit: i64 },
}

/// One ledger line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub action: String,
    pub idea_summary: String,
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

impl UsageEvent {
    pub fn generation(
        user_id: impl Into<String>,
        idea: &str,
        mode: Mode,
        tool: Option<&str>,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            user_id: user_id.into(),
            action: GENERATION_ACTION.to_string(),
            idea_summary: idea.chars().take(IDEA_SUMMARY_CHARS).collect(),
            mode,
            tool: tool.map(str::to_string),
        }
    }
}

/// Source of monthly generation limits per tier
pub trait TierLimits: Send + Sync {
    /// `None` for tiers the source does not know
    fn limit_for(&self, tier: &str) -> Option<i64>;
}

#[derive(Debug, Clone)]
pub struct StaticTierLimits {
    limits: HashMap<String, i64>,
}

impl StaticTierLimits {
    pub fn new(limits: impl IntoIterator<Item = (String, i64)>) -> Self {
        Self {
            limits: limits.into_iter().collect(),
        }
    }
}

impl Default for StaticTierLimits {
    fn default() -> Self {
        Self::new([
            ("free".to_string(), 5),
            ("pro".to_string(), 100),
            ("team".to_string(), UNLIMITED),
        ])
    }
}

impl TierLimits for StaticTierLimits {
    fn limit_for(&self, tier: &str) -> Option<i64> {
        self.limits.get(tier).copied()
    }
}

/// Decides whether a caller may start another generation this month
pub struct UsageGate {
    limits: Arc<dyn TierLimits>,
    cache: TtlCache<String, i64>,
}

impl UsageGate {
    pub fn new(limits: Arc<dyn TierLimits>, ttl: Duration) -> Self {
        Self {
            limits,
            cache: TtlCache::new(TIER_CACHE_CAPACITY, ttl),
        }
    }

    pub fn limit_for(&self, tier: &str) -> i64 {
        let key = tier.trim().to_lowercase();
        if let Some(limit) = self.cache.get(&key) {
            return limit;
        }
        let limit = self.limits.limit_for(&key).unwrap_or_else(|| {
            debug!(tier = %key, "Unknown tier, applying default limit");
            DEFAULT_MONTHLY_LIMIT
        });
        self.cache.insert(key, limit);
        limit
    }

    pub fn allows(&self, tier: &str, used: usize) -> bool {
        let limit = self.limit_for(tier);
        limit == UNLIMITED || (used as i64) < limit
    }
}

/// Non-blocking front of the background ledger writer
#[derive(Debug, Clone)]
pub struct UsageRecorder {
    sender: mpsc::Sender<UsageEvent>,
}

impl UsageRecorder {
    /// Starts the writer task appending to `path`
    ///
    /// The task ends once every recorder clone is dropped and the queue has drained.
    pub fn spawn(path: PathBuf, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(write_events(path, receiver));
        (Self { sender }, handle)
    }

    /// Queues `event`; returns false when it was dropped
    pub fn record(&self, event: UsageEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                debug!(user = %event.user_id, "Usage queue full, dropping record");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                debug!(user = %event.user_id, "Usage writer stopped, dropping record");
                false
            }
        }
    }
}

async fn write_events(path: PathBuf, mut receiver: mpsc::Receiver<UsageEvent>) {
    while let Some(event) = receiver.recv().await {
        if let Err(e) = append_event(&path, &event).await {
            warn!("Failed to write usage record to {}: {}", path.display(), e);
        }
    }
    debug!("Usage writer finished");
}

async fn append_event(path: &Path, event: &UsageEvent) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut line = serde_json::to_string(event).map_err(std::io::Error::other)?;
    line.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

/// Read side of the JSONL ledger
pub struct UsageLog;

impl UsageLog {
    /// Generations by `user_id` since the start of `now`'s UTC month
    ///
    /// A missing ledger counts as zero; unparseable lines are skipped.
    pub async fn monthly_count(
        path: &Path,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, UsageError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(UsageError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let month_start = month_start(now);
        let count = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<UsageEvent>(line) {
                Ok(event) => Some(event),
                Err(e) => {
                    debug!("Skipping unreadable usage line: {}", e);
                    None
                }
            })
            .filter(|event| {
                event.user_id == user_id
                    && event.action == GENERATION_ACTION
                    && event.created_at >= month_start
            })
            .count();
        Ok(count)
    }
}

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
