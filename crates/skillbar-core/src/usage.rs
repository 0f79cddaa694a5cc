//! Usage history store
//!
//! Owns the only mutable shared state of the core: the per-skill usage map.
//! Lifecycle is `load` -> `record_usage` -> `persist`/`sync`. Every write
//! payload is computed from the map at the moment the write starts, and
//! durable backends merge per record (newer `last_used` wins, then the
//! higher count) instead of replacing the whole history.

use async_trait::async_trait;
use skillbar_types::{Skill, UsageRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One hour in milliseconds; the bonus each additional use is worth
pub const HOUR_MS: i64 = 3_600_000;

/// Window during which a skill counts as recently used (two days)
pub const RECENT_THRESHOLD_MS: i64 = 2 * 24 * 60 * 60 * 1000;

type UsageMap = HashMap<String, UsageRecord>;

/// Durable storage for usage records
#[async_trait]
pub trait UsageStorage: Send + Sync {
    /// Read every stored record. An absent store is an empty history.
    async fn load(&self) -> anyhow::Result<Vec<UsageRecord>>;

    /// Merge `records` into the store, per record
    async fn save(&self, records: &[UsageRecord]) -> anyhow::Result<()>;
}

/// Current wall clock in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Recency-plus-frequency score: `last_used + count * HOUR_MS`
///
/// Records with a missing field score `0`.
pub fn score(record: &UsageRecord) -> i64 {
    match (record.last_used, record.count) {
        (Some(last_used), Some(count)) => {
            last_used.saturating_add(i64::from(count).saturating_mul(HOUR_MS))
        }
        _ => 0,
    }
}

/// Whether `incoming` replaces `existing` during a per-record merge
///
/// Newer `last_used` wins; on equal timestamps the higher count wins, so
/// two uses within the same millisecond are never rolled back.
pub fn supersedes(incoming: &UsageRecord, existing: &UsageRecord) -> bool {
    match (incoming.last_used, existing.last_used) {
        (Some(new), Some(old)) if new == old => {
            incoming.count.unwrap_or(0) >= existing.count.unwrap_or(0)
        }
        (Some(new), Some(old)) => new > old,
        (None, Some(_)) => false,
        _ => true,
    }
}

/// Merge `incoming` into `base`, keyed by name, keeping `base` order
///
/// New names are appended in `incoming` order.
pub fn merge_records(
    base: Vec<UsageRecord>,
    incoming: impl IntoIterator<Item = UsageRecord>,
) -> Vec<UsageRecord> {
    let mut merged: Vec<UsageRecord> = Vec::with_capacity(base.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in base.into_iter().chain(incoming) {
        match index.get(&record.name) {
            Some(&at) => {
                if supersedes(&record, &merged[at]) {
                    merged[at] = record;
                }
            }
            None => {
                index.insert(record.name.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

/// In-memory usage cache backed by optional durable storage
pub struct UsageStore {
    records: watch::Sender<UsageMap>,
    storage: Option<Arc<dyn UsageStorage>>,
}

impl UsageStore {
    /// Store without durable backing
    pub fn in_memory() -> Self {
        Self {
            records: watch::Sender::new(UsageMap::new()),
            storage: None,
        }
    }

    /// In-memory store seeded with `records`
    pub fn with_records(records: impl IntoIterator<Item = UsageRecord>) -> Self {
        let store = Self::in_memory();
        store.merge(records);
        store
    }

    /// Create a store over `storage` and merge in its current contents
    ///
    /// A failed read is logged and treated as an empty history.
    pub async fn load(storage: Arc<dyn UsageStorage>) -> Self {
        let store = Self {
            records: watch::Sender::new(UsageMap::new()),
            storage: Some(Arc::clone(&storage)),
        };

        match storage.load().await {
            Ok(records) if records.is_empty() => info!("No usage history found"),
            Ok(records) => {
                info!("Loaded {} usage records", records.len());
                store.merge(records);
            }
            Err(e) => warn!("Failed to load usage history, starting empty: {:#}", e),
        }

        store
    }

    /// Record one execution of `name` at the current time
    pub fn record_usage(&self, name: &str) {
        self.record_usage_at(name, now_ms());
    }

    /// Record one execution of `name` at `now` (milliseconds)
    pub fn record_usage_at(&self, name: &str, now: i64) {
        self.records.send_modify(|records| {
            records
                .entry(name.to_string())
                .and_modify(|record| {
                    record.count = Some(record.count.unwrap_or(0).saturating_add(1));
                    record.last_used = Some(now);
                })
                .or_insert_with(|| UsageRecord::first_use(name, now));
        });
        debug!("Recorded usage of '{}'", name);
    }

    /// Reconcile `records` into memory, per record
    pub fn merge(&self, records: impl IntoIterator<Item = UsageRecord>) {
        let records: Vec<UsageRecord> = records.into_iter().collect();
        self.records.send_if_modified(|current| {
            let mut changed = false;
            for record in records {
                let replace = current
                    .get(&record.name)
                    .map_or(true, |existing| {
                        existing != &record && supersedes(&record, existing)
                    });
                if replace {
                    current.insert(record.name.clone(), record);
                    changed = true;
                }
            }
            changed
        });
    }

    /// Order skills for display
    ///
    /// Skills with a record come first, by descending score; skills without
    /// one follow in input order. Ties keep input order.
    pub fn sorted_skills<'a, I>(&self, skills: I) -> Vec<&'a Skill>
    where
        I: IntoIterator<Item = &'a Skill>,
    {
        let records = self.records.borrow();
        let (mut used, unused): (Vec<_>, Vec<_>) = skills
            .into_iter()
            .map(|skill| (skill, records.get(&skill.name).map(score)))
            .partition(|(_, score)| score.is_some());

        used.sort_by(|(_, a), (_, b)| b.cmp(a));
        used.into_iter()
            .chain(unused)
            .map(|(skill, _)| skill)
            .collect()
    }

    /// Used within the last two days
    pub fn is_recent(&self, name: &str) -> bool {
        self.is_recent_at(name, now_ms())
    }

    /// Used within the two days before `now`
    pub fn is_recent_at(&self, name: &str, now: i64) -> bool {
        self.records.borrow().get(name).is_some_and(|record| {
            record.is_well_formed()
                && record
                    .last_used
                    .is_some_and(|last_used| now.saturating_sub(last_used) < RECENT_THRESHOLD_MS)
        })
    }

    /// Record for `name`, if the skill was ever executed
    pub fn record(&self, name: &str) -> Option<UsageRecord> {
        self.records.borrow().get(name).cloned()
    }

    /// All records, sorted by name
    pub fn snapshot(&self) -> Vec<UsageRecord> {
        let mut records: Vec<UsageRecord> = self.records.borrow().values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Number of skills with history
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// No history at all
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Write the current map to durable storage
    ///
    /// On failure the in-memory state stays authoritative.
    pub async fn persist(&self) -> anyhow::Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let payload = self.snapshot();
        storage.save(&payload).await?;
        debug!("Persisted {} usage records", payload.len());
        Ok(())
    }

    /// Persist, then merge durable state back in
    pub async fn sync(&self) -> anyhow::Result<()> {
        self.persist().await?;

        if let Some(storage) = &self.storage {
            let durable = storage.load().await?;
            self.merge(durable);
        }

        Ok(())
    }

    /// Spawn a task that writes the latest map after every change
    ///
    /// Bursts of changes coalesce into one write of the newest state. The
    /// task ends when the store is dropped. Returns `None` without storage.
    pub fn spawn_persister(&self) -> Option<JoinHandle<()>> {
        let storage = Arc::clone(self.storage.as_ref()?);
        let mut changes = self.records.subscribe();

        Some(tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let payload: Vec<UsageRecord> =
                    changes.borrow_and_update().values().cloned().collect();

                if let Err(e) = storage.save(&payload).await {
                    warn!("Failed to save usage history: {:#}", e);
                }
            }
            debug!("Usage persister stopped");
        }))
    }
}

impl Default for UsageStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for UsageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageStore")
            .field("records", &self.len())
            .field("durable", &self.storage.is_some())
            .finish()
    }
}
