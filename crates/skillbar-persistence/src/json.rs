//! `skill-usage.json` backend
//!
//! File format: `{ "usage": [ { "name": ..., "lastUsed": ..., "count": ... } ] }`

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skillbar_core::usage::merge_records;
use skillbar_core::UsageStorage;
use skillbar_types::UsageRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct UsageData<'a> {
    usage: &'a [UsageRecord],
}

#[derive(Debug, Default, Deserialize)]
struct RawUsageData {
    #[serde(default)]
    usage: Vec<serde_json::Value>,
}

/// Usage storage in a JSON file, replaced atomically on every save
pub struct JsonUsageStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonUsageStorage {
    /// Storage backed by the file at `path` (created on first save)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<UsageRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Usage file {:?} does not exist yet", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", self.path)),
        };

        let data: RawUsageData = match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(e) => {
                warn!("Ignoring malformed usage file {:?}: {}", self.path, e);
                return Ok(Vec::new());
            }
        };

        let records = data
            .usage
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<UsageRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Skipping unreadable usage entry: {}", e);
                    None
                }
            })
            .collect();

        Ok(records)
    }

    async fn write_records(&self, records: &[UsageRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }

        let json = serde_json::to_vec_pretty(&UsageData { usage: records })?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("Failed to write {:?}", tmp_path))?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to replace {:?}", self.path));
        }

        Ok(())
    }
}

#[async_trait]
impl UsageStorage for JsonUsageStorage {
    async fn load(&self) -> Result<Vec<UsageRecord>> {
        self.read_records().await
    }

    async fn save(&self, records: &[UsageRecord]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let existing = self.read_records().await?;
        let merged = merge_records(existing, records.iter().cloned());
        self.write_records(&merged).await?;

        debug!("Saved {} usage records to {:?}", merged.len(), self.path);
        Ok(())
    }
}
