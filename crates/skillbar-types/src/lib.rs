//! Skillbar Types - Core types for the skillbar launcher
//!
//! This module defines the data model shared by the launcher core, the
//! persistence backends and the binary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod error;
pub mod events;

pub use error::{GatewayError, LauncherError};
pub use events::{Invocation, KeyAction, LauncherOutcome};

/// A named, user-invokable command/prompt template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    /// Unique, stable key
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque invocation template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<String>,
    /// "project" or "user"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
}

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Name shown in listings, falling back to the key
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Catalog file structure: `{ "version": "1", "skills": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

// ============================================================================
// Input classification
// ============================================================================

/// Classification of user intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Fuzzy lookup over names
    #[default]
    Search,
    /// `/name` - invoke by exact or prefix name
    Direct,
    /// `/name task text` - invoke with a trailing parameter
    Task,
}

/// Structured intent derived from the raw input text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInput {
    pub mode: InputMode,
    pub skill_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
}

impl ParsedInput {
    pub fn search() -> Self {
        Self::default()
    }

    pub fn direct(skill_name: impl Into<String>) -> Self {
        Self {
            mode: InputMode::Direct,
            skill_name: skill_name.into(),
            task: None,
        }
    }

    pub fn task(skill_name: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            mode: InputMode::Task,
            skill_name: skill_name.into(),
            task: Some(task.into()),
        }
    }
}

// ============================================================================
// Usage history
// ============================================================================

/// Invocation history for one skill
///
/// Fields that are missing or non-numeric in durable storage load as `None`
/// instead of failing the whole file. Such records score lowest and are
/// never considered recent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub name: String,
    /// Milliseconds since the Unix epoch
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_used: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u32>,
}

impl UsageRecord {
    /// First execution of a skill
    pub fn first_use(name: impl Into<String>, now_ms: i64) -> Self {
        Self {
            name: name.into(),
            last_used: Some(now_ms),
            count: Some(1),
        }
    }

    pub fn new(name: impl Into<String>, last_used: i64, count: u32) -> Self {
        Self {
            name: name.into(),
            last_used: Some(last_used),
            count: Some(count),
        }
    }

    /// Both numeric fields are present
    pub fn is_well_formed(&self) -> bool {
        self.last_used.is_some() && self.count.is_some()
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|c| u32::try_from(c).ok())
            .filter(|c| *c >= 1),
        _ => None,
    })
}
