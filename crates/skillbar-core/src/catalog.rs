//! Skill catalog loading
//!
//! The catalog is the read-only skill list the launcher works on, supplied
//! as a `SkillConfig` file (JSON, or YAML for `.yaml`/`.yml`).

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use skillbar_types::{Skill, SkillConfig};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Catalog file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// `skills.json`
    Json,
    /// `skills.yaml` / `skills.yml`
    Yaml,
}

impl CatalogFormat {
    /// Pick the format from the file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Load the skill list from `path`
///
/// A missing file is an empty catalog.
pub fn load_catalog(path: &Path) -> Result<Vec<Skill>> {
    if !path.exists() {
        warn!("Skill catalog not found: {:?}", path);
        return Ok(Vec::new());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let skills = parse_catalog(&content, CatalogFormat::from_path(path))
        .with_context(|| format!("Failed to parse skill catalog {:?}", path))?;

    info!("Loaded {} skills from {:?}", skills.len(), path);
    Ok(skills)
}

/// Parse catalog text and normalise its entries
pub fn parse_catalog(content: &str, format: CatalogFormat) -> Result<Vec<Skill>> {
    let config: SkillConfig = match format {
        CatalogFormat::Json => serde_json::from_str(content)?,
        CatalogFormat::Yaml => serde_yaml::from_str(content)?,
    };

    if let Some(version) = &config.version {
        debug!("Skill catalog version {}", version);
    }

    normalize(config.skills)
}

/// Drop unnamed and duplicate entries, keeping supplied order
fn normalize(skills: Vec<Skill>) -> Result<Vec<Skill>> {
    // Lowercase letters, numbers and hyphens, optionally behind a `/`
    let name_re = Regex::new(r"^/?[a-z0-9-]+$")
        .map_err(|e| anyhow!("Failed to compile name validation regex: {}", e))?;

    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(skills.len());

    for skill in skills {
        if skill.name.trim().is_empty() {
            warn!("Skipping skill without a name");
            continue;
        }

        if !seen.insert(skill.name.clone()) {
            warn!("Skipping duplicate skill '{}'", skill.name);
            continue;
        }

        if !name_re.is_match(&skill.name) {
            debug!(
                "Skill name '{}' is not lowercase letters, numbers and hyphens",
                skill.name
            );
        }

        kept.push(skill);
    }

    Ok(kept)
}
