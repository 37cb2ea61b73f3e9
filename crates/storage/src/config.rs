use std::{fs, path::Path};

use anyhow::Context;
use log::info;
use vigor_domain as domain;

/// Read a scoring configuration from a JSON file.
///
/// Without a path the built-in reference configuration is used.
pub fn load(path: Option<&Path>) -> anyhow::Result<domain::ScoringConfig> {
    let Some(path) = path else {
        return Ok(domain::DEFAULT.clone());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = domain::ScoringConfig::from_json(&json)
        .with_context(|| format!("invalid scoring configuration in {}", path.display()))?;
    info!(
        "loaded {} categories from {}",
        config.catalog().categories().len(),
        path.display()
    );
    Ok(config)
}
