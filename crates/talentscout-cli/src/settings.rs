//! The config file: optional `screening:` and `runtime:` sections.

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;
use std::path::Path;

use talentscout_core::ScreeningConfig;
use talentscout_runtime::RuntimeConfig;

const SECTIONS: [&str; 2] = ["screening", "runtime"];

#[derive(Debug, Default)]
pub struct Settings {
    pub screening: ScreeningConfig,
    pub runtime: RuntimeConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let document: JsonValue = serde_yaml::from_str(raw).context("config is not valid YAML")?;
        let sections = match &document {
            JsonValue::Null => return Ok(Self::default()),
            JsonValue::Object(sections) => sections,
            _ => bail!("config must be a mapping with 'screening' and/or 'runtime' sections"),
        };

        if let Some(unknown) = sections.keys().find(|k| !SECTIONS.contains(&k.as_str())) {
            bail!("unknown config section '{}'", unknown);
        }

        let screening = ScreeningConfig::from_value(
            sections.get("screening").cloned().unwrap_or(JsonValue::Null),
        )
        .context("invalid 'screening' section")?;

        let runtime = match sections.get("runtime") {
            None | Some(JsonValue::Null) => RuntimeConfig::default(),
            Some(value) => serde_json::from_value(value.clone())
                .context("invalid 'runtime' section")?,
        };
        runtime.validate().context("invalid 'runtime' section")?;

        Ok(Self { screening, runtime })
    }
}
