use crate::Result;
use crate::fields::{CostFormat, FieldRegistry};
use crate::usage::{DEFAULT_VOLUME_TYPE_NAME, Definition, FieldValue, Item, VolumeTypeCatalog};
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;

/// The default configuration YAML content, embedded from `default_config.yml`
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../default_config.yml");

/// File names tried, in order, when no configuration path is given
const CANDIDATE_FILE_NAMES: &[&str] = &["usage.toml", "usage.yml", "usage.yaml", "usage.json"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Fields making up the report, in column order
    #[serde(default)]
    pub columns: Vec<String>,

    /// Volume type name reported when a reading carries no volume type
    #[serde(default = "default_volume_type")]
    pub default_volume_type: String,

    /// Report definition shared by every row
    #[serde(default)]
    pub definition: Definition,

    /// Per-meter items, matched to readings through their `meter_name`
    #[serde(default)]
    pub items: Vec<Item>,

    /// Volume type names keyed by volume type id
    #[serde(default)]
    pub volume_types: BTreeMap<String, String>,
}

fn default_volume_type() -> String {
    DEFAULT_VOLUME_TYPE_NAME.to_string()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Returns the configuration together with any validation warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(workspace_root: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<(Self, Vec<String>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading usage configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let mut found = None;
            for name in CANDIDATE_FILE_NAMES {
                let path = workspace_root.join(name);
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        found = Some((path, text));
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_app_err_with(|| format!("reading usage configuration from {path}")),
                }
            }

            let Some(result) = found else {
                let config = Self::default();
                let warnings = config.validate();
                return Ok((config, warnings));
            };
            result
        };

        let config = Self::parse(&final_path, &text)?;
        let warnings = config.validate();
        Ok((config, warnings))
    }

    fn parse(path: &Utf8Path, text: &str) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        let config = match extension {
            "toml" => toml::from_str(text).into_app_err_with(|| format!("parsing TOML configuration from {path}"))?,
            "yml" | "yaml" => serde_yaml::from_str(text).into_app_err_with(|| format!("parsing YAML configuration from {path}"))?,
            "json" => serde_json::from_str(text).into_app_err_with(|| format!("parsing JSON configuration from {path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Save the default configuration to a file
    ///
    /// YAML output is the embedded `default_config.yml` verbatim, comments included. Other
    /// formats are serialized from the parsed default.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        if matches!(extension, "yml" | "yaml") {
            fs::write(output_path, DEFAULT_CONFIG_YAML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
            Ok(())
        } else {
            Self::default().save(output_path)
        }
    }

    /// The item pricing `meter_name`, if any.
    #[must_use]
    pub fn item_for_meter(&self, meter_name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.get_str("meter_name") == Some(meter_name))
    }

    #[must_use]
    pub fn volume_type_catalog(&self) -> VolumeTypeCatalog {
        let names = self.volume_types.iter().map(|(id, name)| (id.clone(), name.clone())).collect();
        VolumeTypeCatalog::new(names, self.default_volume_type.as_str())
    }

    /// A registry whose `volume_type` field uses the configured names.
    #[must_use]
    pub fn registry(&self) -> FieldRegistry {
        FieldRegistry::new(self.volume_type_catalog())
    }

    /// Detect settings that would silently produce empty or broken columns
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let registry = FieldRegistry::default();

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !registry.contains(column) {
                warnings.push(format!("column '{column}' does not name a known field"));
            }
            if !seen.insert(column.as_str()) {
                warnings.push(format!("column '{column}' appears more than once"));
            }
        }

        match self.definition.get("cost_format") {
            Some(FieldValue::String(template)) => {
                if let Err(e) = CostFormat::parse(template) {
                    warnings.push(format!("definition: {e}"));
                }
            }
            Some(other) => warnings.push(format!("definition: cost_format must be a string, got '{other}'")),
            None => {}
        }

        let mut meters = HashSet::new();
        for (index, item) in self.items.iter().enumerate() {
            match item.get_str("meter_name") {
                Some(meter) => {
                    if !meters.insert(meter) {
                        warnings.push(format!("item #{}: meter '{meter}' is already priced by an earlier item", index + 1));
                    }
                }
                None => warnings.push(format!("item #{}: no meter_name, the item can never be selected", index + 1)),
            }

            if let Some(rate) = item.get("item_rate")
                && rate.as_number().is_none()
            {
                warnings.push(format!("item #{}: item_rate '{rate}' is not a number", index + 1));
            }
        }

        warnings
    }
}

impl Default for Config {
    fn default() -> Self {
        serde_yaml::from_str(DEFAULT_CONFIG_YAML).expect("default_config.yml should be valid YAML that deserializes to Config")
    }
}
