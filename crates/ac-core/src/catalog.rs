use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::CoreError;
use crate::options::AUTO_LABEL;

/// Source of truth for the sinks and devices currently available.
///
/// Implémenté par : `StaticCatalog` (ici), `CpalCatalog` (ac-audio).
///
/// Every call is a synchronous snapshot. An unknown sink yields an empty list,
/// never an error: failures are reported at the source, not substituted by callers.
///
/// # Example
/// ```
/// use ac_core::catalog::DeviceCatalog;
///
/// struct Silent;
/// impl DeviceCatalog for Silent {
///     fn list_sinks(&self) -> Vec<String> { Vec::new() }
///     fn list_devices_for_sink(&self, _sink_id: &str) -> Vec<String> { Vec::new() }
///     fn list_input_devices(&self) -> Vec<String> { Vec::new() }
/// }
/// ```
pub trait DeviceCatalog {
    /// Sink identifiers, in enumeration order.
    fn list_sinks(&self) -> Vec<String>;

    /// Output device names exposed by `sink_id`, in enumeration order.
    fn list_devices_for_sink(&self, sink_id: &str) -> Vec<String>;

    /// Capture device names, in enumeration order.
    fn list_input_devices(&self) -> Vec<String>;
}

/// A sink and the devices it exposes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SinkEntry {
    pub id: String,
    #[serde(default)]
    pub devices: Vec<String>,
}

/// In-memory catalog, loadable from TOML.
///
/// ```toml
/// input_devices = ["USB Mic"]
///
/// [[sinks]]
/// id = "cubeb"
/// devices = ["Speakers", "Headphones"]
/// ```
///
/// The "auto" (or empty) sink id resolves to the first declared sink, which is
/// what an automatic backend choice ends up opening.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pub sinks: Vec<SinkEntry>,
    #[serde(default)]
    pub input_devices: Vec<String>,
}

impl StaticCatalog {
    /// Add a sink with its devices.
    #[must_use]
    pub fn with_sink<I, S>(mut self, id: &str, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sinks.push(SinkEntry {
            id: id.to_string(),
            devices: devices.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Replace the input device list.
    #[must_use]
    pub fn with_input_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_devices = devices.into_iter().map(Into::into).collect();
        self
    }

    /// Reject sink ids that would collide with the synthetic "auto" entry.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for an empty or reserved sink id.
    pub fn validate(&self) -> Result<(), CoreError> {
        for sink in &self.sinks {
            if sink.id.is_empty() || sink.id == AUTO_LABEL {
                return Err(CoreError::Config(format!(
                    "identifiant de sink réservé : {:?}",
                    sink.id
                )));
            }
        }
        Ok(())
    }

    fn sink(&self, sink_id: &str) -> Option<&SinkEntry> {
        if sink_id.is_empty() || sink_id == AUTO_LABEL {
            self.sinks.first()
        } else {
            self.sinks.iter().find(|s| s.id == sink_id)
        }
    }
}

impl DeviceCatalog for StaticCatalog {
    fn list_sinks(&self) -> Vec<String> {
        self.sinks.iter().map(|s| s.id.clone()).collect()
    }

    fn list_devices_for_sink(&self, sink_id: &str) -> Vec<String> {
        self.sink(sink_id)
            .map(|s| s.devices.clone())
            .unwrap_or_default()
    }

    fn list_input_devices(&self) -> Vec<String> {
        self.input_devices.clone()
    }
}

/// Charge un catalogue statique depuis un fichier TOML.
///
/// # Errors
/// Returns [`CoreError::FileNotFound`] if `path` does not exist, or an error if
/// the file cannot be read, parsed, or declares a reserved sink id.
pub fn load_catalog(path: &Path) -> Result<StaticCatalog> {
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let catalog: StaticCatalog = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;
    catalog.validate()?;
    log::debug!(
        "Catalogue chargé : {} sinks, {} entrées micro",
        catalog.sinks.len(),
        catalog.input_devices.len()
    );
    Ok(catalog)
}
