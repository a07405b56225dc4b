use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::options::{AUTO_LABEL, DEFAULT_INPUT_LABEL};

/// Persisted audio settings.
///
/// Plain data, read fully by [`ConfigBinder::load`](crate::binder::ConfigBinder::load)
/// and written fully by [`ConfigBinder::apply`](crate::binder::ConfigBinder::apply).
///
/// # Example
/// ```
/// use ac_core::settings::{EmulationMode, SettingsRecord};
/// let settings = SettingsRecord::default();
/// assert_eq!(settings.sink_id, "auto");
/// assert_eq!(settings.emulation_mode(), EmulationMode::Hle);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SettingsRecord {
    /// Output sink id. Empty or "auto" means no explicit preference.
    pub sink_id: String,
    /// Output device name, scoped to `sink_id`.
    pub audio_device_id: String,
    pub enable_audio_stretching: bool,
    /// Output volume [0.0, 1.0].
    pub volume: f32,
    pub enable_dsp_lle: bool,
    /// Only meaningful when `enable_dsp_lle` is set.
    pub enable_dsp_lle_multithread: bool,
    /// Index into [`INPUT_TYPE_LABELS`](crate::presentation::INPUT_TYPE_LABELS).
    pub mic_input_type: u32,
    /// Free-text capture device name.
    pub mic_input_device: String,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            sink_id: AUTO_LABEL.to_string(),
            audio_device_id: AUTO_LABEL.to_string(),
            enable_audio_stretching: true,
            volume: 1.0,
            enable_dsp_lle: false,
            enable_dsp_lle_multithread: false,
            mic_input_type: 0,
            mic_input_device: DEFAULT_INPUT_LABEL.to_string(),
        }
    }
}

/// DSP emulation mode, persisted as two booleans.
///
/// | mode           | index | `enable_dsp_lle` | `enable_dsp_lle_multithread` |
/// |----------------|-------|------------------|------------------------------|
/// | `Hle`          | 0     | false            | false                        |
/// | `Lle`          | 1     | true             | false                        |
/// | `LleMultiCore` | 2     | true             | true                         |
///
/// The fourth combination (`false`, `true`) never comes out of [`to_flags`](Self::to_flags)
/// and decodes as `Hle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum EmulationMode {
    /// High-level emulation (fast).
    #[default]
    Hle,
    /// Low-level emulation (accurate).
    Lle,
    /// Low-level emulation on a dedicated thread.
    LleMultiCore,
}

impl EmulationMode {
    /// Decode the persisted flag pair.
    #[must_use]
    pub fn from_flags(lle: bool, multithread: bool) -> Self {
        match (lle, multithread) {
            (false, _) => Self::Hle,
            (true, false) => Self::Lle,
            (true, true) => Self::LleMultiCore,
        }
    }

    /// Encode as `(enable_dsp_lle, enable_dsp_lle_multithread)`.
    #[must_use]
    pub fn to_flags(self) -> (bool, bool) {
        let index = self.index();
        (index != 0, index == 2)
    }

    /// Position in [`EMULATION_LABELS`](crate::presentation::EMULATION_LABELS).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Hle => 0,
            Self::Lle => 1,
            Self::LleMultiCore => 2,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Hle),
            1 => Some(Self::Lle),
            2 => Some(Self::LleMultiCore),
            _ => None,
        }
    }
}

impl SettingsRecord {
    /// Decoded DSP emulation mode.
    #[must_use]
    pub fn emulation_mode(&self) -> EmulationMode {
        EmulationMode::from_flags(self.enable_dsp_lle, self.enable_dsp_lle_multithread)
    }

    /// Store `mode` as its flag pair.
    pub fn set_emulation_mode(&mut self, mode: EmulationMode) {
        (self.enable_dsp_lle, self.enable_dsp_lle_multithread) = mode.to_flags();
    }
}

/// Structure TOML intermédiaire : la section `[audio]` est optionnelle.
#[derive(Deserialize)]
struct SettingsFile {
    audio: Option<AudioSection>,
}

/// `[audio]` section, all fields optional for partial override.
#[derive(Deserialize)]
struct AudioSection {
    sink_id: Option<String>,
    audio_device_id: Option<String>,
    enable_audio_stretching: Option<bool>,
    volume: Option<f32>,
    enable_dsp_lle: Option<bool>,
    enable_dsp_lle_multithread: Option<bool>,
    mic_input_type: Option<u32>,
    mic_input_device: Option<String>,
}

#[derive(Serialize)]
struct SettingsFileRef<'a> {
    audio: &'a SettingsRecord,
}

/// Parse settings TOML and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for the `[audio]` schema.
pub fn parse_settings(content: &str) -> Result<SettingsRecord> {
    let file: SettingsFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut settings = SettingsRecord::default();
    let Some(a) = file.audio else {
        return Ok(settings);
    };

    if let Some(v) = a.sink_id {
        settings.sink_id = v;
    }
    if let Some(v) = a.audio_device_id {
        settings.audio_device_id = v;
    }
    if let Some(v) = a.enable_audio_stretching {
        settings.enable_audio_stretching = v;
    }
    if let Some(v) = a.volume {
        if !(0.0..=1.0).contains(&v) {
            log::warn!("Volume hors limites ({v}), sera ramené dans [0, 1] au chargement");
        }
        settings.volume = v;
    }
    if let Some(v) = a.enable_dsp_lle {
        settings.enable_dsp_lle = v;
    }
    if let Some(v) = a.enable_dsp_lle_multithread {
        settings.enable_dsp_lle_multithread = v;
    }
    if let Some(v) = a.mic_input_type {
        settings.mic_input_type = v;
    }
    if let Some(v) = a.mic_input_device {
        settings.mic_input_device = v;
    }

    Ok(settings)
}

/// Charge un fichier de réglages TOML et fusionne avec les valeurs par défaut.
///
/// Out-of-range values are kept as-is; the binder clamps them on load.
///
/// # Errors
/// Returns [`CoreError::FileNotFound`] if `path` does not exist, or an error if
/// the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ac_core::settings::load_settings;
/// use std::path::Path;
/// let settings = load_settings(Path::new("config/audio.toml")).unwrap();
/// ```
pub fn load_settings(path: &Path) -> Result<SettingsRecord> {
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_settings(&content).with_context(|| format!("Réglages invalides dans {}", path.display()))
}

/// Write the full record under an `[audio]` table, creating parent directories.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn save_settings(path: &Path, settings: &SettingsRecord) -> Result<()> {
    let content = toml::to_string_pretty(&SettingsFileRef { audio: settings })
        .context("Sérialisation TOML impossible")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Réglages audio enregistrés dans {}", path.display());
    Ok(())
}
