use std::fmt::Write as _;
use std::path::Path;

use ac_core::OptionList;
use ac_core::binder::{BinderEvent, ConfigBinder};
use ac_core::catalog::{DeviceCatalog, load_catalog};
use ac_core::gate::{FieldAvailability, PowerStateGate};
use ac_core::presentation::{EMULATION_LABELS, INPUT_TYPE_LABELS, PresentationState};
use ac_core::settings::{SettingsRecord, load_settings};
use anyhow::{Result, bail};
use serde::Serialize;

use crate::cli::SetArgs;

/// Static catalog when a path is given, cpal otherwise.
///
/// # Errors
/// Returns an error if the catalog file cannot be loaded.
pub fn open_catalog(path: Option<&Path>) -> Result<Box<dyn DeviceCatalog>> {
    match path {
        Some(p) => Ok(Box::new(load_catalog(p)?)),
        None => Ok(Box::new(ac_audio::CpalCatalog::new())),
    }
}

/// Read the settings file, falling back to defaults when it does not exist yet.
///
/// # Errors
/// Returns an error if an existing file cannot be read or parsed.
pub fn read_settings(path: &Path) -> Result<SettingsRecord> {
    if path.exists() {
        load_settings(path)
    } else {
        log::warn!(
            "Réglages introuvables : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(SettingsRecord::default())
    }
}

/// What a dialog would show: state plus the availability of each field.
#[derive(Serialize)]
pub struct DialogView<'a> {
    pub state: &'a PresentationState,
    pub availability: FieldAvailability,
    pub volume: String,
    pub emulation: &'static str,
    pub input_type: Option<&'static str>,
}

impl<'a> DialogView<'a> {
    #[must_use]
    pub fn new(state: &'a PresentationState, gate: &dyn PowerStateGate) -> Self {
        Self {
            state,
            availability: FieldAvailability::evaluate(state, gate),
            volume: state.volume_percentage(),
            emulation: EMULATION_LABELS[state.emulation_mode_index()],
            input_type: state.input_type_label(),
        }
    }

    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let s = self.state;
        let lock = |editable: bool| if editable { "" } else { " (verrouillé)" };
        let mut out = String::new();
        let _ = writeln!(out, "Output sink     : {}", s.selected_sink());
        write_options(&mut out, s.sink_options());
        let device = s
            .device_options()
            .selected_label()
            .unwrap_or("<aucune correspondance>");
        let _ = writeln!(out, "Output device   : {device}");
        write_options(&mut out, s.device_options());
        let _ = writeln!(out, "Volume          : {}", self.volume);
        let _ = writeln!(out, "Stretching      : {}", s.stretching_enabled());
        let _ = writeln!(
            out,
            "Emulation       : {}{}",
            self.emulation,
            lock(self.availability.emulation_mode)
        );
        let _ = writeln!(
            out,
            "Input type      : {}{}",
            self.input_type.unwrap_or("<inconnu>"),
            lock(self.availability.input_type)
        );
        let _ = writeln!(
            out,
            "Input device    : {}{}",
            s.input_device_text(),
            lock(self.availability.input_device)
        );
        write_options(&mut out, s.input_device_options());
        out
    }
}

fn write_options(out: &mut String, list: &OptionList) {
    for (i, label) in list.labels().iter().enumerate() {
        let marker = if list.selected() == Some(i) { '*' } else { ' ' };
        let _ = writeln!(out, "    {marker} [{i}] {label}");
    }
}

/// Sinks with their devices, then capture devices.
#[must_use]
pub fn render_devices(catalog: &dyn DeviceCatalog) -> String {
    let mut out = String::new();
    for sink in catalog.list_sinks() {
        let _ = writeln!(out, "{sink}");
        for device in catalog.list_devices_for_sink(&sink) {
            let _ = writeln!(out, "    {device}");
        }
    }
    let _ = writeln!(out, "Input devices");
    for device in catalog.list_input_devices() {
        let _ = writeln!(out, "    {device}");
    }
    let _ = writeln!(out, "Input types : {}", INPUT_TYPE_LABELS.join(", "));
    out
}

/// Replay command-line edits through the binder, sink first.
///
/// A sink edit naming the sink already selected keeps the device selection.
///
/// Power-gated fields are refused while the system runs; the input device is
/// checked after any input type change.
///
/// # Errors
/// Returns an error for an unknown sink/device label or a locked field.
pub fn apply_edits(
    binder: &ConfigBinder<'_>,
    mut state: PresentationState,
    args: &SetArgs,
    gate: &dyn PowerStateGate,
) -> Result<PresentationState> {
    if let Some(sink) = &args.sink {
        let index = ConfigBinder::sink_index_of(&state, sink)?;
        // Re-selecting the current sink is not a change: the device stays.
        if index != state.selected_sink_index() {
            state = binder.update(state, BinderEvent::SinkChanged(index))?;
        }
    }
    if let Some(device) = &args.device {
        let index = ConfigBinder::device_index_of(&state, device)?;
        state = binder.update(state, BinderEvent::DeviceSelected(index))?;
    }
    if let Some(volume) = args.volume {
        state = binder.update(state, BinderEvent::VolumeChanged(volume))?;
    }
    if let Some(on) = args.stretching {
        state = binder.update(state, BinderEvent::StretchingToggled(on))?;
    }

    let fields = FieldAvailability::evaluate(&state, gate);
    if let Some(mode) = args.emulation {
        if !fields.emulation_mode {
            bail!("Mode d'émulation verrouillé tant que le système est allumé");
        }
        state = binder.update(state, BinderEvent::EmulationModeChanged(mode.into()))?;
    }
    if let Some(kind) = args.input_type {
        if !fields.input_type {
            bail!("Type d'entrée verrouillé tant que le système est allumé");
        }
        state = binder.update(state, BinderEvent::InputTypeChanged(kind))?;
    }
    if let Some(text) = &args.input_device {
        if !FieldAvailability::evaluate(&state, gate).input_device {
            bail!("Périphérique d'entrée non modifiable pour ce type d'entrée ou système allumé");
        }
        state = binder.update(state, BinderEvent::InputDeviceEdited(text.clone()))?;
    }
    Ok(state)
}

/// Project the state to settings for saving.
///
/// The host never writes an empty device id: if the persisted device is still
/// unmatched, the previous id is carried over so a missing device does not
/// erase the preference.
#[must_use]
pub fn commit(state: &PresentationState, previous: &SettingsRecord) -> SettingsRecord {
    let mut settings = ConfigBinder::apply(state);
    if state.selected_device_index().is_none() {
        log::info!(
            "Périphérique {:?} non sélectionné, identifiant conservé",
            previous.audio_device_id
        );
        settings.audio_device_id.clone_from(&previous.audio_device_id);
    }
    settings
}

#[cfg(test)]
mod tests {
    use ac_core::catalog::StaticCatalog;
    use ac_core::gate::FixedPowerState;
    use ac_core::settings::EmulationMode;

    use super::*;
    use crate::cli::EmulationArg;

    fn catalog() -> StaticCatalog {
        StaticCatalog::default()
            .with_sink("cubeb", ["Speakers", "Headphones"])
            .with_sink("sdl2", ["Speakers"])
            .with_input_devices(["USB Mic"])
    }

    #[test]
    fn sink_then_device_edit() {
        let c = catalog();
        let binder = ConfigBinder::new(&c);
        let state = binder.load(&SettingsRecord::default());
        let args = SetArgs {
            sink: Some("cubeb".into()),
            device: Some("Headphones".into()),
            volume: Some(0.5),
            ..SetArgs::default()
        };
        let state = apply_edits(&binder, state, &args, &FixedPowerState(false)).unwrap();
        let settings = commit(&state, &SettingsRecord::default());
        assert_eq!(settings.sink_id, "cubeb");
        assert_eq!(settings.audio_device_id, "Headphones");
        assert!((settings.volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn same_sink_keeps_saved_device() {
        let c = catalog();
        let binder = ConfigBinder::new(&c);
        let previous = SettingsRecord {
            sink_id: "cubeb".into(),
            audio_device_id: "Headphones".into(),
            ..SettingsRecord::default()
        };
        let args = SetArgs {
            sink: Some("cubeb".into()),
            volume: Some(0.5),
            ..SetArgs::default()
        };
        let state =
            apply_edits(&binder, binder.load(&previous), &args, &FixedPowerState(false)).unwrap();
        assert_eq!(state.selected_device_index(), Some(2));
        let settings = commit(&state, &previous);
        assert_eq!(settings.sink_id, "cubeb");
        assert_eq!(settings.audio_device_id, "Headphones");
        assert!((settings.volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn other_sink_resets_saved_device() {
        let c = catalog();
        let binder = ConfigBinder::new(&c);
        let previous = SettingsRecord {
            sink_id: "cubeb".into(),
            audio_device_id: "Headphones".into(),
            ..SettingsRecord::default()
        };
        let args = SetArgs {
            sink: Some("sdl2".into()),
            ..SetArgs::default()
        };
        let state =
            apply_edits(&binder, binder.load(&previous), &args, &FixedPowerState(false)).unwrap();
        assert_eq!(commit(&state, &previous).audio_device_id, "auto");
    }

    #[test]
    fn device_from_other_sink_is_rejected() {
        let c = catalog();
        let binder = ConfigBinder::new(&c);
        let state = binder.load(&SettingsRecord {
            sink_id: "sdl2".into(),
            ..SettingsRecord::default()
        });
        let args = SetArgs {
            device: Some("Headphones".into()),
            ..SetArgs::default()
        };
        assert!(apply_edits(&binder, state, &args, &FixedPowerState(false)).is_err());
    }

    #[test]
    fn powered_on_refuses_emulation_change() {
        let c = catalog();
        let binder = ConfigBinder::new(&c);
        let state = binder.load(&SettingsRecord::default());
        let args = SetArgs {
            emulation: Some(EmulationArg::Lle),
            ..SetArgs::default()
        };
        assert!(apply_edits(&binder, state.clone(), &args, &FixedPowerState(true)).is_err());
        let state = apply_edits(&binder, state, &args, &FixedPowerState(false)).unwrap();
        assert_eq!(state.emulation_mode(), EmulationMode::Lle);
    }

    #[test]
    fn input_device_needs_real_device_kind() {
        let c = catalog();
        let binder = ConfigBinder::new(&c);
        let state = binder.load(&SettingsRecord::default());
        let only_device = SetArgs {
            input_device: Some("USB Mic".into()),
            ..SetArgs::default()
        };
        assert!(
            apply_edits(&binder, state.clone(), &only_device, &FixedPowerState(false)).is_err()
        );

        let with_kind = SetArgs {
            input_type: Some(1),
            input_device: Some("USB Mic".into()),
            ..SetArgs::default()
        };
        let state = apply_edits(&binder, state, &with_kind, &FixedPowerState(false)).unwrap();
        assert_eq!(state.input_device_text(), "USB Mic");
    }

    #[test]
    fn commit_keeps_unmatched_device_id() {
        let c = catalog();
        let binder = ConfigBinder::new(&c);
        let previous = SettingsRecord {
            sink_id: "sdl2".into(),
            audio_device_id: "Unplugged DAC".into(),
            ..SettingsRecord::default()
        };
        let state = binder.load(&previous);
        assert_eq!(state.selected_device_index(), None);
        assert_eq!(commit(&state, &previous), previous);
    }

    #[test]
    fn text_view_marks_locks_and_selection() {
        let c = catalog();
        let state = ConfigBinder::new(&c).load(&SettingsRecord::default());
        let text = DialogView::new(&state, &FixedPowerState(true)).to_text();
        assert!(text.contains("Emulation       : HLE (fast) (verrouillé)"));
        assert!(text.contains("* [0] auto"));
        assert!(text.contains("Volume          : 100%"));
    }

    #[test]
    fn json_view_exposes_availability() {
        let c = catalog();
        let state = ConfigBinder::new(&c).load(&SettingsRecord::default());
        let json = DialogView::new(&state, &FixedPowerState(false))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["availability"]["emulation_mode"], true);
        assert_eq!(value["availability"]["input_device"], false);
        assert_eq!(value["emulation"], "HLE (fast)");
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = read_settings(&dir.path().join("audio.toml")).unwrap();
        assert_eq!(settings, SettingsRecord::default());
    }

    #[test]
    fn device_listing_includes_inputs() {
        let text = render_devices(&catalog());
        assert!(text.starts_with("cubeb\n    Speakers\n    Headphones\n"));
        assert!(text.contains("Input devices\n    USB Mic\n"));
    }
}
