use crate::cascade::CascadeResolver;
use crate::catalog::DeviceCatalog;
use crate::error::CoreError;
use crate::options::{AUTO_LABEL, DEFAULT_INPUT_LABEL, OptionList};
use crate::presentation::{PresentationState, REAL_DEVICE_INDEX};
use crate::settings::{EmulationMode, SettingsRecord};

/// A user edit of the presented dialog.
#[derive(Clone, Debug, PartialEq)]
pub enum BinderEvent {
    /// New index into the sink list; regenerates the device list.
    SinkChanged(usize),
    /// New index into the current device list.
    DeviceSelected(usize),
    InputTypeChanged(u32),
    InputDeviceEdited(String),
    VolumeChanged(f32),
    StretchingToggled(bool),
    EmulationModeChanged(EmulationMode),
}

/// Synchronise un [`SettingsRecord`] avec l'état présenté.
///
/// `load` builds a fresh [`PresentationState`], the `on_*` transitions map
/// `(state, edit) -> state'`, and `apply` projects the state back to settings.
///
/// # Example
/// ```
/// use ac_core::binder::ConfigBinder;
/// use ac_core::catalog::StaticCatalog;
/// use ac_core::settings::SettingsRecord;
///
/// let catalog = StaticCatalog::default()
///     .with_sink("wasapi", ["Realtek"])
///     .with_sink("sdl2", ["Speakers"]);
/// let settings = SettingsRecord {
///     sink_id: "sdl2".into(),
///     audio_device_id: "Speakers".into(),
///     ..SettingsRecord::default()
/// };
///
/// let binder = ConfigBinder::new(&catalog);
/// let state = binder.load(&settings);
/// assert_eq!(state.selected_sink_index(), 2);
/// assert_eq!(state.selected_device_index(), Some(1));
/// assert_eq!(ConfigBinder::apply(&state), settings);
/// ```
#[derive(Clone, Copy)]
pub struct ConfigBinder<'a> {
    resolver: CascadeResolver<'a>,
}

impl<'a> ConfigBinder<'a> {
    #[must_use]
    pub fn new(catalog: &'a dyn DeviceCatalog) -> Self {
        Self {
            resolver: CascadeResolver::new(catalog),
        }
    }

    /// Load `settings`, querying the catalog for the sink and input lists.
    #[must_use]
    pub fn load(&self, settings: &SettingsRecord) -> PresentationState {
        let catalog = self.resolver.catalog();
        self.load_with(settings, &catalog.list_sinks(), &catalog.list_input_devices())
    }

    /// Load `settings` against explicit sink and input-device snapshots.
    ///
    /// Steps run in dependency order: the sink selection seeds the device list
    /// before the stored device id is looked up.
    ///
    /// - unknown sink id: sink index 0 ("auto")
    /// - unknown device id: no device selection (not "auto")
    /// - volume: clamped to [0, 1]
    /// - input type and input device: copied verbatim
    #[must_use]
    pub fn load_with(
        &self,
        settings: &SettingsRecord,
        sink_catalog: &[String],
        input_device_catalog: &[String],
    ) -> PresentationState {
        let mut sink_options = OptionList::with_leading(AUTO_LABEL, sink_catalog.iter().cloned());
        if sink_options.select_label(&settings.sink_id).is_none() {
            log::debug!("Sink {:?} absent du catalogue, repli sur auto", settings.sink_id);
            sink_options.selected = Some(0);
        }

        let sink_id = sink_options.selected_label().unwrap_or(AUTO_LABEL);
        let mut device_options = self.resolver.resolve_device_options(sink_id);
        if device_options
            .select_label(&settings.audio_device_id)
            .is_none()
        {
            log::debug!(
                "Périphérique {:?} absent pour le sink {sink_id:?}",
                settings.audio_device_id
            );
        }

        let input_device_options =
            OptionList::with_leading(DEFAULT_INPUT_LABEL, input_device_catalog.iter().cloned());

        PresentationState {
            sink_options,
            device_options,
            input_device_options,
            input_type_index: settings.mic_input_type,
            input_device_text: settings.mic_input_device.clone(),
            input_device_editable: settings.mic_input_type == REAL_DEVICE_INDEX,
            volume_fraction: clamp_volume(settings.volume),
            stretching_enabled: settings.enable_audio_stretching,
            emulation_mode: settings.emulation_mode(),
        }
    }

    /// Select another sink and regenerate its device list.
    ///
    /// The device selection resets to "auto": device identity is sink-scoped.
    ///
    /// # Errors
    /// Returns [`CoreError::IndexOutOfRange`] if `new_sink_index` is not in the sink list.
    pub fn on_sink_changed(
        &self,
        mut state: PresentationState,
        new_sink_index: usize,
    ) -> Result<PresentationState, CoreError> {
        state.sink_options.select(new_sink_index, "sink")?;
        let sink_id = state.sink_options.selected_label().unwrap_or(AUTO_LABEL);
        state.device_options = self.resolver.resolve_device_options(sink_id);
        state.device_options.selected = Some(0);
        Ok(state)
    }

    /// # Errors
    /// Returns [`CoreError::IndexOutOfRange`] if `index` is not in the device list.
    pub fn on_device_selected(
        mut state: PresentationState,
        index: usize,
    ) -> Result<PresentationState, CoreError> {
        state.device_options.select(index, "device")?;
        Ok(state)
    }

    /// Change the input kind; only the real-device kind enables the device field.
    #[must_use]
    pub fn on_input_type_changed(mut state: PresentationState, index: u32) -> PresentationState {
        state.input_type_index = index;
        state.input_device_editable = index == REAL_DEVICE_INDEX;
        state
    }

    #[must_use]
    pub fn on_input_device_edited(mut state: PresentationState, text: String) -> PresentationState {
        state.input_device_text = text;
        state
    }

    #[must_use]
    pub fn on_volume_changed(mut state: PresentationState, volume: f32) -> PresentationState {
        state.volume_fraction = clamp_volume(volume);
        state
    }

    #[must_use]
    pub fn on_stretching_toggled(mut state: PresentationState, enabled: bool) -> PresentationState {
        state.stretching_enabled = enabled;
        state
    }

    #[must_use]
    pub fn on_emulation_mode_changed(
        mut state: PresentationState,
        mode: EmulationMode,
    ) -> PresentationState {
        state.emulation_mode = mode;
        state
    }

    /// Dispatch one edit to its transition.
    ///
    /// # Errors
    /// Propagates [`CoreError::IndexOutOfRange`] from index-based edits.
    pub fn update(
        &self,
        state: PresentationState,
        event: BinderEvent,
    ) -> Result<PresentationState, CoreError> {
        match event {
            BinderEvent::SinkChanged(index) => self.on_sink_changed(state, index),
            BinderEvent::DeviceSelected(index) => Self::on_device_selected(state, index),
            BinderEvent::InputTypeChanged(index) => Ok(Self::on_input_type_changed(state, index)),
            BinderEvent::InputDeviceEdited(text) => Ok(Self::on_input_device_edited(state, text)),
            BinderEvent::VolumeChanged(v) => Ok(Self::on_volume_changed(state, v)),
            BinderEvent::StretchingToggled(on) => Ok(Self::on_stretching_toggled(state, on)),
            BinderEvent::EmulationModeChanged(mode) => {
                Ok(Self::on_emulation_mode_changed(state, mode))
            }
        }
    }

    /// Index of the sink labelled `label`.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownLabel`] if no sink carries that label.
    pub fn sink_index_of(state: &PresentationState, label: &str) -> Result<usize, CoreError> {
        state
            .sink_options
            .position(label)
            .ok_or_else(|| CoreError::UnknownLabel {
                list: "sink",
                label: label.to_string(),
            })
    }

    /// Index of the device labelled `label` in the current device list.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownLabel`] if the current sink exposes no such device.
    pub fn device_index_of(state: &PresentationState, label: &str) -> Result<usize, CoreError> {
        state
            .device_options
            .position(label)
            .ok_or_else(|| CoreError::UnknownLabel {
                list: "device",
                label: label.to_string(),
            })
    }

    /// Project the state back to a full settings record.
    ///
    /// No defaulting: an unmatched device writes an empty id, so callers keep a
    /// concrete device selection before applying.
    #[must_use]
    pub fn apply(state: &PresentationState) -> SettingsRecord {
        let mut settings = SettingsRecord {
            sink_id: state.selected_sink().to_string(),
            audio_device_id: state
                .device_options
                .selected_label()
                .unwrap_or_default()
                .to_string(),
            enable_audio_stretching: state.stretching_enabled,
            volume: state.volume_fraction,
            enable_dsp_lle: false,
            enable_dsp_lle_multithread: false,
            mic_input_type: state.input_type_index,
            mic_input_device: state.input_device_text.clone(),
        };
        settings.set_emulation_mode(state.emulation_mode);
        settings
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        log::warn!("Volume NaN, ramené à 0");
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}
