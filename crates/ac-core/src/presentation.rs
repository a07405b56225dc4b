use serde::Serialize;

use crate::options::OptionList;
use crate::settings::EmulationMode;

/// Labels of the DSP emulation selector, indexed by [`EmulationMode::index`].
pub const EMULATION_LABELS: &[&str] = &["HLE (fast)", "LLE (accurate)", "LLE multi-core"];

/// Fixed set of microphone input kinds.
pub const INPUT_TYPE_LABELS: &[&str] = &["None", "Real Device", "Static Noise"];

/// Index of the "real hardware" input kind, the only one with a device field.
pub const REAL_DEVICE_INDEX: u32 = 1;

/// Maximum position of the volume slider.
pub const VOLUME_SLIDER_MAX: u32 = 100;

/// Transient editing state, rebuilt by every
/// [`ConfigBinder::load`](crate::binder::ConfigBinder::load).
///
/// `sink_options` always has a selection; `device_options` may be unmatched
/// (`None`) after a degraded load and must be regenerated whenever the sink
/// selection changes. Only the binder's transitions touch the lists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PresentationState {
    pub(crate) sink_options: OptionList,
    pub(crate) device_options: OptionList,
    pub(crate) input_device_options: OptionList,
    pub(crate) input_type_index: u32,
    pub(crate) input_device_text: String,
    pub(crate) input_device_editable: bool,
    pub(crate) volume_fraction: f32,
    pub(crate) stretching_enabled: bool,
    pub(crate) emulation_mode: EmulationMode,
}

impl PresentationState {
    #[must_use]
    pub fn sink_options(&self) -> &OptionList {
        &self.sink_options
    }

    /// Selected sink; 0 ("auto") when nothing matched.
    #[must_use]
    pub fn selected_sink_index(&self) -> usize {
        self.sink_options.selected().unwrap_or(0)
    }

    /// Label of the selected sink.
    #[must_use]
    pub fn selected_sink(&self) -> &str {
        self.sink_options
            .get(self.selected_sink_index())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn device_options(&self) -> &OptionList {
        &self.device_options
    }

    /// Selected output device, `None` when the persisted id had no match.
    #[must_use]
    pub fn selected_device_index(&self) -> Option<usize> {
        self.device_options.selected()
    }

    /// `"Default"` followed by the capture devices, display only.
    #[must_use]
    pub fn input_device_options(&self) -> &OptionList {
        &self.input_device_options
    }

    #[must_use]
    pub fn input_type_index(&self) -> u32 {
        self.input_type_index
    }

    #[must_use]
    pub fn input_device_text(&self) -> &str {
        &self.input_device_text
    }

    /// Whether the input kind allows a device, before any power gating.
    #[must_use]
    pub fn input_device_editable(&self) -> bool {
        self.input_device_editable
    }

    #[must_use]
    pub fn volume_fraction(&self) -> f32 {
        self.volume_fraction
    }

    #[must_use]
    pub fn stretching_enabled(&self) -> bool {
        self.stretching_enabled
    }

    #[must_use]
    pub fn emulation_mode(&self) -> EmulationMode {
        self.emulation_mode
    }

    #[must_use]
    pub fn emulation_mode_index(&self) -> usize {
        self.emulation_mode.index()
    }

    /// Slider position for the current volume, truncated like an integer slider.
    #[must_use]
    pub fn volume_slider_position(&self) -> u32 {
        (self.volume_fraction * VOLUME_SLIDER_MAX as f32) as u32
    }

    /// Volume indicator text, e.g. `"50%"`.
    #[must_use]
    pub fn volume_percentage(&self) -> String {
        let position = self.volume_slider_position();
        format!("{}%", position * 100 / VOLUME_SLIDER_MAX)
    }

    /// Label of the input kind, `None` for an index outside the fixed set.
    #[must_use]
    pub fn input_type_label(&self) -> Option<&'static str> {
        INPUT_TYPE_LABELS.get(self.input_type_index as usize).copied()
    }
}
