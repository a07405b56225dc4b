use serde::Serialize;

use crate::presentation::PresentationState;

/// Reports whether the emulated system is running.
///
/// Queried once when a presentation is built; a host must rebuild the
/// presentation to reflect a power transition.
pub trait PowerStateGate {
    fn is_system_powered_on(&self) -> bool;
}

/// Gate with a fixed answer, for hosts that know the power state up front.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedPowerState(pub bool);

impl PowerStateGate for FixedPowerState {
    fn is_system_powered_on(&self) -> bool {
        self.0
    }
}

/// Which fields may be edited in the presented dialog.
///
/// Sink, device, volume and stretching are always editable. The gate only
/// restricts availability; the underlying state stays mutable.
///
/// # Example
/// ```
/// use ac_core::binder::ConfigBinder;
/// use ac_core::catalog::StaticCatalog;
/// use ac_core::gate::{FieldAvailability, FixedPowerState};
/// use ac_core::settings::SettingsRecord;
///
/// let catalog = StaticCatalog::default();
/// let state = ConfigBinder::new(&catalog).load(&SettingsRecord::default());
/// let fields = FieldAvailability::evaluate(&state, &FixedPowerState(true));
/// assert!(!fields.emulation_mode);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldAvailability {
    pub emulation_mode: bool,
    pub input_type: bool,
    pub input_device: bool,
    pub powered_on: bool,
}

impl FieldAvailability {
    /// Combine the input-kind gating of `state` with the power gate.
    #[must_use]
    pub fn evaluate(state: &PresentationState, gate: &dyn PowerStateGate) -> Self {
        let powered_on = gate.is_system_powered_on();
        Self {
            emulation_mode: !powered_on,
            input_type: !powered_on,
            input_device: state.input_device_editable() && !powered_on,
            powered_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::ConfigBinder;
    use crate::catalog::StaticCatalog;
    use crate::settings::SettingsRecord;

    fn state(mic_input_type: u32) -> PresentationState {
        let catalog = StaticCatalog::default();
        let settings = SettingsRecord {
            mic_input_type,
            ..SettingsRecord::default()
        };
        ConfigBinder::new(&catalog).load(&settings)
    }

    #[test]
    fn powered_off_real_device_is_editable() {
        let fields = FieldAvailability::evaluate(&state(1), &FixedPowerState(false));
        assert!(fields.emulation_mode);
        assert!(fields.input_type);
        assert!(fields.input_device);
    }

    #[test]
    fn powered_on_locks_gated_fields() {
        let fields = FieldAvailability::evaluate(&state(1), &FixedPowerState(true));
        assert!(!fields.emulation_mode);
        assert!(!fields.input_type);
        assert!(!fields.input_device);
        assert!(fields.powered_on);
    }

    #[test]
    fn non_device_kind_never_edits_device() {
        for kind in [0, 2] {
            let fields = FieldAvailability::evaluate(&state(kind), &FixedPowerState(false));
            assert!(!fields.input_device, "kind {kind}");
            assert!(fields.input_type);
        }
    }
}
