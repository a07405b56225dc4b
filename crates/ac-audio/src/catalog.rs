use ac_core::catalog::DeviceCatalog;
use ac_core::options::AUTO_LABEL;
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Host, HostId};

use crate::error::AudioError;

/// Device catalog backed by cpal.
///
/// Sinks are the audio hosts compiled into cpal for this platform (ALSA, JACK,
/// WASAPI, CoreAudio, ...). Devices are the output devices of a host in the
/// order the backend enumerates them. Capture devices come from the default host.
///
/// Enumeration failures are logged and reported as empty lists: the catalog
/// never fails a query.
///
/// # Example
/// ```no_run
/// use ac_audio::CpalCatalog;
/// use ac_core::catalog::DeviceCatalog;
/// let catalog = CpalCatalog::new();
/// for sink in catalog.list_sinks() {
///     println!("{sink}: {:?}", catalog.list_devices_for_sink(&sink));
/// }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CpalCatalog;

impl CpalCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Display name of a host, upper-casing the usual acronyms.
#[must_use]
pub fn host_name(host_id: HostId) -> String {
    let name = format!("{host_id:?}");
    match name.as_str() {
        "Alsa" => "ALSA".to_string(),
        "Jack" => "JACK".to_string(),
        "Wasapi" => "WASAPI".to_string(),
        "Asio" => "ASIO".to_string(),
        _ => name,
    }
}

/// Open the host named `sink_id`; "auto" or empty picks the platform default.
fn open_host(sink_id: &str) -> Result<Host, AudioError> {
    if sink_id.is_empty() || sink_id == AUTO_LABEL {
        return Ok(cpal::default_host());
    }
    let host_id = cpal::available_hosts()
        .into_iter()
        .find(|id| host_name(*id) == sink_id)
        .ok_or_else(|| AudioError::HostUnavailable(sink_id.to_string()))?;
    cpal::host_from_id(host_id).map_err(|e| AudioError::HostUnavailable(format!("{sink_id}: {e}")))
}

fn output_device_names(host: &Host) -> Result<Vec<String>, AudioError> {
    let devices = host.output_devices().map_err(|e| AudioError::Enumeration {
        host: host_name(host.id()),
        reason: e.to_string(),
    })?;
    Ok(devices.filter_map(|d| d.name().ok()).collect())
}

fn input_device_names(host: &Host) -> Result<Vec<String>, AudioError> {
    let devices = host.input_devices().map_err(|e| AudioError::Enumeration {
        host: host_name(host.id()),
        reason: e.to_string(),
    })?;
    Ok(devices.filter_map(|d| d.name().ok()).collect())
}

impl DeviceCatalog for CpalCatalog {
    fn list_sinks(&self) -> Vec<String> {
        cpal::available_hosts().into_iter().map(host_name).collect()
    }

    fn list_devices_for_sink(&self, sink_id: &str) -> Vec<String> {
        match open_host(sink_id).and_then(|host| output_device_names(&host)) {
            Ok(names) => names,
            Err(e) => {
                log::debug!("Pas de périphériques de sortie pour {sink_id:?} : {e}");
                Vec::new()
            }
        }
    }

    fn list_input_devices(&self) -> Vec<String> {
        match input_device_names(&cpal::default_host()) {
            Ok(names) => names,
            Err(e) => {
                log::debug!("Pas de périphériques d'entrée : {e}");
                Vec::new()
            }
        }
    }
}
