use thiserror::Error;

/// Errors originating from the audio module.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The named host is not compiled in or could not be opened.
    #[error("Hôte audio indisponible : {0}")]
    HostUnavailable(String),

    /// Device enumeration failed for a host.
    #[error("Énumération impossible pour {host} : {reason}")]
    Enumeration {
        /// Host name.
        host: String,
        /// Backend error text.
        reason: String,
    },
}
