use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid settings value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Referenced file does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// A transition referenced an entry past the end of an option list.
    #[error("Index {index} hors limites pour {list} ({len} entrées)")]
    IndexOutOfRange {
        /// Which list was addressed ("sink", "device", ...).
        list: &'static str,
        /// Requested index.
        index: usize,
        /// Current list length.
        len: usize,
    },

    /// A label was requested that is not part of the addressed option list.
    #[error("Entrée inconnue dans {list} : {label}")]
    UnknownLabel {
        /// Which list was searched.
        list: &'static str,
        /// The label that was not found.
        label: String,
    },
}
