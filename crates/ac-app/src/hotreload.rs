use std::path::Path;
use std::sync::Arc;

use ac_core::settings::{SettingsRecord, load_settings};
use anyhow::Result;
use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecursiveMode, Watcher};

/// Surveille le fichier de réglages et met à jour l'ArcSwap.
///
/// `on_reload` runs after each successful reload. A file that fails to
/// parse keeps the previous record.
///
/// Retourne le Watcher (doit rester vivant tant que la surveillance tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use arc_swap::ArcSwap;
/// use ac_core::settings::SettingsRecord;
/// use ac_app::hotreload::spawn_settings_watcher;
/// use std::path::Path;
///
/// let settings = Arc::new(ArcSwap::from_pointee(SettingsRecord::default()));
/// let _watcher = spawn_settings_watcher(Path::new("config/audio.toml"), &settings, || {
///     log::info!("réglages rechargés");
/// });
/// ```
pub fn spawn_settings_watcher<F: Fn() + Send + 'static>(
    settings_path: &Path,
    settings: &Arc<ArcSwap<SettingsRecord>>,
    on_reload: F,
) -> Result<impl Watcher + use<F>> {
    let settings = Arc::clone(settings);
    let path = settings_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        {
            match load_settings(&path) {
                Ok(new_settings) => {
                    settings.store(Arc::new(new_settings));
                    log::info!("Réglages rechargés depuis {}", path.display());
                    on_reload();
                }
                Err(e) => {
                    log::warn!("Erreur de rechargement des réglages : {e:#}");
                }
            }
        }
    })?;

    watcher.watch(settings_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watching_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Arc::new(ArcSwap::from_pointee(SettingsRecord::default()));
        let result = spawn_settings_watcher(&dir.path().join("absent.toml"), &settings, || {});
        assert!(result.is_err());
    }
}
