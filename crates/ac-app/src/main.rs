use std::sync::Arc;

use ac_core::binder::ConfigBinder;
use ac_core::gate::FixedPowerState;
use ac_core::settings::save_settings;
use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;

pub mod cli;
pub mod dialog;
pub mod hotreload;

use cli::{Cli, Command};
use dialog::DialogView;

/// Événements de la boucle `watch`.
enum WatchEvent {
    Reloaded,
    Quit,
}

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Catalogue et porte d'alimentation
    let catalog = dialog::open_catalog(cli.catalog.as_deref())?;
    let gate = FixedPowerState(cli.powered_on);
    let binder = ConfigBinder::new(catalog.as_ref());

    match &cli.command {
        Command::Devices => {
            print!("{}", dialog::render_devices(catalog.as_ref()));
        }
        Command::Show { json } => {
            let settings = dialog::read_settings(&cli.settings)?;
            let state = binder.load(&settings);
            let view = DialogView::new(&state, &gate);
            if *json {
                println!("{}", view.to_json()?);
            } else {
                print!("{}", view.to_text());
            }
        }
        Command::Set(args) => {
            let previous = dialog::read_settings(&cli.settings)?;
            if args.is_empty() {
                log::warn!("Aucune modification demandée, réglages réécrits tels quels.");
            }
            let state = dialog::apply_edits(&binder, binder.load(&previous), args, &gate)?;
            let settings = dialog::commit(&state, &previous);
            save_settings(&cli.settings, &settings)?;
            print!("{}", DialogView::new(&state, &gate).to_text());
        }
        Command::Watch => run_watch(&cli, &binder, &gate)?,
    }

    Ok(())
}

/// Rebuild and print the dialog each time the settings file changes.
fn run_watch(cli: &Cli, binder: &ConfigBinder<'_>, gate: &FixedPowerState) -> Result<()> {
    let settings = Arc::new(ArcSwap::from_pointee(dialog::read_settings(&cli.settings)?));
    if !cli.settings.exists() {
        // notify ne peut pas surveiller un fichier absent.
        save_settings(&cli.settings, &settings.load())?;
    }
    let (tx, rx) = flume::unbounded();

    let reload_tx = tx.clone();
    let _watcher = hotreload::spawn_settings_watcher(&cli.settings, &settings, move || {
        let _ = reload_tx.send(WatchEvent::Reloaded);
    })?;
    ctrlc::set_handler(move || {
        let _ = tx.send(WatchEvent::Quit);
    })?;

    print!("{}", DialogView::new(&binder.load(&settings.load()), gate).to_text());
    for event in rx.iter() {
        match event {
            WatchEvent::Reloaded => {
                let state = binder.load(&settings.load());
                println!("---");
                print!("{}", DialogView::new(&state, gate).to_text());
            }
            WatchEvent::Quit => break,
        }
    }
    log::info!("Surveillance terminée.");
    Ok(())
}
