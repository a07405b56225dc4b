use std::path::PathBuf;

use ac_core::settings::EmulationMode;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// audiocfg — load, edit and save emulator audio settings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de réglages TOML. Défaut : config/audio.toml.
    #[arg(short, long, default_value = "config/audio.toml")]
    pub settings: PathBuf,

    /// Catalogue statique (TOML). Sans ce flag, les hôtes cpal sont interrogés.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Treat the emulated system as running: emulation and input fields are locked.
    #[arg(long, default_value_t = false)]
    pub powered_on: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List sinks, their output devices, and capture devices.
    Devices,
    /// Print the dialog state built from the settings file.
    Show {
        /// Emit JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Edit fields, then write the settings file back.
    Set(SetArgs),
    /// Reprint the dialog state whenever the settings file changes.
    Watch,
}

/// Edits applied by `set`, in dependency order (sink before device).
#[derive(Args, Debug, Default)]
pub struct SetArgs {
    /// Output sink id, or "auto".
    #[arg(long)]
    pub sink: Option<String>,

    /// Output device of the selected sink, or "auto".
    #[arg(long)]
    pub device: Option<String>,

    /// Volume [0.0, 1.0]; out-of-range values are clamped.
    #[arg(long)]
    pub volume: Option<f32>,

    #[arg(long)]
    pub stretching: Option<bool>,

    #[arg(long, value_enum)]
    pub emulation: Option<EmulationArg>,

    /// Input kind: 0 = None, 1 = Real Device, 2 = Static Noise.
    #[arg(long)]
    pub input_type: Option<u32>,

    /// Capture device name (free text).
    #[arg(long)]
    pub input_device: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmulationArg {
    Hle,
    Lle,
    LleMulticore,
}

impl From<EmulationArg> for EmulationMode {
    fn from(arg: EmulationArg) -> Self {
        match arg {
            EmulationArg::Hle => Self::Hle,
            EmulationArg::Lle => Self::Lle,
            EmulationArg::LleMulticore => Self::LleMultiCore,
        }
    }
}

impl SetArgs {
    /// `true` if no edit was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sink.is_none()
            && self.device.is_none()
            && self.volume.is_none()
            && self.stretching.is_none()
            && self.emulation.is_none()
            && self.input_type.is_none()
            && self.input_device.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_subcommand() {
        let cli = Cli::try_parse_from([
            "audiocfg",
            "--powered-on",
            "set",
            "--sink",
            "sdl2",
            "--emulation",
            "lle-multicore",
            "--stretching",
            "false",
        ])
        .unwrap();
        assert!(cli.powered_on);
        let Command::Set(args) = cli.command else {
            panic!("expected set");
        };
        assert_eq!(args.sink.as_deref(), Some("sdl2"));
        assert_eq!(args.emulation, Some(EmulationArg::LleMulticore));
        assert_eq!(args.stretching, Some(false));
        assert!(!args.is_empty());
    }

    #[test]
    fn settings_path_defaults() {
        let cli = Cli::try_parse_from(["audiocfg", "show", "--json"]).unwrap();
        assert_eq!(cli.settings, PathBuf::from("config/audio.toml"));
        assert!(matches!(cli.command, Command::Show { json: true }));
    }
}
