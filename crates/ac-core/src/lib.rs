//! Settings model, cascading option lists, and the binder between them.
//!
//! This crate contains the persisted settings record, the device catalog
//! seam, and the load/edit/apply logic shared across the audiocfg workspace.

pub mod binder;
pub mod cascade;
pub mod catalog;
pub mod error;
pub mod gate;
pub mod options;
pub mod presentation;
pub mod settings;

pub use binder::{BinderEvent, ConfigBinder};
pub use catalog::{DeviceCatalog, StaticCatalog};
pub use error::CoreError;
pub use options::OptionList;
pub use presentation::PresentationState;
pub use settings::{EmulationMode, SettingsRecord};
