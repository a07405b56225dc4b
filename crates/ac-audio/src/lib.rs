// Hardware-backed device catalog for audiocfg.

pub mod catalog;
pub mod error;

pub use catalog::CpalCatalog;
pub use error::AudioError;
