pub mod backup;
pub mod catalog;
pub mod config;
pub mod error;
pub mod installer;
pub mod io;
pub mod paths;
pub mod registrar;
pub mod selector;
pub mod technology;
pub mod templates;

pub use error::{Result, SpecstackError};

/// Version of the specstack crates, stamped into generated files and config.
pub const SPECSTACK_VERSION: &str = env!("CARGO_PKG_VERSION");
