//! Infrastructure layer: file loading and text measurement
//!
//! Everything here touches the outside world or stands in for a renderer.

pub mod error;
pub mod loader;
pub mod measure;

pub use error::{InfraError, InfraResult};
pub use loader::{load_document, load_script};
pub use measure::MonospaceMeasure;
