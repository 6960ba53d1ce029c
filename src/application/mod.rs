//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic. It performs no I/O of its own.

pub mod error;
pub mod script;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use script::{Script, ScriptStep};
