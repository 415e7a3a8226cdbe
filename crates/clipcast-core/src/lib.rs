//! Core types for the clipcast publisher: the error taxonomy, environment
//! configuration, the typed metadata model with its defaults/override merge,
//! caption composition, and the publish outcome record.

pub mod caption;
pub mod config;
pub mod error;
pub mod metadata;
pub mod outcome;

pub use config::Config;
pub use error::{PublishError, PublishResult};
