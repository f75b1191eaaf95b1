//! Application layer: port traits and the deploy services.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::cli`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    CommandRunner, ConfigStore, ControlPlane, LocalFs, ProgressReporter, UnitRegistration,
};
