//! Infrastructure layer: concrete implementations of the application ports.
//!
//! This module contains all I/O-performing code: process execution,
//! filesystem access, configuration loading, and control-plane HTTP calls.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::cli` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod control_plane;
pub mod fs;
