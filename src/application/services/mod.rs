//! Application services, one per deploy step.
//!
//! Each service module implements one step of the deploy pipeline by
//! composing domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports`, never from
//! `crate::infra`, `crate::cli`, or `crate::output`.

pub mod deploy;
pub mod diff_report;
pub mod env_persist;
pub mod executor;
pub mod manifest_loader;
pub mod registrar;
