//! Bestman application bootstrap.
//!
//! Resolves the runtime environment and process identity once at startup,
//! then brings up structured logging in two phases: a bootstrap console
//! sink available before configuration exists, replaced by a sink built
//! from the full configuration, both gated by one shared runtime-mutable
//! level switch. Finishes by reporting launch details and build provenance.

pub mod build_info;
pub mod error;
pub mod identity;
pub mod logger;
pub mod settings;
pub mod startup;
