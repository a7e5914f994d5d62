//! Dependency checks: the declarative catalog and its probes.

pub mod catalog;
pub mod probe;

pub use catalog::{catalog, DependencyCheck, Finalize, Gate, Health, Installer, RemoteScript};
pub use probe::Probe;
