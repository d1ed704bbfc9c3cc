#![forbid(unsafe_code)]
//! rime-compose: resolving a module together with the component modules it
//! imports.
//!
//! # Conventions
//!
//! - **Errors**: [`ComposeError`] wraps `rime_core::ResolveError` and adds the
//!   composition failures; every variant maps to a stable `ErrorCode`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **State**: None. Available modules are passed to every call.

pub mod compose;
pub mod error;
pub mod select;
pub mod wiring;

pub use compose::{Composer, CompositionReport, ModuleOutcome, ModuleSummary, ReportSummary};
pub use error::ComposeError;
pub use select::{check_import, selected_imports, with_component_placeholders};
pub use wiring::{bound_providers, boundary_cycles, boundary_view};
