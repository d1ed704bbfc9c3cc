#![forbid(unsafe_code)]
//! rime-core: the dependency graph engine of the rime DI compiler.
//!
//! Given the beans, sockets and dependencies a module declares, it builds the
//! module's dependency graph, reports every dependency cycle with a stable
//! diagram, and otherwise produces a deterministic instantiation order for
//! code generation.
//!
//! # Conventions
//!
//! - **Errors**: Library failures are `thiserror` enums ([`ResolveError`]),
//!   each mapped to a stable [`ErrorCode`]. Configuration loading returns
//!   `anyhow::Result` with context.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//!   The library never installs a subscriber.
//! - **Determinism**: Declaration order drives everything observable. No
//!   output depends on hash iteration order.
//!
//! # Example
//!
//! ```rust,ignore
//! use rime_core::{resolve_module, BeanDeclaration, ModuleDeclaration, ModuleName};
//!
//! let m = ModuleName::new("io.example.app");
//! let module = ModuleDeclaration::new(m.clone(), 1)
//!     .with_bean(BeanDeclaration::singleton(m.qualify("a")).depends_on(m.qualify("b"), "b"))
//!     .with_bean(BeanDeclaration::singleton(m.qualify("b")));
//!
//! match resolve_module(&module) {
//!     Ok(resolved) => {
//!         for bean in resolved.instantiation_order() {
//!             println!("{}", bean.name);
//!         }
//!     }
//!     Err(err) => {
//!         for diagnostic in err.diagnostics() {
//!             eprintln!("{diagnostic}");
//!         }
//!     }
//! }
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod model;
pub mod resolve;
pub mod validate;

pub use config::{CompilerConfig, load_config, resolve_config};
pub use descriptor::{ModuleDescriptor, WiringEdge};
pub use error::{CycleError, Diagnostic, ErrorCode, ResolveError};
pub use model::{
    BeanDeclaration, DependencyKind, DependencyRef, ModuleDeclaration, ModuleImport, ModuleName,
    OperationHandle, QualifiedName, SocketDeclaration, Strategy,
};
pub use resolve::{ResolvedModule, Resolver, resolve_module};
