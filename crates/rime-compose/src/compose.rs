//! Multi-module composition.
//!
//! # Overview
//!
//! [`Composer::compose`] resolves a root module together with the component
//! modules it imports. Each module is resolved on its own graph; the root sees
//! the component beans it uses only as socket placeholders.
//!
//! ```text
//! root imports
//!        ↓  select::selected_imports()
//! selected components ──▶ lookup in `available` ──▶ check_import()
//!        ↓                                             ↓
//!        ↓                                  Resolver::resolve(component)
//!  with_component_placeholders(root)
//!        ↓
//!  Resolver::resolve(root)
//!        ↓
//!  wiring::boundary_cycles(root)
//!        ↓
//! CompositionReport (one outcome per module)
//! ```
//!
//! A failing component does not stop the others; every failure ends up in the
//! report. Nothing is kept between calls.

use rime_core::{
    CompilerConfig, Diagnostic, ModuleDeclaration, ModuleImport, ModuleName, ResolveError,
    ResolvedModule, Resolver,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::ComposeError;
use crate::select::{check_import, selected_imports, with_component_placeholders};
use crate::wiring::boundary_cycles;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Result of resolving one module of a composition.
#[derive(Debug, Clone)]
pub struct ModuleOutcome {
    pub module: ModuleName,
    pub result: Result<ResolvedModule, ComposeError>,
}

impl ModuleOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-module outcomes of one [`Composer::compose`] call.
///
/// Components come first, in import order, and the root module last.
#[derive(Debug, Clone)]
pub struct CompositionReport {
    outcomes: Vec<ModuleOutcome>,
}

impl CompositionReport {
    #[must_use]
    pub fn outcomes(&self) -> &[ModuleOutcome] {
        &self.outcomes
    }

    /// The root module's outcome.
    #[must_use]
    pub fn root(&self) -> Option<&ModuleOutcome> {
        self.outcomes.last()
    }

    #[must_use]
    pub fn outcome(&self, module: &ModuleName) -> Option<&ModuleOutcome> {
        self.outcomes.iter().find(|outcome| &outcome.module == module)
    }

    /// The resolved module named `module`, if it resolved.
    #[must_use]
    pub fn resolved(&self, module: &ModuleName) -> Option<&ResolvedModule> {
        self.outcome(module).and_then(|outcome| outcome.result.as_ref().ok())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ModuleOutcome::is_ok)
    }

    /// Failed modules with their errors, in report order.
    pub fn failures(&self) -> impl Iterator<Item = (&ModuleName, &ComposeError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (&outcome.module, err)))
    }

    /// Cycle diagnostics of every failed module, in report order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.failures().flat_map(|(_, err)| err.diagnostics())
    }

    /// Machine-readable summary.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            success: self.is_success(),
            modules: self
                .outcomes
                .iter()
                .map(|outcome| match &outcome.result {
                    Ok(resolved) => ModuleSummary {
                        module: outcome.module.clone(),
                        ok: true,
                        beans: resolved.instantiation_order().count(),
                        code: None,
                        message: None,
                    },
                    Err(err) => ModuleSummary {
                        module: outcome.module.clone(),
                        ok: false,
                        beans: 0,
                        code: Some(err.code().code()),
                        message: Some(err.to_string()),
                    },
                })
                .collect(),
        }
    }
}

/// Serializable overview of a [`CompositionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub success: bool,
    pub modules: Vec<ModuleSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSummary {
    pub module: ModuleName,
    pub ok: bool,
    pub beans: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReportSummary {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Resolves a root module and its selected components.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    resolver: Resolver,
}

impl Composer {
    #[must_use]
    pub const fn new(config: CompilerConfig) -> Self {
        Self {
            resolver: Resolver::new(config),
        }
    }

    /// Resolve `root` and every component it selects from `available`.
    #[instrument(skip_all, fields(module = %root.name))]
    pub fn compose(
        &self,
        root: &ModuleDeclaration,
        available: &[ModuleDeclaration],
    ) -> CompositionReport {
        let supported_version = self.resolver.config().supported_version;
        let mut outcomes = Vec::new();
        let mut components: Vec<(&ModuleImport, &ModuleDeclaration)> = Vec::new();

        for import in selected_imports(root) {
            let Some(component) = available.iter().find(|m| m.name == import.module) else {
                outcomes.push(ModuleOutcome {
                    module: import.module.clone(),
                    result: Err(ComposeError::MissingComponent {
                        importer: root.name.clone(),
                        module: import.module.clone(),
                    }),
                });
                continue;
            };

            // A component that fails its import check is not wired into the
            // root; root references to its beans then surface as malformed.
            if let Err(err) = check_import(root, import, component, supported_version) {
                outcomes.push(ModuleOutcome {
                    module: component.name.clone(),
                    result: Err(err),
                });
                continue;
            }
            components.push((import, component));

            outcomes.push(ModuleOutcome {
                module: component.name.clone(),
                result: self.resolver.resolve(component).map_err(ComposeError::from),
            });
        }

        let wired: Vec<&ModuleDeclaration> =
            components.iter().map(|(_, component)| *component).collect();
        let prepared = with_component_placeholders(root, &wired);
        let result = self
            .resolver
            .resolve(&prepared)
            .map_err(ComposeError::from)
            .and_then(|resolved| {
                boundary_cycles(root, &components).map_err(ResolveError::from)?;
                Ok(resolved)
            });
        outcomes.push(ModuleOutcome {
            module: root.name.clone(),
            result,
        });

        let report = CompositionReport { outcomes };
        for (module, err) in report.failures() {
            warn!(failed = %module, code = %err.code(), hint = err.hint(), "{err}");
        }
        if self.resolver.config().verbose {
            info!(
                modules = report.outcomes.len(),
                failed = report.failures().count(),
                "composition finished"
            );
        }
        report
    }
}
