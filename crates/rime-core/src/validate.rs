//! Reference checks on a module's declarations.
//!
//! The graph builder trusts its input and skips what it can't place. These
//! checks turn the same conditions into errors so a malformed batch from the
//! extraction front end is caught instead of silently producing a smaller
//! graph.

use std::collections::HashSet;

use tracing::trace;

use crate::error::ResolveError;
use crate::model::{ModuleDeclaration, QualifiedName};

/// Check that `module` is self-contained and free of duplicates.
///
/// # Errors
///
/// - [`ResolveError::ForeignDeclaration`] if a bean is named in another
///   module. Sockets may carry a foreign name: a socket standing in for a
///   bean of an imported component keeps that bean's name.
/// - [`ResolveError::DuplicateDeclaration`] if a name is declared twice.
/// - [`ResolveError::MalformedDeclaration`] if a dependency targets a name
///   that is neither a bean nor a socket of the module. For nested
///   dependencies the target is the bean owning the navigated members.
///
/// Declarations are checked in order and the first problem is returned.
pub fn validate_module(module: &ModuleDeclaration) -> Result<(), ResolveError> {
    let mut declared: HashSet<&QualifiedName> =
        HashSet::with_capacity(module.beans.len() + module.sockets.len());

    if let Some(bean) = module.beans.iter().find(|bean| bean.name.module() != &module.name) {
        return Err(ResolveError::ForeignDeclaration {
            module: module.name.clone(),
            name: bean.name.clone(),
        });
    }

    let names = module
        .beans
        .iter()
        .map(|bean| &bean.name)
        .chain(module.sockets.iter().map(|socket| &socket.name));
    for name in names {
        if !declared.insert(name) {
            return Err(ResolveError::DuplicateDeclaration {
                module: module.name.clone(),
                name: name.clone(),
            });
        }
    }

    for bean in &module.beans {
        for dependency in &bean.dependencies {
            if !declared.contains(&dependency.target) {
                return Err(ResolveError::MalformedDeclaration {
                    module: module.name.clone(),
                    bean: bean.name.clone(),
                    target: dependency.target.clone(),
                });
            }
        }
    }

    trace!(module = %module.name, declared = declared.len(), "declarations validated");
    Ok(())
}
