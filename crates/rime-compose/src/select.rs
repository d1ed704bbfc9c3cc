//! Import selection, socket binding checks and root placeholders.

use std::collections::HashSet;

use rime_core::{
    ModuleDeclaration, ModuleImport, ModuleName, QualifiedName, ResolveError, SocketDeclaration,
};
use tracing::{debug, warn};

use crate::error::ComposeError;

/// Imports of `module` that take part in composition, in declaration order.
///
/// An import is skipped when `excludes` names it, or when `includes` is
/// non-empty and does not. An import listed twice is composed once.
#[must_use]
pub fn selected_imports(module: &ModuleDeclaration) -> Vec<&ModuleImport> {
    let mut seen = HashSet::new();
    module
        .imports
        .iter()
        .filter(|import| {
            let excluded = !module.excludes.is_empty() && module.excludes.contains(&import.module);
            let not_included =
                !module.includes.is_empty() && !module.includes.contains(&import.module);
            if excluded || not_included {
                debug!(import = %import.module, excluded, not_included, "import skipped");
                return false;
            }
            if !seen.insert(&import.module) {
                warn!(import = %import.module, "module imported more than once");
                return false;
            }
            true
        })
        .collect()
}

/// Check that `component` can be plugged into `importer` as described by
/// `import`.
///
/// # Errors
///
/// - [`ComposeError::UnsupportedVersion`] if the component was built for a
///   different module version.
/// - [`ComposeError::UnknownSocket`] if a binding names a socket the
///   component does not declare.
/// - [`ComposeError::Resolve`] with a malformed declaration if a binding's
///   provider is not declared by the importer.
/// - [`ComposeError::UnboundSocket`] if a required socket is left unbound.
pub fn check_import(
    importer: &ModuleDeclaration,
    import: &ModuleImport,
    component: &ModuleDeclaration,
    supported_version: u32,
) -> Result<(), ComposeError> {
    if component.version != supported_version {
        return Err(ComposeError::UnsupportedVersion {
            module: component.name.clone(),
            found: component.version,
            supported: supported_version,
        });
    }

    for (socket, provider) in &import.bindings {
        let socket_name = component.qualify(socket.as_str());
        if component.socket(&socket_name).is_none() {
            return Err(ComposeError::UnknownSocket {
                importer: importer.name.clone(),
                module: component.name.clone(),
                socket: socket.clone(),
            });
        }
        if !importer.declares(provider) {
            return Err(ResolveError::MalformedDeclaration {
                module: importer.name.clone(),
                bean: socket_name,
                target: provider.clone(),
            }
            .into());
        }
    }

    if let Some(unbound) = component
        .sockets
        .iter()
        .find(|socket| socket.required && !import.bindings.contains_key(socket.name.local()))
    {
        return Err(ComposeError::UnboundSocket {
            importer: importer.name.clone(),
            module: component.name.clone(),
            socket: unbound.name.clone(),
        });
    }

    Ok(())
}

/// Copy of `root` in which every bean of a selected component that `root`
/// depends on is declared as an optional socket.
///
/// The placeholder keeps the component bean's name; it never refers to the
/// component's graph.
#[must_use]
pub fn with_component_placeholders(
    root: &ModuleDeclaration,
    components: &[&ModuleDeclaration],
) -> ModuleDeclaration {
    let mut prepared = root.clone();
    let mut added: HashSet<&QualifiedName> = HashSet::new();

    for bean in &root.beans {
        for dependency in &bean.dependencies {
            let target = &dependency.target;
            if target.module() == &root.name || root.declares(target) || added.contains(target) {
                continue;
            }
            if provided_by(components, target.module(), target) {
                debug!(component_bean = %target, "component bean presented as socket");
                prepared
                    .sockets
                    .push(SocketDeclaration::optional(target.clone()));
                added.insert(target);
            }
        }
    }

    prepared
}

fn provided_by(
    components: &[&ModuleDeclaration],
    module: &ModuleName,
    bean: &QualifiedName,
) -> bool {
    components
        .iter()
        .any(|component| &component.name == module && component.bean(bean).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rime_core::{BeanDeclaration, ErrorCode};

    fn root_name() -> ModuleName {
        ModuleName::new("app")
    }

    fn component(name: &str) -> ModuleDeclaration {
        let m = ModuleName::new(name);
        ModuleDeclaration::new(m.clone(), 1)
            .with_bean(BeanDeclaration::singleton(m.qualify("pool")).depends_on(m.qualify("dataSource"), "dataSource"))
            .with_socket(SocketDeclaration::required(m.qualify("dataSource")))
            .with_socket(SocketDeclaration::optional(m.qualify("metrics")))
    }

    #[test]
    fn includes_and_excludes_filter_imports() {
        let mut root = ModuleDeclaration::new(root_name(), 1)
            .with_import(ModuleImport::new(ModuleName::new("db")))
            .with_import(ModuleImport::new(ModuleName::new("web")))
            .with_import(ModuleImport::new(ModuleName::new("cache")));

        let all: Vec<&str> = selected_imports(&root).iter().map(|i| i.module.as_str()).collect();
        assert_eq!(all, vec!["db", "web", "cache"]);

        root.excludes.insert(ModuleName::new("web"));
        let without_web: Vec<&str> = selected_imports(&root).iter().map(|i| i.module.as_str()).collect();
        assert_eq!(without_web, vec!["db", "cache"]);

        root.includes.insert(ModuleName::new("web"));
        root.includes.insert(ModuleName::new("cache"));
        let only: Vec<&str> = selected_imports(&root).iter().map(|i| i.module.as_str()).collect();
        assert_eq!(only, vec!["cache"]);
    }

    #[test]
    fn repeated_import_selected_once() {
        let root = ModuleDeclaration::new(root_name(), 1)
            .with_import(ModuleImport::new(ModuleName::new("db")))
            .with_import(ModuleImport::new(ModuleName::new("db")));
        assert_eq!(selected_imports(&root).len(), 1);
    }

    #[test]
    fn bound_required_socket_passes() {
        let root = ModuleDeclaration::new(root_name(), 1)
            .with_bean(BeanDeclaration::singleton(root_name().qualify("ds")));
        let import = ModuleImport::new(ModuleName::new("db")).bind("dataSource", root_name().qualify("ds"));
        assert_eq!(check_import(&root, &import, &component("db"), 1), Ok(()));
    }

    #[test]
    fn unbound_required_socket_fails() {
        let root = ModuleDeclaration::new(root_name(), 1);
        let import = ModuleImport::new(ModuleName::new("db"));
        let err = check_import(&root, &import, &component("db"), 1).expect_err("unbound");

        assert_eq!(err.code(), ErrorCode::UnboundSocket);
        assert!(err.to_string().contains("db:dataSource"));
    }

    #[test]
    fn binding_unknown_socket_fails() {
        let root = ModuleDeclaration::new(root_name(), 1)
            .with_bean(BeanDeclaration::singleton(root_name().qualify("ds")));
        let import = ModuleImport::new(ModuleName::new("db"))
            .bind("dataSource", root_name().qualify("ds"))
            .bind("nope", root_name().qualify("ds"));
        let err = check_import(&root, &import, &component("db"), 1).expect_err("unknown");

        assert_eq!(
            err,
            ComposeError::UnknownSocket {
                importer: root_name(),
                module: ModuleName::new("db"),
                socket: "nope".to_string(),
            }
        );
    }

    #[test]
    fn binding_to_undeclared_provider_is_malformed() {
        let root = ModuleDeclaration::new(root_name(), 1);
        let import = ModuleImport::new(ModuleName::new("db")).bind("dataSource", root_name().qualify("ghost"));
        let err = check_import(&root, &import, &component("db"), 1).expect_err("malformed");

        assert_eq!(err.code(), ErrorCode::MalformedDeclaration);
    }

    #[test]
    fn version_mismatch_fails_first() {
        let root = ModuleDeclaration::new(root_name(), 1);
        let mut db = component("db");
        db.version = 2;
        let err = check_import(&root, &ModuleImport::new(ModuleName::new("db")), &db, 1)
            .expect_err("version");

        assert_eq!(err.code(), ErrorCode::UnsupportedModuleVersion);
    }

    #[test]
    fn referenced_component_beans_become_optional_sockets() {
        let db = component("db");
        let pool = db.qualify("pool");
        let root = ModuleDeclaration::new(root_name(), 1)
            .with_bean(BeanDeclaration::singleton(root_name().qualify("repo")).depends_on(pool.clone(), "pool"))
            .with_bean(BeanDeclaration::singleton(root_name().qualify("audit")).depends_on(pool.clone(), "pool"));

        let prepared = with_component_placeholders(&root, &[&db]);
        assert_eq!(prepared.sockets.len(), 1);
        assert_eq!(prepared.sockets[0].name, pool);
        assert!(!prepared.sockets[0].required);
        assert_eq!(prepared.beans, root.beans);
    }

    #[test]
    fn unknown_component_beans_are_left_alone() {
        let db = component("db");
        let root = ModuleDeclaration::new(root_name(), 1).with_bean(
            BeanDeclaration::singleton(root_name().qualify("repo")).depends_on(db.qualify("missing"), "missing"),
        );

        let prepared = with_component_placeholders(&root, &[&db]);
        assert!(prepared.sockets.is_empty());
    }
}
