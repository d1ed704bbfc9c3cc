//! Declarations handed over by the extraction front end.
//!
//! These are plain values: nothing here is interpreted until the graph
//! builder turns a [`ModuleDeclaration`] into a
//! [`DependencyGraph`](crate::graph::DependencyGraph). Declaration order is
//! significant everywhere (diagram layout, tie-breaking in the resolver), so
//! beans, sockets and dependencies are kept in `Vec`s rather than sets.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::name::{ModuleName, QualifiedName};

/// How many instances of a bean the generated module creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One shared instance per module.
    #[default]
    Singleton,
    /// A new instance per injection site.
    Prototype,
}

/// How a dependency reaches its target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "path")]
pub enum DependencyKind {
    /// One constructor/setter argument pointing straight at a bean or socket.
    #[default]
    Direct,
    /// The injected value is a member of the target bean, reached by
    /// navigating `path` (e.g. a field of a field).
    Nested(Vec<String>),
}

/// One injection point of a bean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRef {
    /// The bean or socket that satisfies this dependency. For nested
    /// dependencies this is the bean owning the navigated members.
    pub target: QualifiedName,
    /// Constructor parameter or setter name.
    pub label: String,
    #[serde(default)]
    pub kind: DependencyKind,
}

impl DependencyRef {
    #[must_use]
    pub fn direct(target: QualifiedName, label: impl Into<String>) -> Self {
        Self {
            target,
            label: label.into(),
            kind: DependencyKind::Direct,
        }
    }

    #[must_use]
    pub fn nested<S: Into<String>>(
        target: QualifiedName,
        label: impl Into<String>,
        path: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            target,
            label: label.into(),
            kind: DependencyKind::Nested(path.into_iter().map(Into::into).collect()),
        }
    }

    /// Navigation segments for nested dependencies, empty for direct ones.
    #[must_use]
    pub fn path(&self) -> &[String] {
        match &self.kind {
            DependencyKind::Direct => &[],
            DependencyKind::Nested(path) => path,
        }
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        matches!(&self.kind, DependencyKind::Nested(path) if !path.is_empty())
    }
}

/// Opaque reference to a lifecycle method, passed through to code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHandle(pub String);

/// An injectable component declared by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanDeclaration {
    pub name: QualifiedName,
    #[serde(default)]
    pub strategy: Strategy,
    /// The bean is a supplier; its supplied value is what gets injected.
    #[serde(default)]
    pub is_wrapper: bool,
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
    #[serde(default)]
    pub init: Option<OperationHandle>,
    #[serde(default)]
    pub destroy: Option<OperationHandle>,
}

impl BeanDeclaration {
    #[must_use]
    pub const fn new(name: QualifiedName, strategy: Strategy) -> Self {
        Self {
            name,
            strategy,
            is_wrapper: false,
            dependencies: Vec::new(),
            init: None,
            destroy: None,
        }
    }

    #[must_use]
    pub const fn singleton(name: QualifiedName) -> Self {
        Self::new(name, Strategy::Singleton)
    }

    #[must_use]
    pub const fn prototype(name: QualifiedName) -> Self {
        Self::new(name, Strategy::Prototype)
    }

    #[must_use]
    pub const fn wrapper(mut self) -> Self {
        self.is_wrapper = true;
        self
    }

    #[must_use]
    pub fn depends_on(mut self, target: QualifiedName, label: impl Into<String>) -> Self {
        self.dependencies.push(DependencyRef::direct(target, label));
        self
    }

    #[must_use]
    pub fn depends_on_nested<S: Into<String>>(
        mut self,
        target: QualifiedName,
        label: impl Into<String>,
        path: impl IntoIterator<Item = S>,
    ) -> Self {
        self.dependencies.push(DependencyRef::nested(target, label, path));
        self
    }

    #[must_use]
    pub fn with_init(mut self, operation: impl Into<String>) -> Self {
        self.init = Some(OperationHandle(operation.into()));
        self
    }

    #[must_use]
    pub fn with_destroy(mut self, operation: impl Into<String>) -> Self {
        self.destroy = Some(OperationHandle(operation.into()));
        self
    }
}

/// A dependency the module expects its composing module to supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketDeclaration {
    pub name: QualifiedName,
    #[serde(default = "default_true")]
    pub required: bool,
}

impl SocketDeclaration {
    #[must_use]
    pub const fn required(name: QualifiedName) -> Self {
        Self {
            name,
            required: true,
        }
    }

    #[must_use]
    pub const fn optional(name: QualifiedName) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// A component module imported by another module.
///
/// `bindings` maps the local name of each of the component's sockets to the
/// importing module's bean or socket that plugs into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleImport {
    pub module: ModuleName,
    #[serde(default)]
    pub bindings: BTreeMap<String, QualifiedName>,
}

impl ModuleImport {
    #[must_use]
    pub const fn new(module: ModuleName) -> Self {
        Self {
            module,
            bindings: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn bind(mut self, socket: impl Into<String>, provider: QualifiedName) -> Self {
        self.bindings.insert(socket.into(), provider);
        self
    }
}

/// Everything a module declares, supplied as one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub name: ModuleName,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub beans: Vec<BeanDeclaration>,
    #[serde(default)]
    pub sockets: Vec<SocketDeclaration>,
    #[serde(default)]
    pub imports: Vec<ModuleImport>,
    /// When non-empty, only these imports are composed.
    #[serde(default)]
    pub includes: BTreeSet<ModuleName>,
    /// Imports that are never composed.
    #[serde(default)]
    pub excludes: BTreeSet<ModuleName>,
}

impl ModuleDeclaration {
    #[must_use]
    pub const fn new(name: ModuleName, version: u32) -> Self {
        Self {
            name,
            version,
            beans: Vec::new(),
            sockets: Vec::new(),
            imports: Vec::new(),
            includes: BTreeSet::new(),
            excludes: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_bean(mut self, bean: BeanDeclaration) -> Self {
        self.beans.push(bean);
        self
    }

    #[must_use]
    pub fn with_socket(mut self, socket: SocketDeclaration) -> Self {
        self.sockets.push(socket);
        self
    }

    #[must_use]
    pub fn with_import(mut self, import: ModuleImport) -> Self {
        self.imports.push(import);
        self
    }

    /// Qualify a local name with this module's name.
    #[must_use]
    pub fn qualify(&self, local: impl Into<String>) -> QualifiedName {
        self.name.qualify(local)
    }

    #[must_use]
    pub fn bean(&self, name: &QualifiedName) -> Option<&BeanDeclaration> {
        self.beans.iter().find(|bean| &bean.name == name)
    }

    #[must_use]
    pub fn socket(&self, name: &QualifiedName) -> Option<&SocketDeclaration> {
        self.sockets.iter().find(|socket| &socket.name == name)
    }

    /// Whether `name` is declared here as a bean or a socket.
    #[must_use]
    pub fn declares(&self, name: &QualifiedName) -> bool {
        self.bean(name).is_some() || self.socket(name).is_some()
    }
}

const fn default_true() -> bool {
    true
}

const fn default_version() -> u32 {
    1
}
