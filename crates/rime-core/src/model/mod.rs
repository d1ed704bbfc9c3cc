//! Declaration model consumed by the resolver.
//!
//! - [`name`]: [`ModuleName`] and [`QualifiedName`], the identity of every
//!   graph node.
//! - [`decl`]: beans, sockets, dependency references and modules as
//!   produced by the extraction front end.

pub mod decl;
pub mod name;

pub use decl::{
    BeanDeclaration, DependencyKind, DependencyRef, ModuleDeclaration, ModuleImport,
    OperationHandle, SocketDeclaration, Strategy,
};
pub use name::{InvalidQualifiedName, ModuleName, QualifiedName};
