use rime_core::{Diagnostic, ErrorCode, ModuleName, QualifiedName, ResolveError};

/// Why a module of a composition could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("module {module} has version {found}, this compiler supports version {supported}")]
    UnsupportedVersion {
        module: ModuleName,
        found: u32,
        supported: u32,
    },

    #[error("required socket {socket} of module {module} is not bound by {importer}")]
    UnboundSocket {
        importer: ModuleName,
        module: ModuleName,
        socket: QualifiedName,
    },

    #[error("module {importer} binds socket '{socket}', which module {module} does not declare")]
    UnknownSocket {
        importer: ModuleName,
        module: ModuleName,
        socket: String,
    },

    #[error("module {importer} imports {module}, which is not available")]
    MissingComponent {
        importer: ModuleName,
        module: ModuleName,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl ComposeError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::UnsupportedModuleVersion,
            Self::UnboundSocket { .. } => ErrorCode::UnboundSocket,
            Self::UnknownSocket { .. } => ErrorCode::UnknownSocketBinding,
            Self::MissingComponent { .. } => ErrorCode::MissingComponentModule,
            Self::Resolve(err) => err.code(),
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    /// Cycle diagnostics carried by a resolution failure, empty otherwise.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Resolve(err) => err.diagnostics(),
            _ => &[],
        }
    }
}
