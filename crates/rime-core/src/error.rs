use std::fmt;

use crate::model::{ModuleName, QualifiedName};

/// Machine-readable error codes for tools driving the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    MalformedDeclaration,
    DuplicateDeclaration,
    CycleDetected,
    UnsupportedModuleVersion,
    UnboundSocket,
    UnknownSocketBinding,
    MissingComponentModule,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::MalformedDeclaration => "E2001",
            Self::DuplicateDeclaration => "E2002",
            Self::CycleDetected => "E2003",
            Self::UnsupportedModuleVersion => "E3001",
            Self::UnboundSocket => "E3002",
            Self::UnknownSocketBinding => "E3003",
            Self::MissingComponentModule => "E3004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::MalformedDeclaration => "Dependency targets an undeclared name",
            Self::DuplicateDeclaration => "Name declared more than once",
            Self::CycleDetected => "Dependency cycle in module",
            Self::UnsupportedModuleVersion => "Unsupported module version",
            Self::UnboundSocket => "Required socket is not bound",
            Self::UnknownSocketBinding => "Binding names an unknown socket",
            Self::MissingComponentModule => "Imported module not available",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in rime.toml and retry."),
            Self::MalformedDeclaration => {
                Some("Declare the target as a bean or socket of the same module.")
            }
            Self::CycleDetected => {
                Some("Break the cycle, e.g. by injecting a supplier or moving a dependency to a setter.")
            }
            Self::UnsupportedModuleVersion => Some("Recompile the component module with this compiler."),
            Self::UnboundSocket => Some("Bind the socket in the importing module, or declare it optional."),
            Self::MissingComponentModule => {
                Some("Make the imported module available, or exclude it.")
            }
            Self::DuplicateDeclaration | Self::UnknownSocketBinding => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// One message attached to a declaration site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub anchor: QualifiedName,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every cycle of one module, as one diagnostic per reportable node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("module {module} has {} dependency cycle diagnostic(s)", .diagnostics.len())]
pub struct CycleError {
    pub module: ModuleName,
    pub diagnostics: Vec<Diagnostic>,
}

// ---------------------------------------------------------------------------
// ResolveError
// ---------------------------------------------------------------------------

/// Why a module could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("bean {bean} in module {module} depends on {target}, which is neither a bean nor a socket of the module")]
    MalformedDeclaration {
        module: ModuleName,
        bean: QualifiedName,
        target: QualifiedName,
    },

    #[error("{name} is declared more than once in module {module}")]
    DuplicateDeclaration { module: ModuleName, name: QualifiedName },

    #[error("{name} does not belong to module {module}")]
    ForeignDeclaration { module: ModuleName, name: QualifiedName },

    #[error(transparent)]
    Cycles(#[from] CycleError),
}

impl ResolveError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedDeclaration { .. } | Self::ForeignDeclaration { .. } => {
                ErrorCode::MalformedDeclaration
            }
            Self::DuplicateDeclaration { .. } => ErrorCode::DuplicateDeclaration,
            Self::Cycles(_) => ErrorCode::CycleDetected,
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    /// Cycle diagnostics, empty for every other kind of failure.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Cycles(err) => &err.diagnostics,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 8] = [
        ErrorCode::ConfigParseError,
        ErrorCode::MalformedDeclaration,
        ErrorCode::DuplicateDeclaration,
        ErrorCode::CycleDetected,
        ErrorCode::UnsupportedModuleVersion,
        ErrorCode::UnboundSocket,
        ErrorCode::UnknownSocketBinding,
        ErrorCode::MissingComponentModule,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let text = code.code();
            assert_eq!(text.len(), 5);
            assert!(text.starts_with('E'));
            assert!(text.chars().skip(1).all(|c| c.is_ascii_digit()));
            assert_eq!(code.to_string(), text);
        }
    }

    #[test]
    fn resolve_error_maps_to_codes() {
        let m = ModuleName::new("m");
        let dup = ResolveError::DuplicateDeclaration {
            module: m.clone(),
            name: m.qualify("a"),
        };
        assert_eq!(dup.code(), ErrorCode::DuplicateDeclaration);
        assert!(dup.diagnostics().is_empty());

        let cycles: ResolveError = CycleError {
            module: m.clone(),
            diagnostics: vec![Diagnostic {
                anchor: m.qualify("a"),
                message: "boom".to_string(),
            }],
        }
        .into();
        assert_eq!(cycles.code(), ErrorCode::CycleDetected);
        assert!(cycles.hint().is_some());
        assert_eq!(cycles.diagnostics().len(), 1);
        assert_eq!(cycles.to_string(), "module m has 1 dependency cycle diagnostic(s)");
    }
}
