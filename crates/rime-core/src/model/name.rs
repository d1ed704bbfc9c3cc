//! Module and bean naming.
//!
//! A [`QualifiedName`] renders as `<module>:<local>`, e.g.
//! `io.example.app:beanA`. Equality, hashing and ordering all follow that
//! rendered form so the same string always identifies the same node, and
//! sorting by name is stable across runs.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between the module path and the local name.
pub const MODULE_SEPARATOR: char = ':';

/// Separator between a bean local name and its nested member path.
pub const MEMBER_SEPARATOR: char = '.';

/// The dotted path of a module, e.g. `io.example.app`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Qualify a local name with this module.
    #[must_use]
    pub fn qualify(&self, local: impl Into<String>) -> QualifiedName {
        QualifiedName::new(self.clone(), local)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Globally unique key of a bean, socket or virtual node within a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    module: ModuleName,
    local: String,
}

impl QualifiedName {
    #[must_use]
    pub fn new(module: ModuleName, local: impl Into<String>) -> Self {
        Self {
            module,
            local: local.into(),
        }
    }

    #[must_use]
    pub const fn module(&self) -> &ModuleName {
        &self.module
    }

    #[must_use]
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Name of the virtual node reached by navigating `path` from this bean.
    ///
    /// `beanA` with `["someNested", "someRunnable"]` gives
    /// `beanA.someNested.someRunnable` in the same module.
    #[must_use]
    pub fn member<S: AsRef<str>>(&self, path: &[S]) -> Self {
        let mut local = self.local.clone();
        for segment in path {
            local.push(MEMBER_SEPARATOR);
            local.push_str(segment.as_ref());
        }
        Self::new(self.module.clone(), local)
    }

    /// Number of characters in the rendered form.
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.module.as_str().chars().count() + 1 + self.local.chars().count()
    }

    fn rendered_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.module
            .as_str()
            .bytes()
            .chain(std::iter::once(MODULE_SEPARATOR as u8))
            .chain(self.local.bytes())
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QualifiedName {}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rendered_bytes().cmp(other.rendered_bytes())
    }
}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.rendered_bytes() {
            state.write_u8(byte);
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{MODULE_SEPARATOR}{}", self.module, self.local)
    }
}

/// Error returned when a string is not of the form `<module>:<local>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid qualified name '{0}': expected '<module>:<local>'")]
pub struct InvalidQualifiedName(pub String);

impl FromStr for QualifiedName {
    type Err = InvalidQualifiedName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Local names never contain the separator; module paths never do either.
        match s.split_once(MODULE_SEPARATOR) {
            Some((module, local))
                if !module.is_empty() && !local.is_empty() && !local.contains(MODULE_SEPARATOR) =>
            {
                Ok(Self::new(ModuleName::new(module), local))
            }
            _ => Err(InvalidQualifiedName(s.to_string())),
        }
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = InvalidQualifiedName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedName> for String {
    fn from(value: QualifiedName) -> Self {
        value.to_string()
    }
}
