mod class;
mod r#enum;
mod index;
mod property;

pub use class::*;
pub use r#enum::*;
pub use index::*;
pub use property::*;

use crate::FQN_SEPARATOR;
use serde::Serialize;
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// NodeError
///

#[derive(Debug, ThisError)]
pub enum NodeError {
    #[error("index '{index}' references unknown class '{class}'")]
    UnknownIndexClass { index: String, class: String },

    #[error("index '{index}' references unknown property '{property}' on class '{class}'")]
    UnknownIndexProperty {
        index: String,
        class: String,
        property: String,
    },

    #[error("classifier name is empty in '{0}'")]
    EmptyName(String),
}

///
/// QualifiedName
///
/// A classifier name with its optional dot-separated package.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct QualifiedName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub name: String,
}

impl QualifiedName {
    #[must_use]
    pub fn new(package: Option<&str>, name: &str) -> Self {
        Self {
            package: package.filter(|p| !p.is_empty()).map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Split a fully-qualified name at its last separator.
    pub fn parse(fqn: &str) -> Result<Self, NodeError> {
        let (package, name) = match fqn.rfind(FQN_SEPARATOR) {
            Some(pos) => (Some(&fqn[..pos]), &fqn[pos + 1..]),
            None => (None, fqn),
        };

        if name.is_empty() {
            return Err(NodeError::EmptyName(fqn.to_string()));
        }

        Ok(Self::new(package, name))
    }

    #[must_use]
    pub fn fqn(&self) -> String {
        match &self.package {
            Some(package) => format!("{package}{FQN_SEPARATOR}{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Package segments, lower-cased the way generated module paths expect.
    #[must_use]
    pub fn package_segments(&self) -> Vec<String> {
        self.package
            .as_deref()
            .map(|p| {
                p.split(FQN_SEPARATOR)
                    .filter(|s| !s.is_empty())
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn())
    }
}

///
/// ClassifierKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClassifierKind {
    Class,
    Enum,
    Index,
}

///
/// Classifier
///
/// Closed set of top-level model concepts.
///

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    Class(Class),
    Enum(Enum),
    Index(Index),
}

impl Classifier {
    #[must_use]
    pub const fn ident(&self) -> &QualifiedName {
        match self {
            Self::Class(node) => &node.ident,
            Self::Enum(node) => &node.ident,
            Self::Index(node) => &node.ident,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.ident().name
    }

    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.ident().package.as_deref()
    }

    #[must_use]
    pub fn fqn(&self) -> String {
        self.ident().fqn()
    }

    #[must_use]
    pub const fn kind(&self) -> ClassifierKind {
        match self {
            Self::Class(_) => ClassifierKind::Class,
            Self::Enum(_) => ClassifierKind::Enum,
            Self::Index(_) => ClassifierKind::Index,
        }
    }
}

impl From<Class> for Classifier {
    fn from(node: Class) -> Self {
        Self::Class(node)
    }
}

impl From<Enum> for Classifier {
    fn from(node: Enum) -> Self {
        Self::Enum(node)
    }
}

impl From<Index> for Classifier {
    fn from(node: Index) -> Self {
        Self::Index(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn splits_at_last_separator() {
        let name = QualifiedName::parse("org.sample.Person").unwrap();
        assert_eq!(name.package.as_deref(), Some("org.sample"));
        assert_eq!(name.name, "Person");
        assert_eq!(name.fqn(), "org.sample.Person");
    }

    #[test]
    fn unpackaged_name_has_no_package() {
        let name = QualifiedName::parse("Person").unwrap();
        assert_eq!(name.package, None);
        assert_eq!(name.fqn(), "Person");
    }

    #[test]
    fn trailing_separator_is_rejected() {
        assert!(matches!(
            QualifiedName::parse("org.sample."),
            Err(NodeError::EmptyName(_))
        ));
    }

    #[test]
    fn package_segments_are_lower_cased() {
        let name = QualifiedName::parse("Org.Sample.Person").unwrap();
        assert_eq!(name.package_segments(), vec!["org", "sample"]);
    }

    proptest! {
        #[test]
        fn fqn_round_trips(
            package in proptest::option::of("[a-z][a-z0-9]{0,6}(\\.[a-z][a-z0-9]{0,6}){0,3}"),
            name in "[A-Z][A-Za-z0-9]{0,10}",
        ) {
            let ident = QualifiedName::new(package.as_deref(), &name);
            let fqn = ident.fqn();

            match &package {
                Some(p) => prop_assert_eq!(&fqn, &format!("{p}.{name}")),
                None => prop_assert_eq!(&fqn, &name),
            }

            let parsed = QualifiedName::parse(&fqn).unwrap();
            prop_assert_eq!(parsed, ident);
        }
    }
}
