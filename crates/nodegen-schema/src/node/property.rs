use crate::{OPPOSITE_PARAM, types::TypeRef};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, ops::Not};

///
/// PropertyKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Attribute,
    Relation,
}

///
/// Dependency
/// Path to another property a derived value is computed from.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Dependency {
    pub path: String,
}

impl Dependency {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

///
/// PropertyFlags
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PropertyFlags {
    #[serde(default, skip_serializing_if = "Not::not")]
    derived: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    learned: bool,

    #[serde(default, skip_serializing_if = "Not::not")]
    global: bool,
}

///
/// Property
///
/// A named field of a class. Flags only ever go from unset to set.
///

#[derive(Clone, Debug, Serialize)]
pub struct Property {
    pub ident: String,
    pub ty: String,
    pub kind: PropertyKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    algorithm: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<Dependency>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, String>,

    #[serde(flatten)]
    flags: PropertyFlags,
}

impl Property {
    #[must_use]
    pub fn new(ident: &str, ty: &str, kind: PropertyKind) -> Self {
        Self {
            ident: ident.to_string(),
            ty: ty.to_string(),
            kind,
            algorithm: None,
            dependencies: Vec::new(),
            parameters: BTreeMap::new(),
            flags: PropertyFlags::default(),
        }
    }

    #[must_use]
    pub fn attribute(ident: &str, ty: &str) -> Self {
        Self::new(ident, ty, PropertyKind::Attribute)
    }

    #[must_use]
    pub fn relation(ident: &str, ty: &str) -> Self {
        Self::new(ident, ty, PropertyKind::Relation)
    }

    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::resolve(&self.ty)
    }

    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    pub fn set_algorithm(&mut self, alg: impl Into<String>) {
        self.algorithm = Some(alg.into());
    }

    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }

    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn add_parameter(&mut self, param: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(param.into(), value.into());
    }

    /// Name of the symmetric relation on the target class, if declared.
    #[must_use]
    pub fn opposite(&self) -> Option<&str> {
        self.parameters.get(OPPOSITE_PARAM).map(String::as_str)
    }

    #[must_use]
    pub const fn derived(&self) -> bool {
        self.flags.derived
    }

    pub const fn set_derived(&mut self) {
        self.flags.derived = true;
    }

    #[must_use]
    pub const fn learned(&self) -> bool {
        self.flags.learned
    }

    pub const fn set_learned(&mut self) {
        self.flags.learned = true;
    }

    #[must_use]
    pub const fn global(&self) -> bool {
        self.flags.global
    }

    pub const fn set_global(&mut self) {
        self.flags.global = true;
    }

    /// Stored directly on the node, so it gets plain accessors.
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        !self.flags.derived && !self.flags.learned
    }

    #[must_use]
    pub const fn is_attribute(&self) -> bool {
        matches!(self.kind, PropertyKind::Attribute)
    }

    #[must_use]
    pub const fn is_relation(&self) -> bool {
        matches!(self.kind, PropertyKind::Relation)
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident
    }
}

impl Eq for Property {}

impl PartialOrd for Property {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// properties are totally ordered by name alone
impl Ord for Property {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ident.cmp(&other.ident)
    }
}
