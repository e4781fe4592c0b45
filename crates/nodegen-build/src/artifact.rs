use crate::{error::GenerateError, naming};
use proc_macro2::TokenStream;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    path::PathBuf,
};

/// Module file stem used for package index artifacts.
pub const MODULE_INDEX: &str = "mod";

///
/// ArtifactKind
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Enum,
    Entity,
    Plugin,
    Model,
    TaskApi,
    Action,
    Select,
    TimeHelper,
    ModuleIndex,
}

///
/// Artifact
///
/// One generated compilation unit: a Rust module file at
/// `<package dirs>/<module>.rs`.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Artifact {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    pub kind: ArtifactKind,
    pub body: String,
}

impl Artifact {
    /// Pretty-print `tokens` into a new artifact.
    pub fn render(
        name: impl Into<String>,
        package: Option<String>,
        kind: ArtifactKind,
        tokens: TokenStream,
    ) -> Result<Self, GenerateError> {
        let name = name.into();
        let file = syn::parse2::<syn::File>(tokens).map_err(|source| GenerateError::Syntax {
            artifact: name.clone(),
            source,
        })?;

        Ok(Self {
            name,
            package,
            kind,
            body: prettyplease::unparse(&file),
        })
    }

    #[must_use]
    pub fn fqn(&self) -> String {
        match &self.package {
            Some(package) => format!("{package}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Module name the artifact is declared under.
    #[must_use]
    pub fn module(&self) -> String {
        match self.kind {
            ArtifactKind::ModuleIndex => MODULE_INDEX.to_string(),
            _ => naming::snake(&self.name),
        }
    }

    #[must_use]
    pub fn package_segments(&self) -> Vec<&str> {
        self.package
            .as_deref()
            .map(|p| p.split('.').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// File path relative to the output root.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.package_segments().into_iter().collect();
        path.push(format!("{}.rs", self.module()));
        path
    }
}

impl Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.fqn(), self.kind)
    }
}

///
/// ModuleTree
/// Package hierarchy used to inline every artifact into one source file.
///

#[derive(Debug, Default)]
struct ModuleTree<'a> {
    packages: BTreeMap<&'a str, ModuleTree<'a>>,
    artifacts: Vec<&'a Artifact>,
}

impl<'a> ModuleTree<'a> {
    fn insert(&mut self, segments: &[&'a str], artifact: &'a Artifact) {
        match segments.split_first() {
            Some((head, rest)) => self.packages.entry(*head).or_default().insert(rest, artifact),
            None => self.artifacts.push(artifact),
        }
    }

    fn write(&self, out: &mut String) {
        for artifact in &self.artifacts {
            out.push_str(&format!("pub mod {} {{\n", artifact.module()));
            out.push_str(&artifact.body);
            out.push_str("}\n");
        }
        for (name, tree) in &self.packages {
            out.push_str(&format!("pub mod {name} {{\n"));
            tree.write(out);
            out.push_str("}\n");
        }
    }
}

/// Nest every artifact into a single source file of inline modules, for
/// `include!` from a build script. Package index artifacts are skipped since
/// the nesting replaces them.
#[must_use]
pub fn inline(artifacts: &[Artifact]) -> String {
    let mut tree = ModuleTree::default();
    for artifact in artifacts {
        if artifact.kind != ArtifactKind::ModuleIndex {
            let segments = artifact.package_segments();
            tree.insert(&segments, artifact);
        }
    }

    let mut out = String::new();
    tree.write(&mut out);
    out
}
