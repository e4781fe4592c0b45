//! Generator that maps a nodegen model onto typed Rust accessors for a
//! temporal graph-node host runtime.

mod artifact;
mod entity;
mod enums;
mod error;
mod facade;
mod macros;
mod modules;
mod naming;
mod plugin;
mod task;
mod time;

pub mod config;
pub mod sink;

pub use artifact::{Artifact, ArtifactKind, inline};
pub use config::GeneratorConfig;
pub use error::GenerateError;

use nodegen_schema::{
    build::{BuildError, JsonNotation, ModelBuilder, deep_scan, scan},
    prelude::*,
    validate::validate_model,
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use sink::{ArtifactSink, PersistReport, persist};
use std::path::Path;
use syn::Ident;
use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("{failed} of {total} artifacts could not be written")]
    Incomplete { failed: usize, total: usize },
}

// generate
/// Produce every artifact for `model`. Nothing is written; a fatal error
/// discards the whole set.
pub fn generate(model: &Model, config: &GeneratorConfig) -> Result<Vec<Artifact>, GenerateError> {
    Generator::new(model, config)?.generate()
}

/// Scan `dir` for JSON model files and build the model. Diagnostics are
/// logged, never fatal.
pub fn load_model(dir: &Path, deep: bool) -> Result<Model, BuildError> {
    let mut builder = ModelBuilder::new();
    let parsed = if deep {
        deep_scan(dir, &JsonNotation, &mut builder)?
    } else {
        scan(dir, &JsonNotation, &mut builder)?
    };
    let model = builder.build()?;

    tracing::info!(files = parsed, classifiers = model.len(), dir = %dir.display(), "model loaded");
    for diag in validate_model(&model) {
        tracing::warn!(%diag, "model diagnostic");
    }

    Ok(model)
}

/// Load, generate, and hand the artifacts to `sink`.
pub fn generate_dir(
    dir: &Path,
    deep: bool,
    config: &GeneratorConfig,
    sink: &mut impl ArtifactSink,
) -> Result<PersistReport, Error> {
    let model = load_model(dir, deep)?;
    let artifacts = generate(&model, config)?;

    Ok(persist(&artifacts, sink))
}

/// Load every model file under `dir` and return the artifacts as one
/// source file of inline modules.
pub fn generate_inline(dir: &Path, config: &GeneratorConfig) -> Result<String, Error> {
    let model = load_model(dir, true)?;
    let artifacts = generate(&model, config)?;

    Ok(inline(&artifacts))
}

///
/// Generator
///
/// Read-only view over one model and one configuration. Holds the parsed
/// names every artifact module needs.
///

pub(crate) struct Generator<'a> {
    pub(crate) model: &'a Model,
    pub(crate) config: &'a GeneratorConfig,
    target: QualifiedName,
    host: syn::Path,
    root: syn::Path,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(model: &'a Model, config: &'a GeneratorConfig) -> Result<Self, GenerateError> {
        let target = QualifiedName::parse(&config.target)?;
        naming::ident(&target.name, "the generation target")?;

        Ok(Self {
            model,
            config,
            target,
            host: naming::path(&config.host, "the host runtime")?,
            root: naming::path(&config.root, "the module root")?,
        })
    }

    /// Single pass over the model, then the global artifacts.
    pub(crate) fn generate(&self) -> Result<Vec<Artifact>, GenerateError> {
        let mut artifacts = Vec::new();

        for classifier in self.model.classifiers() {
            match classifier {
                Classifier::Enum(node) => artifacts.push(enums::generate(self, node)?),
                Classifier::Class(node) => artifacts.push(entity::generate(self, node)?),
                Classifier::Index(_) => {}
            }
        }

        artifacts.push(plugin::generate(self)?);
        artifacts.push(facade::generate(self)?);
        artifacts.extend(task::generate(self)?);
        artifacts.push(time::generate(self)?);
        let indexes = modules::generate(&artifacts)?;
        artifacts.extend(indexes);

        for artifact in &artifacts {
            tracing::debug!(%artifact, "artifact generated");
        }
        tracing::info!(
            artifacts = artifacts.len(),
            target = %self.target,
            "generation complete"
        );

        Ok(artifacts)
    }

    //
    // names
    //

    pub(crate) const fn host(&self) -> &syn::Path {
        &self.host
    }

    pub(crate) fn target_name(&self) -> &str {
        &self.target.name
    }

    /// Lower-cased package of a classifier, as a dotted string.
    pub(crate) fn package_of(ident: &QualifiedName) -> Option<String> {
        let segments = ident.package_segments();
        (!segments.is_empty()).then(|| segments.join("."))
    }

    /// Package of the global artifacts, optionally extended by `sub`.
    pub(crate) fn target_package(&self, sub: Option<&str>) -> Option<String> {
        match (Self::package_of(&self.target), sub) {
            (Some(base), Some(sub)) => Some(format!("{base}.{sub}")),
            (Some(base), None) => Some(base),
            (None, sub) => sub.map(str::to_string),
        }
    }

    /// Name the host registry knows a class by: lower-cased package plus name.
    pub(crate) fn node_name(ident: &QualifiedName) -> String {
        match Self::package_of(ident) {
            Some(package) => format!("{package}.{}", ident.name),
            None => ident.name.clone(),
        }
    }

    pub(crate) fn plugin_name(&self) -> String {
        format!("{}Plugin", self.target.name)
    }

    pub(crate) fn model_name(&self) -> String {
        format!("{}Model", self.target.name)
    }

    /// Full path of an artifact type: `<root>::<package>::<module>::<Name>`.
    pub(crate) fn artifact_path(
        &self,
        package: Option<&str>,
        name: &str,
    ) -> Result<TokenStream, GenerateError> {
        let segments = package
            .map(|p| {
                p.split('.')
                    .filter(|s| !s.is_empty())
                    .map(|s| naming::ident(s, format!("package of '{name}'")))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();
        let module = naming::ident(&naming::snake(name), format!("module of '{name}'"))?;
        let ty = naming::ident(name, "a generated type")?;
        let root = &self.root;

        Ok(quote!(#root #(:: #segments)* :: #module :: #ty))
    }

    pub(crate) fn classifier_path(&self, ident: &QualifiedName) -> Result<TokenStream, GenerateError> {
        self.artifact_path(Self::package_of(ident).as_deref(), &ident.name)
    }

    pub(crate) fn model_path(&self) -> Result<TokenStream, GenerateError> {
        self.artifact_path(self.target_package(None).as_deref(), &self.model_name())
    }

    pub(crate) fn plugin_path(&self) -> Result<TokenStream, GenerateError> {
        self.artifact_path(self.target_package(None).as_deref(), &self.plugin_name())
    }

    /// Leading inner doc comment naming the source of an artifact.
    pub(crate) fn header(source: &str) -> TokenStream {
        let doc = format!(" Generated by nodegen from `{source}`. Do not edit.");

        quote!(#![doc = #doc])
    }

    //
    // model queries
    //

    /// Declared parent, unless it is absent or leads back to `class`.
    pub(crate) fn resolved_parent(&self, class: &Class) -> Option<&'a Class> {
        let declared = class.parent.as_deref()?;
        let Some(parent) = self.model.class(declared) else {
            tracing::warn!(class = %class.ident, parent = declared, "parent class not in model, using the base node");
            return None;
        };

        let fqn = class.fqn();
        if self.model.parent_chain(declared).iter().any(|c| c.fqn() == fqn) {
            tracing::warn!(class = %class.ident, "inheritance cycle, using the base node");
            return None;
        }

        Some(parent)
    }

    /// Primitive of an attribute, or the fatal resolution error.
    pub(crate) fn attribute_primitive(
        class: &Class,
        prop: &Property,
    ) -> Result<Primitive, GenerateError> {
        prop.type_ref()
            .primitive()
            .ok_or_else(|| GenerateError::UnresolvedAttributeType {
                class: class.fqn(),
                property: prop.ident.clone(),
                ty: prop.ty.clone(),
            })
    }

    /// Target class fqn and type path of a relation. `None` for relations
    /// declared over a primitive.
    pub(crate) fn relation_target(
        &self,
        prop: &Property,
    ) -> Result<Option<(String, TokenStream)>, GenerateError> {
        let TypeRef::Classifier(fqn) = prop.type_ref() else {
            return Ok(None);
        };

        let ident = match self.model.get(&fqn) {
            Some(classifier) => classifier.ident().clone(),
            None => {
                tracing::warn!(relation = %prop.ident, target = %fqn, "relation target not in model");
                QualifiedName::parse(&fqn)?
            }
        };
        let path = self.classifier_path(&ident)?;

        Ok(Some((fqn, path)))
    }

    /// Whether any learned attribute exists, which needs the host ML plugin.
    pub(crate) fn uses_learning(&self) -> bool {
        self.model.classes().any(|class| {
            class
                .properties()
                .any(|p| p.is_attribute() && p.is_stored() && p.algorithm().is_some())
        })
    }

    pub(crate) fn type_tag(&self, primitive: Primitive) -> TokenStream {
        let host = &self.host;
        let tag = format_ident!("{}", primitive.tag());

        quote!(#host::Type::#tag)
    }

    pub(crate) fn const_ident(prop: &Property) -> Result<Ident, GenerateError> {
        naming::ident(
            &naming::constant(&prop.ident),
            format!("the constant of '{}'", prop.ident),
        )
    }
}
