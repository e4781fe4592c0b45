mod json;
mod scan;

pub use json::JsonNotation;
pub use scan::{deep_scan, scan};

use crate::{
    model::Model,
    node::{Class, Classifier, Enum, NodeError},
};
use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Node(#[from] NodeError),
}

///
/// NotationParser
///
/// Turns one model source file into classifier definitions. The concrete
/// notation is up to the implementor.
///

pub trait NotationParser {
    /// File name suffix this parser accepts, including the leading dot.
    fn extension(&self) -> &str;

    fn parse(
        &self,
        path: &std::path::Path,
        source: &str,
        builder: &mut ModelBuilder,
    ) -> Result<(), BuildError>;
}

///
/// IndexDef
/// An index waiting for its owning class to be fully populated.
///

#[derive(Clone, Debug)]
struct IndexDef {
    fqn: String,
    class: String,
    properties: Vec<String>,
}

///
/// ModelBuilder
///
/// Collects definitions from any number of sources and produces the final
/// model. Classes and enums land in the order they were added, so a later
/// definition of the same fqn wins. Indexes are applied last so that they
/// resolve against complete classes no matter which file declared them.
///

#[derive(Debug, Default)]
pub struct ModelBuilder {
    definitions: Vec<Classifier>,
    indexes: Vec<IndexDef>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: Class) -> &mut Self {
        self.definitions.push(class.into());
        self
    }

    pub fn add_enum(&mut self, node: Enum) -> &mut Self {
        self.definitions.push(node.into());
        self
    }

    pub fn add_index<I, S>(&mut self, fqn: &str, class: &str, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexes.push(IndexDef {
            fqn: fqn.to_string(),
            class: class.to_string(),
            properties: properties.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn build(self) -> Result<Model, BuildError> {
        let mut model = Model::new();

        for classifier in self.definitions {
            model.add_classifier(classifier);
        }
        for def in self.indexes {
            model.add_index(
                &def.fqn,
                &def.class,
                def.properties.iter().map(String::as_str),
            )?;
        }

        tracing::debug!(classifiers = model.len(), "model populated");

        Ok(model)
    }
}
