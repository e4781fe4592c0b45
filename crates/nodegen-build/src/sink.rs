//! Destinations for generated artifacts.

use crate::{Error, artifact::Artifact};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// SinkError
///

#[derive(Debug, ThisError)]
pub enum SinkError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

///
/// ArtifactSink
///
/// Receives one artifact at a time. A failed write is reported for that
/// artifact only.
///

pub trait ArtifactSink {
    fn write(&mut self, artifact: &Artifact) -> Result<PathBuf, SinkError>;
}

///
/// FsSink
///

#[derive(Clone, Debug)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for FsSink {
    fn write(&mut self, artifact: &Artifact) -> Result<PathBuf, SinkError> {
        let path = self.root.join(artifact.relative_path());
        let io_err = |source| SinkError::Io {
            path: path.clone(),
            source,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(&path, &artifact.body).map_err(io_err)?;

        Ok(path)
    }
}

///
/// MemorySink
///

#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    #[must_use]
    pub const fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, artifact: &Artifact) -> Result<PathBuf, SinkError> {
        let path = artifact.relative_path();
        self.files.insert(path.clone(), artifact.body.clone());

        Ok(path)
    }
}

///
/// PersistReport
///

#[derive(Debug, Default)]
pub struct PersistReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, SinkError)>,
}

impl PersistReport {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    /// Collapse a partial persistence into [`Error::Incomplete`].
    pub fn into_result(self) -> Result<Vec<PathBuf>, Error> {
        if self.is_complete() {
            Ok(self.written)
        } else {
            Err(Error::Incomplete {
                failed: self.failed.len(),
                total: self.total(),
            })
        }
    }
}

// persist
// every artifact is attempted; a failure never stops the rest
pub fn persist(artifacts: &[Artifact], sink: &mut impl ArtifactSink) -> PersistReport {
    let mut report = PersistReport::default();

    for artifact in artifacts {
        match sink.write(artifact) {
            Ok(path) => report.written.push(path),
            Err(err) => {
                tracing::error!(%artifact, error = %err, "artifact not written");
                report.failed.push((artifact.fqn(), err));
            }
        }
    }

    tracing::info!(
        written = report.written.len(),
        failed = report.failed.len(),
        "artifacts persisted"
    );

    report
}
