use nodegen_build::GeneratorConfig;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_FILE: &str = "nodegen.toml";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

///
/// CliConfig
///

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub generator: GeneratorConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(path, &source)
    }

    fn parse(path: &Path, source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An explicit path must exist; the default file is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

///
/// InputConfig
///

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub dir: PathBuf,
    pub deep: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("model"),
            deep: false,
        }
    }
}

///
/// OutputConfig
///

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("generated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = CliConfig::parse(Path::new("nodegen.toml"), "").unwrap();

        assert_eq!(config.input.dir, PathBuf::from("model"));
        assert!(!config.input.deep);
        assert_eq!(config.output.dir, PathBuf::from("generated"));
        assert_eq!(config.generator, GeneratorConfig::default());
    }

    #[test]
    fn tables_override_defaults() {
        let source = r#"
            [input]
            dir = "schema"
            deep = true

            [generator]
            target = "sample.Sample"
            reindex_on_write = true
        "#;

        let config = CliConfig::parse(Path::new("nodegen.toml"), source).unwrap();

        assert_eq!(config.input.dir, PathBuf::from("schema"));
        assert!(config.input.deep);
        assert_eq!(config.generator.target, "sample.Sample");
        assert_eq!(config.generator.host, GeneratorConfig::DEFAULT_HOST);
        assert!(config.generator.reindex_on_write);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CliConfig::parse(Path::new("nodegen.toml"), "[input]\nfolder = \"x\"\n")
            .unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::resolve(Some(&dir.path().join("absent.toml"))).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
