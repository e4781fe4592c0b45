use serde::{Deserialize, Serialize};

///
/// GeneratorConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Qualified name of the generated plugin/model pair, e.g. `sample.Sample`.
    pub target: String,

    /// Path of the host graph runtime crate.
    pub host: String,

    /// Module path the generated package tree is mounted under.
    pub root: String,

    /// Make setters of indexed attributes refresh their index.
    pub reindex_on_write: bool,
}

impl GeneratorConfig {
    pub const DEFAULT_HOST: &'static str = "::greycat";
    pub const DEFAULT_ROOT: &'static str = "crate";

    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target: "App".to_string(),
            host: Self::DEFAULT_HOST.to_string(),
            root: Self::DEFAULT_ROOT.to_string(),
            reindex_on_write: false,
        }
    }
}
