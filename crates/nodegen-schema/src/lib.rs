//! Typed entity model consumed by the nodegen generator.
//!
//! The model is populated once (through [`build::ModelBuilder`] and a
//! [`build::NotationParser`]) and is read-only afterwards.

pub mod build;
pub mod model;
pub mod node;
pub mod types;
pub mod validate;

/// Separator between package segments and the classifier name.
pub const FQN_SEPARATOR: char = '.';

/// Parameter key naming the symmetric relation on the target class.
pub const OPPOSITE_PARAM: &str = "opposite";

use crate::{build::BuildError, node::NodeError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        model::Model,
        node::*,
        types::{Primitive, TypeRef},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    BuildError(#[from] BuildError),

    #[error(transparent)]
    NodeError(#[from] NodeError),
}
