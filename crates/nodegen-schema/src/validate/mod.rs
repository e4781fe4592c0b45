//! Model diagnostics.
//!
//! Nothing here rejects a model: the notation does not enforce referential
//! integrity, and the generator treats every reported case as absence. The
//! diagnostics exist so callers can surface likely modelling mistakes.

pub mod inheritance;
pub mod relation;

use crate::model::Model;
use std::fmt::{self, Display};

///
/// Diagnostic
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub route: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(route: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            message: message.into(),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.route, self.message)
    }
}

/// Run every model check in a fixed order.
#[must_use]
pub fn validate_model(model: &Model) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    inheritance::validate_parents(model, &mut diags);
    relation::validate_relations(model, &mut diags);

    diags
}
