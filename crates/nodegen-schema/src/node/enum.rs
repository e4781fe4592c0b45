use crate::node::QualifiedName;
use serde::Serialize;

///
/// Enum
///

#[derive(Clone, Debug, Serialize)]
pub struct Enum {
    pub ident: QualifiedName,
    pub literals: Vec<String>,
}

impl Enum {
    #[must_use]
    pub const fn new(ident: QualifiedName) -> Self {
        Self {
            ident,
            literals: Vec::new(),
        }
    }

    pub fn add_literal(&mut self, literal: impl Into<String>) {
        self.literals.push(literal.into());
    }
}
