use crate::{
    Generator,
    artifact::{Artifact, ArtifactKind},
    error::GenerateError,
    naming,
};
use nodegen_schema::prelude::*;
use quote::quote;
use std::collections::BTreeSet;

// generate
// one enum artifact per model enum, literals in declaration order
pub fn generate(_: &Generator<'_>, node: &Enum) -> Result<Artifact, GenerateError> {
    let fqn = node.ident.fqn();
    let ty = naming::ident(&node.ident.name, format!("enum '{fqn}'"))?;

    let mut seen = BTreeSet::new();
    let mut variants = Vec::with_capacity(node.literals.len());
    for literal in &node.literals {
        let variant = naming::pascal(literal);
        if !seen.insert(variant.clone()) {
            return Err(GenerateError::InvalidIdentifier {
                context: format!("a second literal of '{fqn}'"),
                value: literal.clone(),
            });
        }
        variants.push(naming::ident(&variant, format!("literal of '{fqn}'"))?);
    }
    let literals = &node.literals;
    let header = Generator::header(&fqn);

    let tokens = quote! {
        #header

        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub enum #ty {
            #(#variants,)*
        }

        impl #ty {
            pub const ALL: &'static [Self] = &[#(Self::#variants),*];

            /// Literal as declared in the model.
            #[must_use]
            pub const fn literal(self) -> &'static str {
                match self {
                    #(Self::#variants => #literals,)*
                }
            }

            #[must_use]
            pub fn from_literal(literal: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.literal() == literal)
            }
        }

        impl ::std::fmt::Display for #ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.literal())
            }
        }
    };

    Artifact::render(
        node.ident.name.clone(),
        Generator::package_of(&node.ident),
        ArtifactKind::Enum,
        tokens,
    )
}
