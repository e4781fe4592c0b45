//! Casing rules shared by every artifact.

use crate::error::GenerateError;
use convert_case::{Case, Casing};
use nodegen_schema::types::Primitive;
use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

/// Name-constant for a property: `ownedBy` -> `OWNED_BY`.
#[must_use]
pub fn constant(name: &str) -> String {
    name.to_case(Case::Constant)
}

/// Type-tag constant for an attribute: `email` -> `EMAIL_TYPE`.
#[must_use]
pub fn type_constant(name: &str) -> String {
    format!("{}_TYPE", constant(name))
}

/// Index-name constant on the model facade: `byEmail` -> `IDX_BY_EMAIL`.
#[must_use]
pub fn index_constant(name: &str) -> String {
    format!("IDX_{}", constant(name))
}

#[must_use]
pub fn snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

#[must_use]
pub fn pascal(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// Method name built from a verb prefix and a model name: `("add_to", "ownedBy")`
/// -> `add_to_owned_by`.
#[must_use]
pub fn method(prefix: &str, name: &str) -> String {
    format!("{prefix}_{}", snake(name))
}

/// Parse a generated name into an identifier, rejecting keywords.
pub fn ident(value: &str, context: impl Into<String>) -> Result<Ident, GenerateError> {
    syn::parse_str::<Ident>(value).map_err(|_| GenerateError::InvalidIdentifier {
        context: context.into(),
        value: value.to_string(),
    })
}

pub fn path(value: &str, context: impl Into<String>) -> Result<syn::Path, GenerateError> {
    syn::parse_str::<syn::Path>(value).map_err(|_| GenerateError::InvalidPath {
        context: context.into(),
        value: value.to_string(),
    })
}

/// Rust value type for an attribute primitive.
#[must_use]
pub fn value_type(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::Boolean => quote!(bool),
        Primitive::Double => quote!(f64),
        Primitive::Integer => quote!(i32),
        Primitive::Long => quote!(i64),
        Primitive::String => quote!(String),
    }
}
