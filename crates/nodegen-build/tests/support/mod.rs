#![allow(dead_code)]

use nodegen_build::{Artifact, ArtifactKind, GeneratorConfig};
use nodegen_schema::prelude::*;
use quote::ToTokens;
use syn::{ImplItem, ImplItemFn, Item, ItemImpl};

pub fn config() -> GeneratorConfig {
    GeneratorConfig::new("sample.Sample")
}

pub fn class(fqn: &str) -> Class {
    Class::new(QualifiedName::parse(fqn).unwrap())
}

pub fn relation(name: &str, target: &str, opposite: Option<&str>) -> Property {
    let mut prop = Property::relation(name, target);
    if let Some(opposite) = opposite {
        prop.add_parameter("opposite", opposite);
    }
    prop
}

pub fn generate(model: &Model) -> Vec<Artifact> {
    nodegen_build::generate(model, &config()).unwrap()
}

pub fn find<'a>(artifacts: &'a [Artifact], kind: ArtifactKind, name: &str) -> &'a Artifact {
    artifacts
        .iter()
        .find(|a| a.kind == kind && a.name == name)
        .unwrap_or_else(|| panic!("no {kind:?} artifact named {name}"))
}

pub fn parse(artifact: &Artifact) -> syn::File {
    syn::parse_file(&artifact.body).unwrap()
}

/// The inherent impl block of `ty`.
pub fn inherent_impl<'a>(file: &'a syn::File, ty: &str) -> &'a ItemImpl {
    file.items
        .iter()
        .find_map(|item| match item {
            Item::Impl(imp) if imp.trait_.is_none() && type_name(imp) == ty => Some(imp),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no inherent impl for {ty}"))
}

fn type_name(imp: &ItemImpl) -> String {
    imp.self_ty.to_token_stream().to_string()
}

pub fn method<'a>(imp: &'a ItemImpl, name: &str) -> Option<&'a ImplItemFn> {
    imp.items.iter().find_map(|item| match item {
        ImplItem::Fn(f) if f.sig.ident == name => Some(f),
        _ => None,
    })
}

pub fn constants(imp: &ItemImpl) -> Vec<String> {
    imp.items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Const(c) => Some(c.ident.to_string()),
            _ => None,
        })
        .collect()
}

/// Token text of a method body, whitespace as `quote` prints it.
pub fn body_text(f: &ImplItemFn) -> String {
    f.block.to_token_stream().to_string()
}
