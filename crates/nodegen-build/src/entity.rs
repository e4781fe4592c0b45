use crate::{
    Generator,
    artifact::{Artifact, ArtifactKind},
    error::GenerateError,
    naming,
};
use nodegen_schema::prelude::*;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeSet;
use syn::Ident;

/// Associated constant every accessor declares besides the property ones.
const NODE_NAME: &str = "NODE_NAME";

///
/// IndexGroup
///
/// Indexed plain attributes of one class, grouped under the first index
/// that covers each of them.
///

struct IndexGroup<'m> {
    index: &'m Index,
    method: Ident,
    members: Vec<Ident>,
}

// generate
pub fn generate(generator: &Generator<'_>, class: &Class) -> Result<Artifact, GenerateError> {
    let fqn = class.fqn();
    let host = generator.host();
    let ty = naming::ident(class.name(), format!("class '{fqn}'"))?;
    let node_name = Generator::node_name(&class.ident);

    let (base, node_body) = match generator.resolved_parent(class) {
        Some(parent) => (
            generator.classifier_path(&parent.ident)?,
            quote!(self.base.node()),
        ),
        None => (quote!(#host::BaseNode), quote!(&self.base)),
    };

    let mut consts = Vec::new();
    let mut methods = Vec::new();
    let mut groups: Vec<IndexGroup<'_>> = Vec::new();
    let mut declared = BTreeSet::from([NODE_NAME.to_string()]);

    for prop in class.properties() {
        let name_const = Generator::const_ident(prop)?;
        let prop_name = &prop.ident;
        claim(&mut declared, &name_const, &fqn, prop_name)?;
        consts.push(quote! {
            pub const #name_const: &'static str = #prop_name;
        });

        match prop.kind {
            PropertyKind::Attribute => {
                let primitive = Generator::attribute_primitive(class, prop)?;
                let type_const = naming::ident(
                    &naming::type_constant(prop_name),
                    format!("the type constant of '{prop_name}'"),
                )?;
                claim(&mut declared, &type_const, &fqn, prop_name)?;
                let tag = generator.type_tag(primitive);
                consts.push(quote! {
                    pub const #type_const: u8 = #tag;
                });

                if !prop.is_stored() {
                    tracing::debug!(class = %fqn, property = %prop_name, "derived or learned, no accessors");
                    continue;
                }

                if let Some(algorithm) = prop.algorithm() {
                    methods.push(learned_accessors(
                        generator, prop, primitive, &name_const, algorithm,
                    )?);
                    continue;
                }

                let reindex = match generator.model.indexes_of(&fqn, prop_name).first().copied() {
                    Some(index) => {
                        let method = group_for(&mut groups, index)?;
                        method.members.push(name_const.clone());
                        generator
                            .config
                            .reindex_on_write
                            .then(|| method.method.clone())
                    }
                    None => None,
                };
                methods.push(attribute_accessors(
                    prop, primitive, &name_const, &type_const, reindex,
                )?);
            }
            PropertyKind::Relation => {
                if !prop.is_stored() {
                    tracing::debug!(class = %fqn, property = %prop_name, "derived relation, no accessors");
                    continue;
                }
                methods.push(relation_accessors(generator, class, prop, &name_const)?);
            }
        }
    }

    for group in &groups {
        methods.push(index_method(generator, group)?);
    }

    let header = Generator::header(&fqn);
    let doc = format!(" Typed view over `{node_name}` nodes.");
    let tokens = quote! {
        #header

        #[doc = #doc]
        #[derive(Clone)]
        pub struct #ty {
            base: #base,
        }

        impl #ty {
            pub const NODE_NAME: &'static str = #node_name;
            #(#consts)*

            #[must_use]
            pub fn new(world: i64, time: i64, id: i64, graph: #host::Graph) -> Self {
                Self {
                    base: <#base>::new(world, time, id, graph),
                }
            }

            #[must_use]
            pub fn node(&self) -> &#host::BaseNode {
                #node_body
            }

            #(#methods)*
        }

        impl ::std::ops::Deref for #ty {
            type Target = #base;

            fn deref(&self) -> &Self::Target {
                &self.base
            }
        }

        impl #host::TypedNode for #ty {
            const NODE_NAME: &'static str = #node_name;

            fn node(&self) -> &#host::BaseNode {
                #node_body
            }
        }
    };

    Artifact::render(
        class.name(),
        Generator::package_of(&class.ident),
        ArtifactKind::Entity,
        tokens,
    )
}

// claim
// name and type-tag constants share the accessor's namespace with NODE_NAME
fn claim(
    declared: &mut BTreeSet<String>,
    constant: &Ident,
    class: &str,
    property: &str,
) -> Result<(), GenerateError> {
    let constant = constant.to_string();
    if declared.insert(constant.clone()) {
        Ok(())
    } else {
        Err(GenerateError::InvalidIdentifier {
            context: format!("a second constant on '{class}', from property '{property}'"),
            value: constant,
        })
    }
}

// group_for
fn group_for<'g, 'm>(
    groups: &'g mut Vec<IndexGroup<'m>>,
    index: &'m Index,
) -> Result<&'g mut IndexGroup<'m>, GenerateError> {
    let fqn = index.fqn();
    let position = match groups.iter().position(|g| g.index.fqn() == fqn) {
        Some(position) => position,
        None => {
            groups.push(IndexGroup {
                index,
                method: naming::ident(
                    &naming::method("index", index.name()),
                    format!("index '{fqn}'"),
                )?,
                members: Vec::new(),
            });
            groups.len() - 1
        }
    };

    Ok(&mut groups[position])
}

fn attribute_accessors(
    prop: &Property,
    primitive: Primitive,
    name_const: &Ident,
    type_const: &Ident,
    reindex: Option<Ident>,
) -> Result<TokenStream, GenerateError> {
    let getter = naming::ident(&naming::method("get", &prop.ident), "a getter")?;
    let setter = naming::ident(&naming::method("set", &prop.ident), "a setter")?;
    let value_ty = naming::value_type(primitive);
    let refresh = reindex.map(|method| quote!(self.#method();));

    Ok(quote! {
        #[must_use]
        pub fn #getter(&self) -> Option<#value_ty> {
            self.node().get::<#value_ty>(Self::#name_const)
        }

        pub fn #setter(&self, value: #value_ty) -> &Self {
            self.node().set(Self::#name_const, Self::#type_const, value);
            #refresh
            self
        }
    })
}

// learned_accessors
// the regression node hangs off the attribute's own relation; reads only look
// it up, the first write creates it
fn learned_accessors(
    generator: &Generator<'_>,
    prop: &Property,
    primitive: Primitive,
    name_const: &Ident,
    algorithm: &str,
) -> Result<TokenStream, GenerateError> {
    let host = generator.host();
    let getter = naming::ident(&naming::method("get", &prop.ident), "a getter")?;
    let setter = naming::ident(&naming::method("set", &prop.ident), "a setter")?;
    let value_ty = naming::value_type(primitive);
    let keys = prop.parameters().keys();
    let values = prop.parameters().values().map(|v| parameter_value(v));

    Ok(quote! {
        /// Extrapolated value, `None` before the first write.
        #[must_use]
        pub fn #getter(&self) -> Option<#value_ty> {
            let node = self.node();
            let gate = node.graph().new_sync_counter(1);
            let waiter = gate.clone();

            node.relation(Self::#name_const, move |found: Vec<#host::Node>| {
                match found
                    .into_iter()
                    .find_map(#host::Node::downcast::<#host::ml::RegressionNode>)
                {
                    Some(learner) => learner.extrapolate(move |value: Option<#value_ty>| waiter.wrap(value)),
                    None => waiter.wrap::<#value_ty>(None),
                }
            });

            gate.wait_result::<#value_ty>()
        }

        pub fn #setter(&self, value: #value_ty) -> &Self {
            let node = self.node();
            let graph = node.graph();
            let gate = graph.new_sync_counter(1);
            let waiter = gate.clone();
            let (world, time) = (node.world(), node.time());
            let owner = node.clone();

            node.relation(Self::#name_const, move |found: Vec<#host::Node>| {
                let existing = found
                    .into_iter()
                    .find_map(#host::Node::downcast::<#host::ml::RegressionNode>);
                let learner = match existing {
                    Some(learner) => Some(learner),
                    None => {
                        let created = graph.new_typed_node(world, time, #algorithm);
                        #(created.set_parameter(#keys, #values);)*
                        owner.add_to_relation(Self::#name_const, &created);
                        created.downcast::<#host::ml::RegressionNode>()
                    }
                };

                match learner {
                    Some(learner) => learner.learn(value, move || waiter.count()),
                    None => waiter.count(),
                }
            });

            gate.wait();
            self
        }
    })
}

fn parameter_value(value: &str) -> TokenStream {
    if let Ok(lit) = syn::parse_str::<syn::Lit>(value) {
        return quote!(#lit);
    }
    if let Some(Ok(lit)) = value
        .strip_prefix('-')
        .map(syn::parse_str::<syn::LitInt>)
    {
        return quote!(-#lit);
    }
    if let Some(Ok(lit)) = value
        .strip_prefix('-')
        .map(syn::parse_str::<syn::LitFloat>)
    {
        return quote!(-#lit);
    }

    quote!(#value)
}

fn relation_accessors(
    generator: &Generator<'_>,
    class: &Class,
    prop: &Property,
    name_const: &Ident,
) -> Result<TokenStream, GenerateError> {
    let host = generator.host();
    let Some((target_fqn, target)) = generator.relation_target(prop)? else {
        tracing::warn!(class = %class.ident, relation = %prop.ident, ty = %prop.ty, "relation to a primitive type, skipped");
        return Ok(TokenStream::new());
    };

    let getter = naming::ident(&naming::method("get", &prop.ident), "a relation getter")?;
    let add = naming::ident(&naming::method("add_to", &prop.ident), "a relation mutator")?;
    let remove = naming::ident(&naming::method("remove_from", &prop.ident), "a relation mutator")?;

    let (add_opposite, remove_opposite) = match opposite_helpers(generator, prop, &target_fqn)? {
        Some((add_internal, remove_internal)) => (
            Some(quote!(value.#add_internal(self);)),
            Some(quote!(value.#remove_internal(self);)),
        ),
        None => (None, None),
    };

    let internal = if needs_internal(generator, class, prop) {
        let add_internal = naming::ident(
            &naming::method("internal_add_to", &prop.ident),
            "an internal relation mutator",
        )?;
        let remove_internal = naming::ident(
            &naming::method("internal_remove_from", &prop.ident),
            "an internal relation mutator",
        )?;

        quote! {
            pub(crate) fn #add_internal(&self, value: &#target) {
                self.node().add_to_relation(Self::#name_const, value.node());
            }

            pub(crate) fn #remove_internal(&self, value: &#target) {
                self.node().remove_from_relation(Self::#name_const, value.node());
            }
        }
    } else {
        TokenStream::new()
    };

    Ok(quote! {
        pub fn #getter<F>(&self, callback: F)
        where
            F: FnOnce(Vec<#target>) + Send + 'static,
        {
            self.node().relation(Self::#name_const, move |found: Vec<#host::Node>| {
                callback(found.into_iter().filter_map(#host::Node::downcast::<#target>).collect());
            });
        }

        pub fn #add(&self, value: &#target) -> &Self {
            self.node().add_to_relation(Self::#name_const, value.node());
            #add_opposite
            self
        }

        pub fn #remove(&self, value: &#target) -> &Self {
            self.node().remove_from_relation(Self::#name_const, value.node());
            #remove_opposite
            self
        }

        #internal
    })
}

// opposite_helpers
// internal mutator names on the target class, when the opposite resolves
fn opposite_helpers(
    generator: &Generator<'_>,
    prop: &Property,
    target_fqn: &str,
) -> Result<Option<(Ident, Ident)>, GenerateError> {
    let Some(opposite) = prop.opposite() else {
        return Ok(None);
    };

    match generator.model.find_property(target_fqn, opposite) {
        Some((_, found)) if found.is_relation() && found.is_stored() => Ok(Some((
            naming::ident(
                &naming::method("internal_add_to", opposite),
                "an opposite mutator",
            )?,
            naming::ident(
                &naming::method("internal_remove_from", opposite),
                "an opposite mutator",
            )?,
        ))),
        _ => {
            tracing::warn!(
                relation = %prop.ident,
                target = target_fqn,
                opposite,
                "opposite is not a stored relation on the target, mutators stay one-sided"
            );
            Ok(None)
        }
    }
}

// needs_internal
// a relation gets internal mutators when it declares an opposite or some
// other relation names it as theirs
fn needs_internal(generator: &Generator<'_>, class: &Class, prop: &Property) -> bool {
    if prop.opposite().is_some() {
        return true;
    }

    let fqn = class.fqn();
    generator.model.classes().any(|other| {
        other.properties().any(|r| {
            r.is_relation()
                && r.opposite() == Some(prop.ident.as_str())
                && generator
                    .model
                    .find_property(&r.ty, &prop.ident)
                    .is_some_and(|(owner, _)| owner.fqn() == fqn)
        })
    })
}

fn index_method(generator: &Generator<'_>, group: &IndexGroup<'_>) -> Result<TokenStream, GenerateError> {
    let host = generator.host();
    let model = generator.model_path()?;
    let index_const = naming::ident(
        &naming::index_constant(group.index.name()),
        format!("index '{}'", group.index.fqn()),
    )?;
    let method = &group.method;
    let members = &group.members;

    Ok(quote! {
        /// Re-register this node under the index with its current values.
        pub fn #method(&self) {
            let node = self.node();
            let gate = node.graph().new_sync_counter(1);
            let waiter = gate.clone();
            let entry = node.clone();

            node.graph().index(node.world(), node.time(), #model::#index_const, move |index: #host::NodeIndex| {
                index.remove_from_index(&entry, &[#(Self::#members),*]);
                index.add_to_index(&entry, &[#(Self::#members),*]);
                waiter.count();
            });

            gate.wait();
        }
    })
}
