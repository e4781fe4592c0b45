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

// generate
// the application entry point: graph lifecycle, worlds, factories and
// index queries
pub fn generate(generator: &Generator<'_>) -> Result<Artifact, GenerateError> {
    let host = generator.host();
    let name = generator.model_name();
    let ty = naming::ident(&name, "the model facade")?;
    let plugin = generator.plugin_path()?;

    let ml = generator
        .uses_learning()
        .then(|| quote!(let builder = builder.with_plugin(#host::ml::MlPlugin);));

    let mut index_consts = Vec::new();
    let mut seen = BTreeSet::new();
    for index in generator.model.indexes() {
        let constant = naming::index_constant(index.name());
        if !seen.insert(constant.clone()) {
            return Err(GenerateError::InvalidIdentifier {
                context: format!("a second index named '{}'", index.name()),
                value: constant,
            });
        }
        let constant = naming::ident(&constant, format!("index '{}'", index.fqn()))?;
        let index_name = index.name();
        index_consts.push(quote! {
            pub const #constant: &'static str = #index_name;
        });
    }

    let factories = generator
        .model
        .classes()
        .map(|class| factory(generator, class))
        .collect::<Result<Vec<_>, _>>()?;
    let queries = generator
        .model
        .indexes()
        .map(|index| queries(generator, index))
        .collect::<Result<Vec<_>, _>>()?;

    let header = Generator::header(generator.target_name());
    let tokens = quote! {
        #header

        static PLANNED_WORLD: ::std::sync::OnceLock<i64> = ::std::sync::OnceLock::new();

        /// Owns the graph and exposes typed factories and index queries.
        #[derive(Clone)]
        pub struct #ty {
            graph: #host::Graph,
        }

        impl #ty {
            pub const REAL_WORLD: i64 = 0;
            #(#index_consts)*

            #[must_use]
            pub fn new(builder: #host::GraphBuilder) -> Self {
                let builder = builder.with_plugin(#plugin);
                #ml

                Self {
                    graph: builder.build(),
                }
            }

            #[must_use]
            pub const fn graph(&self) -> &#host::Graph {
                &self.graph
            }

            /// World forked from the real world on the first successful connect.
            #[must_use]
            pub fn planned_world() -> Option<i64> {
                PLANNED_WORLD.get().copied()
            }

            /// Current wall-clock time in milliseconds.
            #[must_use]
            pub fn now() -> i64 {
                ::std::time::SystemTime::now()
                    .duration_since(::std::time::UNIX_EPOCH)
                    .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            }

            pub fn connect<F>(&self, callback: F)
            where
                F: FnOnce(bool) + Send + 'static,
            {
                let graph = self.graph.clone();
                self.graph.connect(move |connected: bool| {
                    if connected {
                        PLANNED_WORLD.get_or_init(|| graph.fork(Self::REAL_WORLD));
                    }
                    callback(connected);
                });
            }

            pub fn disconnect<F>(&self, callback: F)
            where
                F: FnOnce(bool) + Send + 'static,
            {
                self.graph.disconnect(callback);
            }

            pub fn save<F>(&self, callback: F)
            where
                F: FnOnce(bool) + Send + 'static,
            {
                self.graph.save(callback);
            }

            #(#factories)*

            #(#queries)*
        }
    };

    Artifact::render(
        name,
        generator.target_package(None),
        ArtifactKind::Model,
        tokens,
    )
}

fn factory(generator: &Generator<'_>, class: &Class) -> Result<TokenStream, GenerateError> {
    let path = generator.classifier_path(&class.ident)?;
    let method = naming::ident(
        &naming::method("new", class.name()),
        format!("the factory of '{}'", class.ident),
    )?;

    Ok(quote! {
        /// `None` when no factory is registered for the type.
        #[must_use]
        pub fn #method(&self, world: i64, time: i64) -> Option<#path> {
            self.graph
                .new_typed_node(world, time, <#path>::NODE_NAME)
                .downcast::<#path>()
        }
    })
}

// queries
// both resolve the index if it exists and narrow hits to the indexed class
fn queries(generator: &Generator<'_>, index: &Index) -> Result<TokenStream, GenerateError> {
    let host = generator.host();
    let class = match generator.model.class(&index.class) {
        Some(class) => class.ident.clone(),
        None => QualifiedName::parse(&index.class)?,
    };
    let path = generator.classifier_path(&class)?;
    let constant = naming::ident(
        &naming::index_constant(index.name()),
        format!("index '{}'", index.fqn()),
    )?;
    let find = naming::ident(&naming::method("find", index.name()), "an index query")?;
    let find_all = naming::ident(&naming::method("find_all", index.name()), "an index query")?;

    Ok(quote! {
        pub fn #find<F>(&self, world: i64, time: i64, query: &str, callback: F)
        where
            F: FnOnce(Vec<#path>) + Send + 'static,
        {
            let query = query.to_string();
            self.graph.index_if_exists(world, time, Self::#constant, move |index: Option<#host::NodeIndex>| {
                match index {
                    Some(index) => index.find(&query, move |found: Vec<#host::Node>| {
                        callback(found.into_iter().filter_map(#host::Node::downcast::<#path>).collect());
                    }),
                    None => callback(Vec::new()),
                }
            });
        }

        pub fn #find_all<F>(&self, world: i64, time: i64, callback: F)
        where
            F: FnOnce(Vec<#path>) + Send + 'static,
        {
            self.graph.index_if_exists(world, time, Self::#constant, move |index: Option<#host::NodeIndex>| {
                match index {
                    Some(index) => index.find_all(move |found: Vec<#host::Node>| {
                        callback(found.into_iter().filter_map(#host::Node::downcast::<#path>).collect());
                    }),
                    None => callback(Vec::new()),
                }
            });
        }
    })
}
