//! Action-builder artifacts under the `task` sub-package.

use crate::{
    Generator,
    artifact::{Artifact, ArtifactKind},
    error::GenerateError,
    naming,
};
use nodegen_schema::prelude::*;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::BTreeSet;

const PACKAGE: &str = "task";
const OTHER_WORLD_ACTION: &str = "ActionResolvedInOtherWorld";

// generate
// the task api, the other-world action, then one select adapter per class
pub fn generate(generator: &Generator<'_>) -> Result<Vec<Artifact>, GenerateError> {
    let mut seen = BTreeSet::new();
    for class in generator.model.classes() {
        if !seen.insert(class.name()) {
            return Err(GenerateError::InvalidIdentifier {
                context: "a second class of the same name in the task api".to_string(),
                value: class.ident.fqn(),
            });
        }
    }

    let mut artifacts = vec![task_api(generator)?, other_world_action(generator)?];
    for class in generator.model.classes() {
        artifacts.push(select(generator, class)?);
    }

    Ok(artifacts)
}

fn package(generator: &Generator<'_>) -> Option<String> {
    generator.target_package(Some(PACKAGE))
}

//
// task api
//

fn task_api(generator: &Generator<'_>) -> Result<Artifact, GenerateError> {
    let host = generator.host();
    let model = generator.model_path()?;
    let action = generator.artifact_path(package(generator).as_deref(), OTHER_WORLD_ACTION)?;

    let mut functions = Vec::new();
    for class in generator.model.classes() {
        functions.push(class_functions(generator, class)?);
    }
    for index in generator.model.indexes() {
        functions.push(index_functions(generator, index)?);
    }

    let name = format!("{}TaskApi", generator.target_name());
    let header = Generator::header(generator.target_name());
    let tokens = quote! {
        #header

        #[must_use]
        pub fn travel_in_real_world() -> #host::Action {
            #host::actions::travel_in_world(&<#model>::REAL_WORLD.to_string())
        }

        /// Falls back to the real world until the model has connected once.
        #[must_use]
        pub fn travel_in_planned_world() -> #host::Action {
            let world = <#model>::planned_world().unwrap_or(<#model>::REAL_WORLD);
            #host::actions::travel_in_world(&world.to_string())
        }

        #(#functions)*

        #[must_use]
        pub fn get_planned_version_node() -> #host::Action {
            #host::Action::new(<#action>::new(true))
        }

        #[must_use]
        pub fn get_real_version_node() -> #host::Action {
            #host::Action::new(<#action>::new(false))
        }
    };

    Artifact::render(name, package(generator), ArtifactKind::TaskApi, tokens)
}

fn class_functions(generator: &Generator<'_>, class: &Class) -> Result<TokenStream, GenerateError> {
    let host = generator.host();
    let path = generator.classifier_path(&class.ident)?;
    let class_snake = naming::snake(class.name());
    let create = naming::ident(&format!("create_{class_snake}_node"), "a create action")?;

    let mut functions = vec![quote! {
        #[must_use]
        pub fn #create() -> #host::Action {
            #host::actions::create_typed_node(<#path>::NODE_NAME)
        }
    }];

    for prop in class.properties() {
        let name_const = Generator::const_ident(prop)?;
        let subject = format!("{class_snake}_{}", naming::snake(&prop.ident));

        match prop.kind {
            PropertyKind::Attribute => {
                let type_const = naming::ident(&naming::type_constant(&prop.ident), "a type constant")?;
                let set = naming::ident(&format!("set_{subject}"), "a set action")?;
                let get = naming::ident(&format!("get_{subject}"), "a get action")?;

                functions.push(quote! {
                    #[must_use]
                    pub fn #set(value: &str) -> #host::Action {
                        #host::actions::set_attribute(<#path>::#name_const, <#path>::#type_const, value)
                    }

                    #[must_use]
                    pub fn #get() -> #host::Action {
                        #host::actions::attribute(<#path>::#name_const)
                    }
                });
            }
            PropertyKind::Relation => {
                let add = naming::ident(&format!("add_to_{subject}"), "an add action")?;
                let traverse = naming::ident(&format!("traverse_{subject}"), "a traverse action")?;

                functions.push(quote! {
                    #[must_use]
                    pub fn #add(variable: &str) -> #host::Action {
                        #host::actions::add_var_to_relation(<#path>::#name_const, variable)
                    }

                    #[must_use]
                    pub fn #traverse() -> #host::Action {
                        #host::actions::traverse(<#path>::#name_const)
                    }
                });
            }
        }
    }

    Ok(quote!(#(#functions)*))
}

fn index_functions(generator: &Generator<'_>, index: &Index) -> Result<TokenStream, GenerateError> {
    let host = generator.host();
    let model = generator.model_path()?;
    let constant = naming::ident(&naming::index_constant(index.name()), "an index constant")?;
    let find_all = naming::ident(&naming::method("find_all", index.name()), "a find action")?;
    let add = naming::ident(&naming::method("index", index.name()), "an index action")?;

    let class = match generator.model.class(&index.class) {
        Some(class) => class.ident.clone(),
        None => QualifiedName::parse(&index.class)?,
    };
    let path = generator.classifier_path(&class)?;
    let members = index
        .properties()
        .map(|name| {
            naming::ident(
                &naming::constant(name),
                format!("member '{name}' of '{}'", index.fqn()),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        #[must_use]
        pub fn #find_all() -> #host::Action {
            #host::actions::read_global_index(<#model>::#constant)
        }

        #[must_use]
        pub fn #add() -> #host::Action {
            #host::actions::add_to_global_index(<#model>::#constant, &[#(<#path>::#members),*])
        }
    })
}

//
// other-world action
//

fn other_world_action(generator: &Generator<'_>) -> Result<Artifact, GenerateError> {
    let host = generator.host();
    let model = generator.model_path()?;
    let ty = format_ident!("{}", OTHER_WORLD_ACTION);

    let header = Generator::header(generator.target_name());
    let tokens = quote! {
        #header

        use ::std::sync::{Arc, Mutex};

        /// Replaces every node of the current result by its version in the
        /// planned or the real world, keeping result order.
        #[derive(Clone, Copy, Debug)]
        pub struct #ty {
            planned: bool,
        }

        impl #ty {
            #[must_use]
            pub const fn new(planned: bool) -> Self {
                Self { planned }
            }

            fn world(self) -> i64 {
                if self.planned {
                    <#model>::planned_world().unwrap_or(<#model>::REAL_WORLD)
                } else {
                    <#model>::REAL_WORLD
                }
            }
        }

        impl #host::TaskAction for #ty {
            fn eval(&self, ctx: #host::TaskContext) {
                let ids: Vec<i64> = ctx.result().nodes().iter().map(|node| node.id()).collect();
                let slots: Arc<Mutex<Vec<Option<#host::Node>>>> = Arc::new(Mutex::new(vec![None; ids.len()]));
                let counter = ctx.graph().new_counter(ids.len());
                let (world, time) = (self.world(), ctx.time());

                for (slot, id) in ids.into_iter().enumerate() {
                    let slots = Arc::clone(&slots);
                    let counter = counter.clone();
                    ctx.graph().lookup(world, time, id, move |found: Option<#host::Node>| {
                        if let Ok(mut slots) = slots.lock() {
                            slots[slot] = found;
                        }
                        counter.count();
                    });
                }

                counter.then(move || {
                    let resolved = slots
                        .lock()
                        .map(|mut slots| slots.drain(..).flatten().collect())
                        .unwrap_or_default();
                    ctx.continue_with(resolved);
                });
            }

            fn serialize(&self, buffer: &mut #host::Buffer) {
                buffer.write_str(if self.planned {
                    "getPlannedVersionNode()"
                } else {
                    "getRealVersionNode()"
                });
            }
        }
    };

    Artifact::render(OTHER_WORLD_ACTION, package(generator), ArtifactKind::Action, tokens)
}

//
// select adapters
//

fn select(generator: &Generator<'_>, class: &Class) -> Result<Artifact, GenerateError> {
    let host = generator.host();
    let path = generator.classifier_path(&class.ident)?;
    let name = format!("TaskFunctionSelect{}", class.name());
    let trait_ident = naming::ident(&name, "a select trait")?;
    let adapter = naming::ident(&format!("Select{}", class.name()), "a select adapter")?;
    let arg = naming::ident(&naming::snake(class.name()), "a select argument")?;

    let header = Generator::header(&class.fqn());
    let doc = format!(" Selection predicate over `{}` nodes.", class.name());
    let tokens = quote! {
        #header

        #[doc = #doc]
        pub trait #trait_ident: Send + Sync {
            fn select(&self, #arg: &#path, ctx: &#host::TaskContext) -> bool;
        }

        impl<F> #trait_ident for F
        where
            F: Fn(&#path, &#host::TaskContext) -> bool + Send + Sync,
        {
            fn select(&self, #arg: &#path, ctx: &#host::TaskContext) -> bool {
                self(#arg, ctx)
            }
        }

        /// Adapts a typed predicate to the host selection callback. Nodes of
        /// any other type are rejected.
        pub struct #adapter<T>(pub T);

        impl<T: #trait_ident> #host::TaskFunctionSelect for #adapter<T> {
            fn select(&self, node: &#host::Node, ctx: &#host::TaskContext) -> bool {
                node.downcast_ref::<#path>()
                    .is_some_and(|#arg| self.0.select(#arg, ctx))
            }
        }
    };

    Artifact::render(name, package(generator), ArtifactKind::Select, tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorConfig;

    fn model() -> Model {
        let mut person = Class::new(QualifiedName::parse("sample.Person").unwrap());
        person.add_property(Property::attribute("email", "String"));
        let mut owns = Property::relation("owns", "sample.Car");
        owns.add_parameter("opposite", "ownedBy");
        person.add_property(owns);

        let mut car = Class::new(QualifiedName::parse("sample.Car").unwrap());
        car.add_property(Property::relation("ownedBy", "sample.Person"));

        let mut model = Model::new();
        model.add_classifier(person);
        model.add_classifier(car);
        model
            .add_index("sample.byEmail", "sample.Person", ["email"])
            .unwrap();
        model
    }

    #[test]
    fn artifacts_land_in_the_task_package() {
        let model = model();
        let config = GeneratorConfig::new("sample.Sample");
        let artifacts = generate(&Generator::new(&model, &config).unwrap()).unwrap();

        let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "SampleTaskApi",
                "ActionResolvedInOtherWorld",
                "TaskFunctionSelectCar",
                "TaskFunctionSelectPerson"
            ]
        );
        assert!(artifacts.iter().all(|a| a.package.as_deref() == Some("sample.task")));
    }

    #[test]
    fn task_api_covers_properties_and_indexes() {
        let model = model();
        let config = GeneratorConfig::new("sample.Sample");
        let artifacts = generate(&Generator::new(&model, &config).unwrap()).unwrap();
        let body = &artifacts[0].body;

        for function in [
            "pub fn create_person_node()",
            "pub fn set_person_email(value: &str)",
            "pub fn get_person_email()",
            "pub fn add_to_person_owns(variable: &str)",
            "pub fn traverse_car_owned_by()",
            "pub fn find_all_by_email()",
            "pub fn index_by_email()",
            "pub fn get_planned_version_node()",
        ] {
            assert!(body.contains(function), "missing {function}");
        }
    }
}
