//! Built-in task steps. Only their serialized form matters here; evaluating
//! one passes the current result through.

use super::{Action, Buffer, TaskAction, TaskContext};

///
/// Named
///

struct Named {
    name: &'static str,
    args: Vec<String>,
}

impl TaskAction for Named {
    fn eval(&self, ctx: TaskContext) {
        ctx.continue_with(ctx.result().nodes().to_vec());
    }

    fn serialize(&self, buffer: &mut Buffer) {
        buffer.write_str(self.name);
        buffer.write_str("(");
        buffer.write_str(&self.args.join(","));
        buffer.write_str(")");
    }
}

fn named<const N: usize>(name: &'static str, args: [&str; N]) -> Action {
    Action::new(Named {
        name,
        args: args.iter().map(ToString::to_string).collect(),
    })
}

#[must_use]
pub fn travel_in_world(world: &str) -> Action {
    named("travelInWorld", [world])
}

#[must_use]
pub fn create_typed_node(type_name: &str) -> Action {
    named("createTypedNode", [type_name])
}

#[must_use]
pub fn set_attribute(name: &str, tag: u8, value: &str) -> Action {
    named("setAttribute", [name, &tag.to_string(), value])
}

#[must_use]
pub fn attribute(name: &str) -> Action {
    named("attribute", [name])
}

#[must_use]
pub fn add_var_to_relation(relation: &str, variable: &str) -> Action {
    named("addVarToRelation", [relation, variable])
}

#[must_use]
pub fn traverse(relation: &str) -> Action {
    named("traverse", [relation])
}

#[must_use]
pub fn read_global_index(index: &str) -> Action {
    named("readGlobalIndex", [index])
}

#[must_use]
pub fn add_to_global_index(index: &str, attributes: &[&str]) -> Action {
    let mut args = vec![index.to_string()];
    args.extend(attributes.iter().map(ToString::to_string));

    Action::new(Named {
        name: "addToGlobalIndex",
        args,
    })
}
