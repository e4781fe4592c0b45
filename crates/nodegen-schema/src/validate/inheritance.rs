use crate::{model::Model, validate::Diagnostic};

// Report parents that are not in the model and parent chains that loop.
pub fn validate_parents(model: &Model, diags: &mut Vec<Diagnostic>) {
    for class in model.classes() {
        let Some(parent) = class.parent.as_deref() else {
            continue;
        };
        let route = class.fqn();

        if model.class(parent).is_none() {
            diags.push(Diagnostic::new(
                &route,
                format!("parent class '{parent}' is not in the model"),
            ));
            continue;
        }

        // parent_chain stops at the first repeat; a chain ending on a class
        // that still has a resolvable parent means it looped
        let chain = model.parent_chain(&route);
        if let Some(last) = chain.last()
            && model.parent_of(last).is_some()
        {
            diags.push(Diagnostic::new(&route, "inheritance chain contains a cycle"));
        }
    }
}
