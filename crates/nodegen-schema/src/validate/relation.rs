use crate::{
    model::Model,
    node::{Classifier, PropertyKind},
    types::TypeRef,
    validate::Diagnostic,
};

// Relation targets must be classes in the model, and a declared opposite must
// exist as a relation on that target.
pub fn validate_relations(model: &Model, diags: &mut Vec<Diagnostic>) {
    for class in model.classes() {
        for prop in class.properties().filter(|p| p.kind == PropertyKind::Relation) {
            let route = format!("{}.{}", class.fqn(), prop.ident);

            let target = match prop.type_ref() {
                TypeRef::Primitive(p) => {
                    diags.push(Diagnostic::new(
                        &route,
                        format!("relation targets primitive type '{p}'"),
                    ));
                    continue;
                }
                TypeRef::Classifier(fqn) => fqn,
            };

            match model.get(&target) {
                Some(Classifier::Class(_)) => {}
                Some(_) => {
                    diags.push(Diagnostic::new(
                        &route,
                        format!("relation target '{target}' is not a class"),
                    ));
                    continue;
                }
                None => {
                    diags.push(Diagnostic::new(
                        &route,
                        format!("relation target '{target}' is not in the model"),
                    ));
                    continue;
                }
            }

            let Some(opposite) = prop.opposite() else {
                continue;
            };
            match model.find_property(&target, opposite) {
                Some((_, other)) if other.is_relation() => {}
                Some(_) => diags.push(Diagnostic::new(
                    &route,
                    format!("opposite '{opposite}' on '{target}' is not a relation"),
                )),
                None => diags.push(Diagnostic::new(
                    &route,
                    format!("opposite '{opposite}' is missing on '{target}'"),
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        OPPOSITE_PARAM,
        node::{Class, Property, QualifiedName},
    };

    fn model(car_props: Vec<Property>) -> Model {
        let mut owns = Property::relation("owns", "sample.Car");
        owns.add_parameter(OPPOSITE_PARAM, "ownedBy");

        let mut person = Class::new(QualifiedName::new(Some("sample"), "Person"));
        person.add_property(owns);
        person.add_property(Property::relation("friends", "sample.Ghost"));

        let mut car = Class::new(QualifiedName::new(Some("sample"), "Car"));
        for prop in car_props {
            car.add_property(prop);
        }

        let mut model = Model::new();
        model.add_classifier(person);
        model.add_classifier(car);
        model
    }

    #[test]
    fn flags_unknown_targets_and_missing_opposites() {
        let mut diags = Vec::new();
        validate_relations(&model(Vec::new()), &mut diags);

        let routes: Vec<_> = diags.iter().map(|d| d.route.as_str()).collect();
        assert_eq!(routes, vec!["sample.Person.friends", "sample.Person.owns"]);
        assert!(diags[1].message.contains("ownedBy"));
    }

    #[test]
    fn attribute_opposite_is_not_enough() {
        let mut diags = Vec::new();
        validate_relations(
            &model(vec![Property::attribute("ownedBy", "String")]),
            &mut diags,
        );

        assert!(diags.iter().any(|d| d.message.contains("is not a relation")));
    }

    #[test]
    fn symmetric_relation_is_clean() {
        let mut diags = Vec::new();
        validate_relations(
            &model(vec![Property::relation("ownedBy", "sample.Person")]),
            &mut diags,
        );

        assert_eq!(diags.len(), 1, "only the ghost target should be reported");
    }
}
