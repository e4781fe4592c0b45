use crate::node::{Class, NodeError, QualifiedName};
use serde::Serialize;
use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

///
/// Index
///
/// Composite lookup key over one class. Members are kept in property-name
/// order regardless of the order they were requested in.
///

#[derive(Clone, Debug, Serialize)]
pub struct Index {
    pub ident: QualifiedName,
    pub class: String,
    properties: BTreeSet<String>,
}

impl Index {
    /// Resolve every property name against the owning class.
    pub fn new<'a>(
        ident: QualifiedName,
        class: &Class,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, NodeError> {
        let mut index = Self {
            ident,
            class: class.fqn(),
            properties: BTreeSet::new(),
        };

        for name in names {
            index.add_property(class, name)?;
        }

        Ok(index)
    }

    fn add_property(&mut self, class: &Class, name: &str) -> Result<(), NodeError> {
        let Some(prop) = class.property(name) else {
            return Err(NodeError::UnknownIndexProperty {
                index: self.ident.fqn(),
                class: class.fqn(),
                property: name.to_string(),
            });
        };

        self.properties.insert(prop.ident.clone());

        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.ident.name
    }

    #[must_use]
    pub fn fqn(&self) -> String {
        self.ident.fqn()
    }

    /// Member property names in key order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(String::as_str)
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.properties().collect::<Vec<_>>().join(", ");

        write!(f, "{} ON {} ({fields})", self.fqn(), self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Property;
    use proptest::prelude::*;

    fn person() -> Class {
        let mut class = Class::new(QualifiedName::new(Some("sample"), "Person"));
        for name in ["email", "name", "age", "zip"] {
            class.add_property(Property::attribute(name, "String"));
        }
        class
    }

    #[test]
    fn unknown_property_is_reported() {
        let err = Index::new(
            QualifiedName::new(Some("sample"), "byPhone"),
            &person(),
            ["phone"],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            NodeError::UnknownIndexProperty { ref property, .. } if property == "phone"
        ));
    }

    #[test]
    fn duplicates_collapse() {
        let index = Index::new(
            QualifiedName::new(None, "byEmail"),
            &person(),
            ["email", "email"],
        )
        .unwrap();

        assert_eq!(index.properties().collect::<Vec<_>>(), vec!["email"]);
        assert_eq!(index.to_string(), "byEmail ON sample.Person (email)");
    }

    proptest! {
        #[test]
        fn member_order_ignores_insertion_order(
            names in Just(vec!["email", "name", "age", "zip"]).prop_shuffle(),
        ) {
            let index = Index::new(
                QualifiedName::new(Some("sample"), "composite"),
                &person(),
                names.iter().copied(),
            )
            .unwrap();

            prop_assert_eq!(
                index.properties().collect::<Vec<_>>(),
                vec!["age", "email", "name", "zip"]
            );
        }
    }
}
