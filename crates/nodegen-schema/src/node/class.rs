use crate::node::{Property, QualifiedName};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// Class
///

#[derive(Clone, Debug, Serialize)]
pub struct Class {
    pub ident: QualifiedName,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    properties: BTreeMap<String, Property>,
}

impl Class {
    #[must_use]
    pub const fn new(ident: QualifiedName) -> Self {
        Self {
            ident,
            parent: None,
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.ident.name
    }

    #[must_use]
    pub fn fqn(&self) -> String {
        self.ident.fqn()
    }

    pub fn set_parent(&mut self, parent: impl Into<String>) {
        self.parent = Some(parent.into());
    }

    /// Insert a property; a property with the same name is replaced.
    pub fn add_property(&mut self, property: Property) {
        self.properties.insert(property.ident.clone(), property);
    }

    /// Properties in name order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    // property
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties().find(|p| p.ident == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Class {
        let mut class = Class::new(QualifiedName::new(Some("sample"), "Person"));
        class.add_property(Property::attribute("name", "String"));
        class.add_property(Property::attribute("age", "Integer"));
        class
    }

    #[test]
    fn properties_iterate_by_name() {
        let class = person();
        let names: Vec<_> = class.properties().map(|p| p.ident.as_str()).collect();
        assert_eq!(names, vec!["age", "name"]);
    }

    #[test]
    fn missing_property_is_absent() {
        assert!(person().property("email").is_none());
    }

    #[test]
    fn same_name_replaces() {
        let mut class = person();
        class.add_property(Property::attribute("age", "Long"));

        assert_eq!(class.properties().count(), 2);
        assert_eq!(class.property("age").map(|p| p.ty.as_str()), Some("Long"));
    }
}
