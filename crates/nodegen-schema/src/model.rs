use crate::node::{Class, Classifier, Enum, Index, NodeError, Property, QualifiedName};
use std::collections::{BTreeMap, BTreeSet};

///
/// IndexMember
/// One row of the index <-> property relation table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
struct IndexMember {
    index: String,
    class: String,
    property: String,
}

///
/// Model
///
/// Registry of every classifier, keyed and iterated by fqn.
///

#[derive(Clone, Debug, Default)]
pub struct Model {
    classifiers: BTreeMap<String, Classifier>,
    members: Vec<IndexMember>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a classifier under its fqn. A previous entry with the same fqn is
    /// replaced without error.
    pub fn add_classifier(&mut self, classifier: impl Into<Classifier>) {
        let classifier = classifier.into();
        let fqn = classifier.fqn();

        if let Some(Classifier::Index(_)) = self.classifiers.get(&fqn) {
            self.members.retain(|m| m.index != fqn);
        }
        if let Classifier::Index(index) = &classifier {
            for property in index.properties() {
                self.members.push(IndexMember {
                    index: fqn.clone(),
                    class: index.class.clone(),
                    property: property.to_string(),
                });
            }
        }

        self.classifiers.insert(fqn, classifier);
    }

    /// Build an index over a registered class and register it.
    pub fn add_index<'a>(
        &mut self,
        fqn: &str,
        class: &str,
        properties: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), NodeError> {
        let ident = QualifiedName::parse(fqn)?;
        let Some(owner) = self.class(class) else {
            return Err(NodeError::UnknownIndexClass {
                index: fqn.to_string(),
                class: class.to_string(),
            });
        };

        let index = Index::new(ident, owner, properties)?;
        self.add_classifier(index);

        Ok(())
    }

    #[must_use]
    pub fn get(&self, fqn: &str) -> Option<&Classifier> {
        self.classifiers.get(fqn)
    }

    /// All classifiers in fqn order.
    pub fn classifiers(&self) -> impl Iterator<Item = &Classifier> {
        self.classifiers.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classifiers.values().filter_map(|c| match c {
            Classifier::Class(node) => Some(node),
            _ => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &Enum> {
        self.classifiers.values().filter_map(|c| match c {
            Classifier::Enum(node) => Some(node),
            _ => None,
        })
    }

    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.classifiers.values().filter_map(|c| match c {
            Classifier::Index(node) => Some(node),
            _ => None,
        })
    }

    #[must_use]
    pub fn class(&self, fqn: &str) -> Option<&Class> {
        match self.classifiers.get(fqn) {
            Some(Classifier::Class(node)) => Some(node),
            _ => None,
        }
    }

    #[must_use]
    pub fn index(&self, fqn: &str) -> Option<&Index> {
        match self.classifiers.get(fqn) {
            Some(Classifier::Index(node)) => Some(node),
            _ => None,
        }
    }

    /// Indexes covering a property, in the order they were registered.
    #[must_use]
    pub fn indexes_of(&self, class: &str, property: &str) -> Vec<&Index> {
        self.members
            .iter()
            .filter(|m| m.class == class && m.property == property)
            .filter_map(|m| self.index(&m.index))
            .collect()
    }

    /// Property names covered by an index, in key order.
    #[must_use]
    pub fn members_of(&self, index: &str) -> Vec<&str> {
        self.index(index)
            .map(|i| i.properties().collect())
            .unwrap_or_default()
    }

    /// The class followed by its ancestors. Stops at an absent parent or at
    /// the first class seen twice.
    #[must_use]
    pub fn parent_chain(&self, fqn: &str) -> Vec<&Class> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::new();
        let mut next = self.class(fqn);

        while let Some(class) = next {
            if !seen.insert(class.fqn()) {
                break;
            }
            chain.push(class);
            next = class.parent.as_deref().and_then(|p| self.class(p));
        }

        chain
    }

    /// Look a property up on a class, then on its ancestors.
    #[must_use]
    pub fn find_property(&self, class: &str, name: &str) -> Option<(&Class, &Property)> {
        self.parent_chain(class)
            .into_iter()
            .find_map(|c| c.property(name).map(|p| (c, p)))
    }

    /// Resolved parent class, if declared and present.
    #[must_use]
    pub fn parent_of(&self, class: &Class) -> Option<&Class> {
        class.parent.as_deref().and_then(|p| self.class(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(fqn: &str, props: &[(&str, &str)]) -> Class {
        let mut class = Class::new(QualifiedName::parse(fqn).unwrap());
        for (name, ty) in props {
            class.add_property(Property::attribute(name, ty));
        }
        class
    }

    #[test]
    fn last_write_wins() {
        let mut model = Model::new();
        model.add_classifier(class("sample.Person", &[("name", "String")]));
        model.add_classifier(class("sample.Person", &[("age", "Integer")]));

        assert_eq!(model.len(), 1);
        let person = model.class("sample.Person").unwrap();
        assert!(person.property("name").is_none());
        assert!(person.property("age").is_some());
    }

    #[test]
    fn traversal_is_sorted_by_fqn() {
        let mut model = Model::new();
        for fqn in ["b.Zeta", "a.Beta", "a.Alpha", "Root"] {
            model.add_classifier(class(fqn, &[]));
        }

        let order: Vec<_> = model.classifiers().map(Classifier::fqn).collect();
        assert_eq!(order, vec!["Root", "a.Alpha", "a.Beta", "b.Zeta"]);
    }

    #[test]
    fn index_registers_relation_rows() {
        let mut model = Model::new();
        model.add_classifier(class("sample.Person", &[("email", "String"), ("name", "String")]));
        model
            .add_index("sample.byEmail", "sample.Person", ["email"])
            .unwrap();
        model
            .add_index("sample.byContact", "sample.Person", ["name", "email"])
            .unwrap();

        let names: Vec<_> = model
            .indexes_of("sample.Person", "email")
            .into_iter()
            .map(Index::name)
            .collect();
        assert_eq!(names, vec!["byEmail", "byContact"]);
        assert_eq!(model.members_of("sample.byContact"), vec!["email", "name"]);
        assert!(model.indexes_of("sample.Person", "age").is_empty());
    }

    #[test]
    fn replacing_an_index_drops_stale_rows() {
        let mut model = Model::new();
        model.add_classifier(class("sample.Person", &[("email", "String"), ("name", "String")]));
        model
            .add_index("sample.lookup", "sample.Person", ["email"])
            .unwrap();
        model
            .add_index("sample.lookup", "sample.Person", ["name"])
            .unwrap();

        assert!(model.indexes_of("sample.Person", "email").is_empty());
        assert_eq!(model.indexes_of("sample.Person", "name").len(), 1);
    }

    #[test]
    fn index_on_unknown_class_fails() {
        let mut model = Model::new();
        let err = model
            .add_index("sample.byEmail", "sample.Ghost", ["email"])
            .unwrap_err();

        assert!(matches!(err, NodeError::UnknownIndexClass { .. }));
        assert!(model.is_empty());
    }

    #[test]
    fn parent_chain_stops_on_cycles() {
        let mut model = Model::new();
        let mut a = class("A", &[("x", "String")]);
        a.set_parent("B");
        let mut b = class("B", &[("y", "String")]);
        b.set_parent("A");
        model.add_classifier(a);
        model.add_classifier(b);

        let chain: Vec<_> = model.parent_chain("A").into_iter().map(Class::fqn).collect();
        assert_eq!(chain, vec!["A", "B"]);
        assert!(model.find_property("A", "y").is_some());
        assert!(model.find_property("A", "z").is_none());
    }
}
