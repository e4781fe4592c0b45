use crate::{
    build::{BuildError, ModelBuilder, NotationParser},
    node::{Class, Dependency, Enum, Property, PropertyKind, QualifiedName},
};
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};

///
/// JsonNotation
///
/// Reads models written as a JSON document of classifier definitions:
///
/// ```json
/// { "classifiers": [
///     { "kind": "class", "name": "sample.Person", "properties": [
///         { "kind": "attribute", "name": "email", "type": "String" } ] },
///     { "kind": "index", "name": "sample.byEmail", "class": "sample.Person",
///       "properties": ["email"] }
/// ] }
/// ```
///

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonNotation;

impl JsonNotation {
    pub const EXTENSION: &'static str = ".mm.json";
}

impl NotationParser for JsonNotation {
    fn extension(&self) -> &str {
        Self::EXTENSION
    }

    fn parse(
        &self,
        path: &Path,
        source: &str,
        builder: &mut ModelBuilder,
    ) -> Result<(), BuildError> {
        let doc: Document = serde_json::from_str(source).map_err(|e| BuildError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        for def in doc.classifiers {
            match def {
                ClassifierDef::Class(def) => {
                    builder.add_class(def.into_class()?);
                }
                ClassifierDef::Enum(def) => {
                    let mut node = Enum::new(QualifiedName::parse(&def.name)?);
                    for literal in def.literals {
                        node.add_literal(literal);
                    }
                    builder.add_enum(node);
                }
                ClassifierDef::Index(def) => {
                    builder.add_index(&def.name, &def.class, def.properties);
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(default)]
    classifiers: Vec<ClassifierDef>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierDef {
    Class(ClassDef),
    Enum(EnumDef),
    Index(IndexDef),
}

#[derive(Debug, Deserialize)]
struct ClassDef {
    name: String,

    #[serde(default)]
    parent: Option<String>,

    #[serde(default)]
    properties: Vec<PropertyDef>,
}

impl ClassDef {
    fn into_class(self) -> Result<Class, BuildError> {
        let mut class = Class::new(QualifiedName::parse(&self.name)?);
        if let Some(parent) = self.parent {
            class.set_parent(parent);
        }
        for def in self.properties {
            class.add_property(def.into_property());
        }

        Ok(class)
    }
}

#[derive(Debug, Deserialize)]
struct PropertyDef {
    kind: PropertyKind,
    name: String,

    #[serde(rename = "type")]
    ty: String,

    #[serde(default)]
    algorithm: Option<String>,

    #[serde(default)]
    derived: bool,

    #[serde(default)]
    learned: bool,

    #[serde(default)]
    global: bool,

    #[serde(default)]
    parameters: BTreeMap<String, String>,

    #[serde(default)]
    dependencies: Vec<String>,
}

impl PropertyDef {
    fn into_property(self) -> Property {
        let mut prop = Property::new(&self.name, &self.ty, self.kind);

        if let Some(alg) = self.algorithm {
            prop.set_algorithm(alg);
        }
        if self.derived {
            prop.set_derived();
        }
        if self.learned {
            prop.set_learned();
        }
        if self.global {
            prop.set_global();
        }
        for (param, value) in self.parameters {
            prop.add_parameter(param, value);
        }
        for path in self.dependencies {
            prop.add_dependency(Dependency::new(path));
        }

        prop
    }
}

#[derive(Debug, Deserialize)]
struct EnumDef {
    name: String,

    #[serde(default)]
    literals: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IndexDef {
    name: String,
    class: String,
    properties: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"{
        "classifiers": [
            { "kind": "enum", "name": "sample.Color", "literals": ["RED", "GREEN"] },
            { "kind": "class", "name": "sample.Person", "properties": [
                { "kind": "attribute", "name": "email", "type": "String" },
                { "kind": "attribute", "name": "score", "type": "Double",
                  "algorithm": "PolynomialNode", "parameters": { "precision": "0.1" } },
                { "kind": "relation", "name": "owns", "type": "sample.Car",
                  "parameters": { "opposite": "ownedBy" } },
                { "kind": "attribute", "name": "label", "type": "String",
                  "derived": true, "dependencies": ["email"] }
            ] },
            { "kind": "class", "name": "sample.Employee", "parent": "sample.Person" },
            { "kind": "index", "name": "sample.byEmail", "class": "sample.Person",
              "properties": ["email"] }
        ]
    }"#;

    fn parse(source: &str) -> Result<crate::model::Model, BuildError> {
        let mut builder = ModelBuilder::new();
        JsonNotation.parse(Path::new("test.mm.json"), source, &mut builder)?;
        builder.build()
    }

    #[test]
    fn reads_every_classifier_kind() {
        let model = parse(SOURCE).unwrap();
        assert_eq!(model.len(), 4);

        let color = model.enums().next().unwrap();
        assert_eq!(color.literals, vec!["RED", "GREEN"]);

        let person = model.class("sample.Person").unwrap();
        let score = person.property("score").unwrap();
        assert_eq!(score.algorithm(), Some("PolynomialNode"));
        assert_eq!(score.parameters().get("precision").map(String::as_str), Some("0.1"));
        assert_eq!(person.property("owns").unwrap().opposite(), Some("ownedBy"));

        let label = person.property("label").unwrap();
        assert!(label.derived());
        assert_eq!(label.dependencies()[0].path, "email");

        let employee = model.class("sample.Employee").unwrap();
        assert_eq!(employee.parent.as_deref(), Some("sample.Person"));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let err = parse("{ \"classifiers\": [ { \"kind\": \"widget\" } ] }").unwrap_err();
        match err {
            BuildError::Parse { path, .. } => assert_eq!(path, Path::new("test.mm.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
