use crate::prelude::*;
use derive_more::Display;

///
/// Primitive
///
/// Scalar value kinds the host runtime stores natively. The `Display` form is
/// the declared type name used in model files.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum Primitive {
    Boolean,
    Double,
    Integer,
    Long,
    String,
}

impl Primitive {
    pub const ALL: [Self; 5] = [
        Self::Boolean,
        Self::Double,
        Self::Integer,
        Self::Long,
        Self::String,
    ];

    /// Exact, case-sensitive match on the declared type name.
    #[must_use]
    pub fn from_declared(name: &str) -> Option<Self> {
        match name {
            "Boolean" => Some(Self::Boolean),
            "Double" => Some(Self::Double),
            "Integer" => Some(Self::Integer),
            "Long" => Some(Self::Long),
            "String" => Some(Self::String),
            _ => None,
        }
    }

    /// Name of the host runtime's type-tag constant.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Boolean => "BOOL",
            Self::Double => "DOUBLE",
            Self::Integer => "INT",
            Self::Long => "LONG",
            Self::String => "STRING",
        }
    }
}

///
/// TypeRef
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeRef {
    Primitive(Primitive),
    Classifier(String),
}

impl TypeRef {
    // resolve
    // anything that is not a primitive name is taken as a classifier fqn
    #[must_use]
    pub fn resolve(declared: &str) -> Self {
        Primitive::from_declared(declared)
            .map_or_else(|| Self::Classifier(declared.to_string()), Self::Primitive)
    }

    #[must_use]
    pub const fn primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive(p) => Some(*p),
            Self::Classifier(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_table_is_one_to_one() {
        let expected = [
            ("Boolean", "BOOL"),
            ("Double", "DOUBLE"),
            ("Integer", "INT"),
            ("Long", "LONG"),
            ("String", "STRING"),
        ];

        for (declared, tag) in expected {
            let primitive = Primitive::from_declared(declared).unwrap();
            assert_eq!(primitive.tag(), tag);
            assert_eq!(primitive.to_string(), declared);
        }
    }

    #[test]
    fn other_names_are_classifier_refs() {
        for declared in ["string", "Float", "sample.Car", ""] {
            assert_eq!(
                TypeRef::resolve(declared),
                TypeRef::Classifier(declared.to_string())
            );
        }
    }
}
