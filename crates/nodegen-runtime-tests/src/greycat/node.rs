use super::Graph;
use std::{
    any::Any,
    fmt::{self, Display},
    ops::Deref,
    sync::Arc,
};

///
/// Type
/// Attribute type tags.
///

pub struct Type;

impl Type {
    pub const BOOL: u8 = 1;
    pub const STRING: u8 = 2;
    pub const LONG: u8 = 3;
    pub const INT: u8 = 4;
    pub const DOUBLE: u8 = 5;
}

///
/// Value
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    Long(i64),
    Int(i32),
    Double(f64),
}

impl Value {
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Bool(_) => Type::BOOL,
            Self::String(_) => Type::STRING,
            Self::Long(_) => Type::LONG,
            Self::Int(_) => Type::INT,
            Self::Double(_) => Type::DOUBLE,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Long(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

///
/// AttributeValue
/// Rust types an attribute can be read and written as.
///

pub trait AttributeValue: Sized + Send + 'static {
    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! attribute_value {
    ($ty:ty, $variant:ident) => {
        impl AttributeValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    };
}

attribute_value!(bool, Bool);
attribute_value!(String, String);
attribute_value!(i64, Long);
attribute_value!(i32, Int);
attribute_value!(f64, Double);

///
/// TypedNode
///

pub trait TypedNode {
    const NODE_NAME: &'static str;

    fn node(&self) -> &BaseNode;
}

///
/// BaseNode
/// Handle on one stored node at a world and time.
///

#[derive(Clone)]
pub struct BaseNode {
    world: i64,
    time: i64,
    id: i64,
    graph: Graph,
}

impl BaseNode {
    #[must_use]
    pub const fn new(world: i64, time: i64, id: i64, graph: Graph) -> Self {
        Self {
            world,
            time,
            id,
            graph,
        }
    }

    #[must_use]
    pub const fn world(&self) -> i64 {
        self.world
    }

    #[must_use]
    pub const fn time(&self) -> i64 {
        self.time
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    #[must_use]
    pub fn graph(&self) -> Graph {
        self.graph.clone()
    }

    /// Raw stored value, whatever its type.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.graph.attribute(self.id, name)
    }

    #[must_use]
    pub fn get<T: AttributeValue>(&self, name: &str) -> Option<T> {
        self.attribute(name).as_ref().and_then(T::from_value)
    }

    /// Writes are checked against the declared type tag.
    pub fn set<T: AttributeValue>(&self, name: &str, tag: u8, value: T) {
        let value = value.into_value();
        assert_eq!(value.tag(), tag, "type tag of '{name}'");

        self.graph.set_attribute(self.id, name, value);
    }

    pub fn set_parameter(&self, name: &str, value: impl Into<Value>) {
        self.graph.set_attribute(self.id, name, value.into());
    }

    pub fn relation<F>(&self, name: &str, callback: F)
    where
        F: FnOnce(Vec<Node>),
    {
        callback(self.graph.related(self.world, self.time, self.id, name));
    }

    pub fn add_to_relation(&self, name: &str, other: &Self) {
        self.graph.link(self.id, name, other.id);
    }

    pub fn remove_from_relation(&self, name: &str, other: &Self) {
        self.graph.unlink(self.id, name, other.id);
    }
}

impl TypedNode for BaseNode {
    const NODE_NAME: &'static str = "BaseNode";

    fn node(&self) -> &BaseNode {
        self
    }
}

///
/// Node
/// A stored node behind the accessor type its factory produced.
///

#[derive(Clone)]
pub struct Node {
    base: BaseNode,
    typed: Arc<dyn Any + Send + Sync>,
}

impl Node {
    pub fn new<T>(typed: T) -> Self
    where
        T: TypedNode + Send + Sync + 'static,
    {
        Self {
            base: typed.node().clone(),
            typed: Arc::new(typed),
        }
    }

    #[must_use]
    pub fn downcast<T: Clone + 'static>(self) -> Option<T> {
        self.typed.downcast_ref::<T>().cloned()
    }

    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.typed.downcast_ref::<T>()
    }
}

impl Deref for Node {
    type Target = BaseNode;

    fn deref(&self) -> &BaseNode {
        &self.base
    }
}
