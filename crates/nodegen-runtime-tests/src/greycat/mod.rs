//! In-memory graph runtime with the surface generated accessors call into.
//!
//! Every callback runs before the call that takes it returns. Worlds and
//! times are carried on nodes but all of them share one store.

mod graph;
mod index;
mod node;
mod sync;
mod task;

pub mod actions;
pub mod ml;
pub mod plugin;

pub use graph::{Declaration, Graph, GraphBuilder, NodeRegistry};
pub use index::NodeIndex;
pub use node::{AttributeValue, BaseNode, Node, Type, TypedNode, Value};
pub use sync::{Counter, SyncCounter};
pub use task::{Action, Buffer, TaskAction, TaskContext, TaskFunctionSelect, TaskResult};
