use super::{Graph, Node};
use std::{
    fmt::{self, Display},
    sync::{Arc, Mutex, PoisonError},
};

///
/// TaskAction
///

pub trait TaskAction: Send + Sync {
    fn eval(&self, ctx: TaskContext);

    fn serialize(&self, buffer: &mut Buffer);
}

///
/// Action
/// Shareable handle on one task step.
///

#[derive(Clone)]
pub struct Action {
    inner: Arc<dyn TaskAction>,
}

impl Action {
    pub fn new<A: TaskAction + 'static>(action: A) -> Self {
        Self {
            inner: Arc::new(action),
        }
    }

    pub fn eval(&self, ctx: TaskContext) {
        self.inner.eval(ctx);
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = Buffer::default();
        self.inner.serialize(&mut buffer);

        f.write_str(buffer.as_str())
    }
}

///
/// Buffer
///

#[derive(Debug, Default)]
pub struct Buffer(String);

impl Buffer {
    pub fn write_str(&mut self, s: &str) {
        self.0.push_str(s);
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

///
/// TaskResult
///

#[derive(Clone, Default)]
pub struct TaskResult {
    nodes: Vec<Node>,
}

impl TaskResult {
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

///
/// TaskContext
/// Input of one step; the step hands its output on with `continue_with`.
///

#[derive(Clone)]
pub struct TaskContext {
    graph: Graph,
    time: i64,
    result: TaskResult,
    output: Arc<Mutex<Option<Vec<Node>>>>,
}

impl TaskContext {
    #[must_use]
    pub fn new(graph: Graph, time: i64, nodes: Vec<Node>) -> Self {
        Self {
            graph,
            time,
            result: TaskResult { nodes },
            output: Arc::default(),
        }
    }

    #[must_use]
    pub const fn result(&self) -> &TaskResult {
        &self.result
    }

    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub const fn time(&self) -> i64 {
        self.time
    }

    pub fn continue_with(&self, nodes: Vec<Node>) {
        *self.output.lock().unwrap_or_else(PoisonError::into_inner) = Some(nodes);
    }

    /// Nodes the step continued with, `None` while it has not.
    #[must_use]
    pub fn output(&self) -> Option<Vec<Node>> {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

///
/// TaskFunctionSelect
///

pub trait TaskFunctionSelect {
    fn select(&self, node: &Node, ctx: &TaskContext) -> bool;
}
