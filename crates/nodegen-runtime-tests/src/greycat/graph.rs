use super::{BaseNode, Counter, Node, NodeIndex, SyncCounter, Value, plugin::Plugin};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

type Factory = Arc<dyn Fn(i64, i64, i64, Graph) -> Node + Send + Sync>;

///
/// Record
///

#[derive(Debug, Default)]
struct Record {
    type_name: String,
    attributes: BTreeMap<String, Value>,
    relations: BTreeMap<String, Vec<i64>>,
}

///
/// Store
///

#[derive(Debug, Default)]
pub(super) struct Store {
    next_id: i64,
    last_world: i64,
    connected: bool,
    nodes: BTreeMap<i64, Record>,
    pub(super) indexes: BTreeMap<String, BTreeMap<i64, Vec<(String, String)>>>,
}

///
/// NodeRegistry
///

#[derive(Default)]
pub struct NodeRegistry {
    factories: Mutex<BTreeMap<String, Factory>>,
}

impl NodeRegistry {
    pub fn get_or_create_declaration(&self, name: &str) -> Declaration<'_> {
        Declaration {
            registry: self,
            name: name.to_string(),
        }
    }

    fn factory(&self, name: &str) -> Option<Factory> {
        self.factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

///
/// Declaration
///

pub struct Declaration<'a> {
    registry: &'a NodeRegistry,
    name: String,
}

impl Declaration<'_> {
    pub fn set_factory<F>(&self, factory: F)
    where
        F: Fn(i64, i64, i64, Graph) -> Node + Send + Sync + 'static,
    {
        self.registry
            .factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.name.clone(), Arc::new(factory));
    }
}

///
/// GraphBuilder
///

#[derive(Default)]
pub struct GraphBuilder {
    plugins: Vec<Box<dyn Plugin + Send + Sync>>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_plugin<P>(mut self, plugin: P) -> Self
    where
        P: Plugin + Send + Sync + 'static,
    {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Builds the graph and starts every plugin in registration order.
    #[must_use]
    pub fn build(self) -> Graph {
        let graph = Graph {
            inner: Arc::new(Inner {
                store: Mutex::default(),
                registry: NodeRegistry::default(),
                plugins: self.plugins,
            }),
        };
        for plugin in &graph.inner.plugins {
            plugin.start(&graph);
        }

        graph
    }
}

struct Inner {
    store: Mutex<Store>,
    registry: NodeRegistry,
    plugins: Vec<Box<dyn Plugin + Send + Sync>>,
}

///
/// Graph
///

#[derive(Clone)]
pub struct Graph {
    inner: Arc<Inner>,
}

impl Graph {
    pub(super) fn store(&self) -> MutexGuard<'_, Store> {
        self.inner.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn node_registry(&self) -> &NodeRegistry {
        &self.inner.registry
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.store().connected
    }

    pub fn connect<F: FnOnce(bool)>(&self, callback: F) {
        self.store().connected = true;
        callback(true);
    }

    pub fn disconnect<F: FnOnce(bool)>(&self, callback: F) {
        for plugin in &self.inner.plugins {
            plugin.stop();
        }
        self.store().connected = false;
        callback(true);
    }

    pub fn save<F: FnOnce(bool)>(&self, callback: F) {
        let connected = self.is_connected();
        callback(connected);
    }

    /// New world id; forked worlds read through to the shared store.
    #[must_use]
    pub fn fork(&self, _parent: i64) -> i64 {
        let mut store = self.store();
        store.last_world += 1;
        store.last_world
    }

    #[must_use]
    pub fn new_counter(&self, expected: usize) -> Counter {
        Counter::new(expected)
    }

    #[must_use]
    pub fn new_sync_counter(&self, expected: usize) -> SyncCounter {
        SyncCounter::new(expected)
    }

    /// Store a node of `type_name` and wrap it with its registered factory.
    #[must_use]
    pub fn new_typed_node(&self, world: i64, time: i64, type_name: &str) -> Node {
        let id = {
            let mut store = self.store();
            store.next_id += 1;
            let id = store.next_id;
            store.nodes.insert(
                id,
                Record {
                    type_name: type_name.to_string(),
                    ..Record::default()
                },
            );
            id
        };

        self.materialize(world, time, id, type_name)
    }

    pub fn lookup<F: FnOnce(Option<Node>)>(&self, world: i64, time: i64, id: i64, callback: F) {
        let type_name = self.store().nodes.get(&id).map(|r| r.type_name.clone());

        callback(type_name.map(|name| self.materialize(world, time, id, &name)));
    }

    /// Resolve a named index, creating it when absent.
    pub fn index<F: FnOnce(NodeIndex)>(&self, world: i64, time: i64, name: &str, callback: F) {
        self.store().indexes.entry(name.to_string()).or_default();

        callback(NodeIndex::new(self.clone(), world, time, name));
    }

    pub fn index_if_exists<F>(&self, world: i64, time: i64, name: &str, callback: F)
    where
        F: FnOnce(Option<NodeIndex>),
    {
        let exists = self.store().indexes.contains_key(name);

        callback(exists.then(|| NodeIndex::new(self.clone(), world, time, name)));
    }

    //
    // node storage
    //

    pub(super) fn materialize(&self, world: i64, time: i64, id: i64, type_name: &str) -> Node {
        match self.inner.registry.factory(type_name) {
            Some(factory) => factory(world, time, id, self.clone()),
            None => Node::new(BaseNode::new(world, time, id, self.clone())),
        }
    }

    pub(super) fn attribute(&self, id: i64, name: &str) -> Option<Value> {
        self.store()
            .nodes
            .get(&id)
            .and_then(|r| r.attributes.get(name).cloned())
    }

    pub(super) fn set_attribute(&self, id: i64, name: &str, value: Value) {
        if let Some(record) = self.store().nodes.get_mut(&id) {
            record.attributes.insert(name.to_string(), value);
        }
    }

    pub(super) fn related(&self, world: i64, time: i64, id: i64, name: &str) -> Vec<Node> {
        let targets: Vec<(i64, String)> = {
            let store = self.store();
            store
                .nodes
                .get(&id)
                .and_then(|r| r.relations.get(name))
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| store.nodes.get(id).map(|r| (*id, r.type_name.clone())))
                        .collect()
                })
                .unwrap_or_default()
        };

        targets
            .into_iter()
            .map(|(id, type_name)| self.materialize(world, time, id, &type_name))
            .collect()
    }

    pub(super) fn link(&self, id: i64, name: &str, target: i64) {
        if let Some(record) = self.store().nodes.get_mut(&id) {
            record.relations.entry(name.to_string()).or_default().push(target);
        }
    }

    pub(super) fn unlink(&self, id: i64, name: &str, target: i64) {
        if let Some(ids) = self
            .store()
            .nodes
            .get_mut(&id)
            .and_then(|r| r.relations.get_mut(name))
        {
            ids.retain(|linked| *linked != target);
        }
    }
}
