use super::{BaseNode, Graph, Node};

///
/// NodeIndex
/// Named global index; each entry keeps the attribute values a node was
/// indexed with.
///

#[derive(Clone)]
pub struct NodeIndex {
    graph: Graph,
    world: i64,
    time: i64,
    name: String,
}

impl NodeIndex {
    pub(super) fn new(graph: Graph, world: i64, time: i64, name: &str) -> Self {
        Self {
            graph,
            world,
            time,
            name: name.to_string(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_to_index(&self, node: &BaseNode, attributes: &[&str]) {
        let values = attributes
            .iter()
            .map(|attr| {
                let value = node.attribute(attr).map(|v| v.to_string()).unwrap_or_default();
                ((*attr).to_string(), value)
            })
            .collect();

        self.graph
            .store()
            .indexes
            .entry(self.name.clone())
            .or_default()
            .insert(node.id(), values);
    }

    pub fn remove_from_index(&self, node: &BaseNode, _attributes: &[&str]) {
        if let Some(entries) = self.graph.store().indexes.get_mut(&self.name) {
            entries.remove(&node.id());
        }
    }

    /// Nodes whose indexed values match every `attr=value` pair of `query`.
    pub fn find<F: FnOnce(Vec<Node>)>(&self, query: &str, callback: F) {
        let wanted: Vec<(&str, &str)> = query
            .split(',')
            .filter_map(|pair| pair.split_once('='))
            .map(|(attr, value)| (attr.trim(), value.trim()))
            .collect();

        let ids = self.ids(|values| {
            wanted.iter().all(|(attr, value)| {
                values
                    .iter()
                    .any(|(a, v)| a.as_str() == *attr && v.as_str() == *value)
            })
        });

        callback(self.resolve(ids));
    }

    pub fn find_all<F: FnOnce(Vec<Node>)>(&self, callback: F) {
        let ids = self.ids(|_| true);

        callback(self.resolve(ids));
    }

    fn ids(&self, matches: impl Fn(&[(String, String)]) -> bool) -> Vec<i64> {
        self.graph
            .store()
            .indexes
            .get(&self.name)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, values)| matches(values.as_slice()))
                    .map(|(id, _)| *id)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn resolve(&self, ids: Vec<i64>) -> Vec<Node> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            self.graph
                .lookup(self.world, self.time, id, |node: Option<Node>| found.extend(node));
        }

        found
    }
}
