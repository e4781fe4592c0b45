use super::Graph;

///
/// Plugin
/// Started when the graph is built, stopped on disconnect.
///

pub trait Plugin {
    fn start(&self, graph: &Graph);

    fn stop(&self);
}
