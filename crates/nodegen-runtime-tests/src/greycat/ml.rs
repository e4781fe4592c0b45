//! Stand-in for the learning plugin: a regression node remembers the last
//! value it learned and extrapolates exactly that.

use super::{AttributeValue, BaseNode, Graph, Node, TypedNode, plugin::Plugin};

const VALUE: &str = "value";

///
/// MlPlugin
///

#[derive(Clone, Copy, Debug, Default)]
pub struct MlPlugin;

impl Plugin for MlPlugin {
    fn start(&self, graph: &Graph) {
        graph
            .node_registry()
            .get_or_create_declaration(RegressionNode::NODE_NAME)
            .set_factory(|world: i64, time: i64, id: i64, graph: Graph| {
                Node::new(RegressionNode {
                    base: BaseNode::new(world, time, id, graph),
                })
            });
    }

    fn stop(&self) {}
}

///
/// RegressionNode
///

#[derive(Clone)]
pub struct RegressionNode {
    base: BaseNode,
}

impl RegressionNode {
    pub fn learn<T, F>(&self, value: T, callback: F)
    where
        T: AttributeValue,
        F: FnOnce(),
    {
        self.base.set_parameter(VALUE, value.into_value());
        callback();
    }

    pub fn extrapolate<T, F>(&self, callback: F)
    where
        T: AttributeValue,
        F: FnOnce(Option<T>),
    {
        callback(self.base.get::<T>(VALUE));
    }
}

impl TypedNode for RegressionNode {
    const NODE_NAME: &'static str = "PolynomialNode";

    fn node(&self) -> &BaseNode {
        &self.base
    }
}

impl std::ops::Deref for RegressionNode {
    type Target = BaseNode;

    fn deref(&self) -> &BaseNode {
        &self.base
    }
}
