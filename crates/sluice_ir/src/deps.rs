//! Inter-node dependency graph built from node cut-sets.
//!
//! Each node placed directly in a region becomes a vertex. An edge `a -> b`
//! means a value produced by `a` (a result or a value escaping its body)
//! reaches an op inside `b`, possibly through a chain of dataflow buffers.

use crate::graph::Graph;
use crate::ids::{OpId, RegionId, ValueId};
use crate::op::OpKind;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Producer/consumer edges between the nodes of one region.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<OpId, ValueId>,
    index: HashMap<OpId, NodeIndex>,
}

impl DependencyGraph {
    /// Builds the dependency graph of the nodes directly in `region`.
    pub fn build(ir: &Graph, region: RegionId) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        let nodes = ir.nodes_in(region);
        for &node in &nodes {
            index.insert(node, graph.add_node(node));
        }

        for &producer in &nodes {
            let mut crossed = HashSet::new();
            let mut frontier: Vec<(ValueId, OpId)> = ir.dataflow_uses(producer);
            for &result in &ir.op(producer).results {
                frontier.extend(ir.users(result).map(|user| (result, user)));
            }
            while let Some((value, user)) = frontier.pop() {
                let Some(top) = ir.ancestor_in(user, region) else {
                    continue;
                };
                if let OpKind::DataflowBuffer { .. } = ir.op(top).kind {
                    if !crossed.insert(top) {
                        continue;
                    }
                    for &through in &ir.op(top).results {
                        frontier.extend(ir.users(through).map(|next| (value, next)));
                    }
                    continue;
                }
                if top == producer {
                    continue;
                }
                if let (Some(&from), Some(&to)) = (index.get(&producer), index.get(&top)) {
                    if !graph.contains_edge(from, to) {
                        graph.add_edge(from, to, value);
                    }
                }
            }
        }
        Self { graph, index }
    }

    /// Returns the nodes in an order where every producer precedes its
    /// consumers, or `None` if the nodes form a cycle.
    pub fn topological_order(&self) -> Option<Vec<OpId>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|i| self.graph[i]).collect())
    }

    /// Returns the nodes consuming something `node` produces.
    pub fn successors(&self, node: OpId) -> Vec<OpId> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Returns the nodes `node` consumes from.
    pub fn predecessors(&self, node: OpId) -> Vec<OpId> {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors(&self, node: OpId, direction: Direction) -> Vec<OpId> {
        let Some(&i) = self.index.get(&node) else {
            return Vec::new();
        };
        let mut out: Vec<OpId> = self
            .graph
            .neighbors_directed(i, direction)
            .map(|n| self.graph[n])
            .collect();
        out.sort();
        out
    }

    /// Number of nodes, one per `dataflow.node` in the region.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct producer→consumer pairs.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
