//! Validated diagram graph and layer assignment.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    Direction as EdgeDirection,
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use super::{DiagramSpec, EdgeSpec, NodeSpec};
use crate::error::HandbookError;

/// A [`DiagramSpec`] turned into a directed graph.
///
/// Node indices follow declaration order, which is also the order of nodes
/// inside a layer.
#[derive(Debug)]
pub struct DiagramGraph<'a> {
    spec: &'a DiagramSpec<'a>,
    graph: DiGraph<&'a NodeSpec<'a>, &'a EdgeSpec<'a>>,
}

impl<'a> DiagramGraph<'a> {
    /// Builds the graph, checking that node ids are unique and that every
    /// edge connects two distinct, declared nodes.
    ///
    /// # Errors
    ///
    /// Returns [`HandbookError::Layout`] for an empty diagram, a duplicate
    /// node id, an edge to an undeclared node, or a self-loop.
    pub fn from_spec(spec: &'a DiagramSpec<'a>) -> Result<Self, HandbookError> {
        if spec.nodes.is_empty() {
            return Err(HandbookError::layout(spec.name, "diagram has no nodes"));
        }

        let mut graph = DiGraph::new();
        let mut indices: IndexMap<&str, NodeIndex> = IndexMap::new();

        for node in spec.nodes {
            if indices.contains_key(node.id) {
                return Err(HandbookError::layout(
                    spec.name,
                    format!("duplicate node id `{}`", node.id),
                ));
            }
            let index = graph.add_node(node);
            indices.insert(node.id, index);
        }

        for edge in spec.edges {
            let lookup = |id: &str| {
                indices.get(id).copied().ok_or_else(|| {
                    HandbookError::layout(spec.name, format!("edge references unknown node `{id}`"))
                })
            };
            let source = lookup(edge.source)?;
            let target = lookup(edge.target)?;
            if source == target {
                return Err(HandbookError::layout(
                    spec.name,
                    format!("self-loop on node `{}` is not supported", edge.source),
                ));
            }
            graph.add_edge(source, target, edge);
        }

        debug!(
            diagram = spec.name,
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Diagram graph built"
        );

        Ok(Self { spec, graph })
    }

    pub fn spec(&self) -> &'a DiagramSpec<'a> {
        self.spec
    }

    pub fn node(&self, index: NodeIndex) -> &'a NodeSpec<'a> {
        self.graph[index]
    }

    /// Returns `(edge, source, target)` for every edge in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (&'a EdgeSpec<'a>, NodeIndex, NodeIndex)> + '_ {
        self.graph.edge_indices().filter_map(|index| {
            let (source, target) = self.graph.edge_endpoints(index)?;
            Some((self.graph[index], source, target))
        })
    }

    /// Returns `true` if an edge runs from `target` back to `source`.
    pub fn has_reverse_edge(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.graph.find_edge(target, source).is_some()
    }

    /// Assigns every node to a layer.
    ///
    /// Layers are found by breadth-first search from the root nodes (nodes
    /// without incoming edges), or from the first declared node when every
    /// node has an incoming edge. Nodes unreachable from those starts begin
    /// a new search of their own at layer zero. Within a layer, nodes keep
    /// the order in which the search reached them.
    pub fn layers(&self) -> Vec<Vec<NodeIndex>> {
        let roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, EdgeDirection::Incoming)
                    .next()
                    .is_none()
            })
            .collect();

        let mut starts: VecDeque<NodeIndex> = if roots.is_empty() {
            self.graph.node_indices().take(1).collect()
        } else {
            roots.into()
        };

        let mut layers: Vec<Vec<NodeIndex>> = Vec::new();
        let mut visited = HashSet::new();

        loop {
            let mut queue: VecDeque<(NodeIndex, usize)> =
                starts.drain(..).map(|index| (index, 0)).collect();

            while let Some((index, layer)) = queue.pop_front() {
                if !visited.insert(index) {
                    continue;
                }
                if layers.len() <= layer {
                    layers.resize_with(layer + 1, Vec::new);
                }
                layers[layer].push(index);
                trace!(node = self.graph[index].id, layer = layer; "Assigned layer");

                for child in self.children_in_declaration_order(index) {
                    if !visited.contains(&child) {
                        queue.push_back((child, layer + 1));
                    }
                }
            }

            match self
                .graph
                .node_indices()
                .find(|index| !visited.contains(index))
            {
                Some(unvisited) => starts.push_back(unvisited),
                None => break,
            }
        }

        layers
    }

    /// Successors of `index`, ordered by edge declaration.
    fn children_in_declaration_order(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(index, EdgeDirection::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        // petgraph yields outgoing edges newest first.
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, target)| target).collect()
    }
}
