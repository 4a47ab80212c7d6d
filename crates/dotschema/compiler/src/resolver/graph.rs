// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Dependency graph representation

use dotschema_common::QName;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap};

/// Edges point from a class to the names it refers to
pub type DependencyGraph = DiGraph<QName, ()>;

/// Utility for building dependency graphs
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DependencyGraph,
    indices: HashMap<QName, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if not exists, returns its index
    pub fn add_node(&mut self, qname: &QName) -> NodeIndex {
        if let Some(&idx) = self.indices.get(qname) {
            return idx;
        }
        let idx = self.graph.add_node(qname.clone());
        self.indices.insert(qname.clone(), idx);
        idx
    }

    /// Add an edge between two names, self edges are ignored
    pub fn add_edge(&mut self, from: &QName, to: &QName) {
        let u = self.add_node(from);
        let v = self.add_node(to);
        if u != v && !self.graph.contains_edge(u, v) {
            self.graph.add_edge(u, v, ());
        }
    }

    pub fn build(self) -> DependencyGraph {
        self.graph
    }
}

/// Order every name after the names it depends on.
///
/// Mutually dependent names are collapsed into one component. Components are
/// emitted by depth, the names of one depth sorted by their text form, so the
/// order does not depend on the order edges were added in.
pub fn linear_order(graph: &DependencyGraph) -> Vec<QName> {
    let components = tarjan_scc(graph);

    let mut component_of = vec![0; graph.node_count()];
    for (component, nodes) in components.iter().enumerate() {
        for node in nodes {
            component_of[node.index()] = component;
        }
    }

    // Tarjan yields components in reverse topological order: dependencies first.
    let mut depths = vec![0usize; components.len()];
    let mut levels: BTreeMap<usize, Vec<&QName>> = BTreeMap::new();
    for (component, nodes) in components.iter().enumerate() {
        let depth = nodes
            .iter()
            .flat_map(|node| graph.neighbors(*node))
            .map(|dependency| component_of[dependency.index()])
            .filter(|other| *other != component)
            .map(|other| depths[other] + 1)
            .max()
            .unwrap_or(0);

        depths[component] = depth;
        levels.entry(depth).or_default().extend(nodes.iter().map(|node| &graph[*node]));
    }

    levels
        .into_values()
        .flat_map(|mut names| {
            names.sort();
            names.into_iter().cloned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(order: &[QName]) -> Vec<String> {
        order.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_linear_order() {
        let class_b = QName::new(Some("urn:shapes"), "class_B");
        let class_c = QName::new(Some("urn:shapes"), "class_C");
        let class_d = QName::new(Some("urn:shapes"), "class_D");

        let mut builder = GraphBuilder::new();
        builder.add_edge(&class_b, &class_c);
        builder.add_edge(&class_b, &QName::local("b"));
        builder.add_edge(&class_c, &QName::local("c"));
        builder.add_edge(&class_c, &QName::local("d"));
        builder.add_edge(&class_d, &QName::local("e"));
        builder.add_edge(&class_d, &QName::local("d"));

        let expected = vec!["b", "c", "d", "e", "{urn:shapes}class_C", "{urn:shapes}class_D", "{urn:shapes}class_B"];
        assert_eq!(names(&linear_order(&builder.build())), expected);
    }

    #[test]
    fn test_linear_order_collapses_cycles() {
        let (a, b, c, leaf) = (QName::local("a"), QName::local("b"), QName::local("c"), QName::local("leaf"));

        let mut builder = GraphBuilder::new();
        builder.add_edge(&a, &b);
        builder.add_edge(&b, &a);
        builder.add_edge(&a, &a);
        builder.add_edge(&b, &leaf);
        builder.add_edge(&c, &a);

        assert_eq!(names(&linear_order(&builder.build())), vec!["leaf", "a", "b", "c"]);
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut builder = GraphBuilder::new();
        let first = builder.add_node(&QName::local("a"));
        let second = builder.add_node(&QName::local("a"));
        builder.add_edge(&QName::local("a"), &QName::local("a"));

        assert_eq!(first, second);
        let graph = builder.build();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
