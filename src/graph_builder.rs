use std::collections::{HashMap, VecDeque};

use petgraph::graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, trace, warn};

use crate::model::{Element, Model};
use crate::types::{Direction, EdgeKind, Sign};

/// Wraps one model element inside one graph.
#[derive(Debug, Clone)]
pub struct Node<'m> {
    pub element: &'m Element,
    pub breadth: bool,      // Starts new frontiers during walks
    pub sign: Option<Sign>, // Set for controls only
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub sign: Sign,
}

/// Directed wrapper graph over a model.
///
/// Nodes and edges live in a petgraph arena and are addressed by index. Each
/// edge is stored once and shows up as downstream of its source and upstream
/// of its target. The graph borrows the model and is immutable once built.
#[derive(Debug)]
pub struct Graph<'m> {
    graph: DiGraph<Node<'m>, Edge>,
    node_map: HashMap<&'m str, NodeIndex>,
}

fn is_wrapped(element: &Element) -> bool {
    !matches!(element, Element::Pathway(_))
}

fn is_breadth_root(element: &Element) -> bool {
    matches!(
        element,
        Element::ProteinReference(_)
            | Element::SmallMoleculeReference(_)
            | Element::Protein(_)
            | Element::SmallMolecule(_)
            | Element::Complex(_)
            | Element::Control(_)
    )
}

impl<'m> Graph<'m> {
    pub fn build(model: &'m Model) -> Self {
        let mut graph = Graph {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        };

        // First pass: one node per wrapped element
        for element in model.elements().filter(|e| is_wrapped(e)) {
            let sign = match element {
                Element::Control(c) => Some(Sign::of_control_type(c.control_type)),
                _ => None,
            };
            let idx = graph.graph.add_node(Node {
                element,
                breadth: is_breadth_root(element),
                sign,
            });
            graph.node_map.insert(element.id(), idx);
        }

        // Second pass: adjacency
        for element in model.elements() {
            graph.bind_element(model, element);
        }

        debug!(
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "Built wrapper graph"
        );
        graph
    }

    fn bind_element(&mut self, model: &Model, element: &Element) {
        let id = element.id();
        match element {
            Element::Protein(pe) | Element::SmallMolecule(pe) => {
                if let Some(er) = &pe.entity_reference {
                    self.bind(er, id, EdgeKind::Reference, Sign::Positive);
                }
            }
            Element::Complex(complex) => {
                for component in &complex.components {
                    self.bind(component, id, EdgeKind::Component, Sign::Positive);
                }
            }
            Element::Control(control) => {
                let sign = Sign::of_control_type(control.control_type);
                for controller in &control.controllers {
                    if let Some(Element::Pathway(_)) = model.get(controller) {
                        trace!(control = id, pathway = %controller, "Skipping pathway controller");
                        continue;
                    }
                    self.bind(controller, id, EdgeKind::Controller, Sign::Positive);
                }
                for controlled in &control.controlled {
                    if let Some(Element::Pathway(_)) = model.get(controlled) {
                        trace!(control = id, pathway = %controlled, "Skipping controlled pathway");
                        continue;
                    }
                    self.bind(id, controlled, EdgeKind::Controls, sign);
                }
            }
            Element::Conversion(conversion) => {
                for input in &conversion.left {
                    self.bind(input, id, EdgeKind::Input, Sign::Positive);
                }
                for output in &conversion.right {
                    self.bind(id, output, EdgeKind::Output, Sign::Positive);
                }
            }
            Element::TemplateReaction(reaction) => {
                for product in &reaction.products {
                    self.bind(id, product, EdgeKind::Output, Sign::Positive);
                }
            }
            Element::ProteinReference(_) | Element::SmallMoleculeReference(_) | Element::Pathway(_) => {}
        }
    }

    // Adds the edge to both the source's downstream and the target's upstream view
    fn bind(&mut self, source: &str, target: &str, kind: EdgeKind, sign: Sign) {
        let (Some(&from), Some(&to)) = (self.node_map.get(source), self.node_map.get(target)) else {
            warn!(source, target, kind = kind.label(), "Dangling reference, edge skipped");
            return;
        };
        if from == to {
            warn!(element = source, kind = kind.label(), "Self-loop skipped");
            return;
        }
        self.graph.add_edge(from, to, Edge { kind, sign });
    }

    /// Node wrapping the element with the given id. Same index on every call.
    pub fn get_graph_object(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &Node<'m> {
        &self.graph[idx]
    }

    pub fn element(&self, idx: NodeIndex) -> &'m Element {
        self.graph[idx].element
    }

    pub fn edge(&self, idx: EdgeIndex) -> &Edge {
        &self.graph[idx]
    }

    pub fn edge_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Node indices in element insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn upstream(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, Edge>> {
        self.graph.edges_directed(idx, petgraph::Direction::Incoming)
    }

    pub fn downstream(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, Edge>> {
        self.graph.edges_directed(idx, petgraph::Direction::Outgoing)
    }

    /// Distinct neighbours over one edge kind, in ascending index order.
    pub fn neighbors(&self, idx: NodeIndex, kind: EdgeKind, direction: Direction) -> Vec<NodeIndex> {
        let mut found: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, direction.to_petgraph())
            .filter(|e| e.weight().kind == kind)
            .map(|e| match direction {
                Direction::Upstream => e.source(),
                Direction::Downstream => e.target(),
            })
            .collect();
        found.sort();
        found.dedup();
        found
    }

    pub fn is_linked(&self, from: NodeIndex, to: NodeIndex, kind: EdgeKind, direction: Direction) -> bool {
        let (source, target) = match direction {
            Direction::Downstream => (from, to),
            Direction::Upstream => (to, from),
        };
        self.graph
            .edges_connecting(source, target)
            .any(|e| e.weight().kind == kind)
    }

    /// Shortest path from `from` to `to` over one edge kind, both ends
    /// included. Ties go to the lower node index.
    pub fn path_between(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        kind: EdgeKind,
        direction: Direction,
        max_depth: usize,
    ) -> Option<Vec<NodeIndex>> {
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([(from, 0usize)]);

        while let Some((node, depth)) = queue.pop_front() {
            if node == to {
                let mut path = vec![to];
                let mut current = to;
                while let Some(&prev) = parent.get(&current) {
                    path.push(prev);
                    current = prev;
                }
                path.reverse();
                return Some(path);
            }
            if depth >= max_depth {
                continue;
            }
            for next in self.neighbors(node, kind, direction) {
                if next != from && !parent.contains_key(&next) {
                    parent.insert(next, node);
                    queue.push_back((next, depth + 1));
                }
            }
        }
        None
    }

    /// Composed sign of the `Controls` edges along consecutive nodes of a
    /// path, `None` if two consecutive nodes are not linked.
    pub fn path_sign(&self, path: &[NodeIndex]) -> Option<Sign> {
        path.windows(2).try_fold(Sign::Positive, |acc, pair| {
            let edge = self.graph.find_edge(pair[0], pair[1])?;
            Some(acc * self.graph[edge].sign)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Control, Conversion, EntityReference, PhysicalEntity, Pathway};
    use crate::types::ControlType;

    fn control(id: &str, t: Option<ControlType>, controllers: &[&str], controlled: &[&str]) -> Element {
        Element::Control(Control {
            id: id.to_string(),
            control_type: t,
            controllers: controllers.iter().map(|s| s.to_string()).collect(),
            controlled: controlled.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn sample_model() -> Model {
        Model::from_elements([
            Element::ProteinReference(EntityReference::new("pr1")),
            Element::Protein(PhysicalEntity::new("p1", Some("pr1"))),
            Element::Protein(PhysicalEntity::new("p2", Some("pr1"))),
            Element::Conversion(Conversion {
                id: "conv".to_string(),
                left: vec!["p1".to_string()],
                right: vec!["p2".to_string()],
                ..Default::default()
            }),
            Element::Pathway(Pathway { id: "pw".to_string(), ..Default::default() }),
            control("c1", Some(ControlType::Inhibition), &["p1", "pw"], &["conv"]),
            control("c2", Some(ControlType::InhibitionCompetitive), &["p2"], &["c1", "c2", "ghost"]),
        ])
        .unwrap()
    }

    #[test]
    fn every_edge_is_registered_on_both_ends() {
        let model = sample_model();
        let graph = Graph::build(&model);
        for e in graph.edge_indices() {
            let (s, t) = graph.edge_endpoints(e).unwrap();
            assert_ne!(s, t);
            assert_eq!(graph.downstream(s).filter(|r| r.id() == e).count(), 1);
            assert_eq!(graph.upstream(t).filter(|r| r.id() == e).count(), 1);
            let holders = graph
                .node_indices()
                .filter(|&n| graph.downstream(n).any(|r| r.id() == e))
                .count();
            assert_eq!(holders, 1);
        }
    }

    #[test]
    fn pathways_self_loops_and_dangling_ids_get_no_edges() {
        let model = sample_model();
        let graph = Graph::build(&model);
        assert!(graph.get_graph_object("pw").is_none());
        let c1 = graph.get_graph_object("c1").unwrap();
        let c2 = graph.get_graph_object("c2").unwrap();
        assert_eq!(graph.upstream(c1).count(), 2); // p1 and c2
        assert_eq!(graph.downstream(c2).count(), 1);
        assert_eq!(graph.edge_count(), 8);
    }

    #[test]
    fn graph_object_lookup_is_stable() {
        let model = sample_model();
        let graph = Graph::build(&model);
        let first = graph.get_graph_object("p1").unwrap();
        assert_eq!(graph.get_graph_object("p1"), Some(first));
        assert_eq!(graph.element(first).id(), "p1");
        assert!(graph.node(first).breadth);
        assert!(!graph.node(graph.get_graph_object("conv").unwrap()).breadth);
        // Controls open frontiers over nested controls
        assert!(graph.node(graph.get_graph_object("c1").unwrap()).breadth);
    }

    #[test]
    fn control_signs_and_nested_path_sign() {
        let model = sample_model();
        let graph = Graph::build(&model);
        let c1 = graph.get_graph_object("c1").unwrap();
        let c2 = graph.get_graph_object("c2").unwrap();
        let conv = graph.get_graph_object("conv").unwrap();
        assert_eq!(graph.node(c1).sign, Some(Sign::Negative));
        // Inhibitor of an inhibitor is net activating
        assert_eq!(graph.path_sign(&[c2, c1, conv]), Some(Sign::Positive));
        assert_eq!(graph.path_sign(&[c1, conv]), Some(Sign::Negative));
        assert_eq!(graph.path_sign(&[conv, c2]), None);
    }

    #[test]
    fn path_between_follows_nested_controls() {
        let model = sample_model();
        let graph = Graph::build(&model);
        let c1 = graph.get_graph_object("c1").unwrap();
        let c2 = graph.get_graph_object("c2").unwrap();
        let conv = graph.get_graph_object("conv").unwrap();
        assert_eq!(
            graph.path_between(c2, conv, EdgeKind::Controls, Direction::Downstream, 5),
            Some(vec![c2, c1, conv])
        );
        assert_eq!(
            graph.path_between(c2, conv, EdgeKind::Controls, Direction::Downstream, 1),
            None
        );
        assert_eq!(
            graph.path_between(c1, c1, EdgeKind::Controls, Direction::Downstream, 5),
            Some(vec![c1])
        );
        assert_eq!(
            graph.path_between(conv, c2, EdgeKind::Controls, Direction::Downstream, 5),
            None
        );
    }

    #[test]
    fn neighbors_follow_one_edge_kind() {
        let model = sample_model();
        let graph = Graph::build(&model);
        let pr1 = graph.get_graph_object("pr1").unwrap();
        let p1 = graph.get_graph_object("p1").unwrap();
        let p2 = graph.get_graph_object("p2").unwrap();
        assert_eq!(graph.neighbors(pr1, EdgeKind::Reference, Direction::Downstream), vec![p1, p2]);
        assert!(graph.neighbors(pr1, EdgeKind::Input, Direction::Downstream).is_empty());
        assert!(graph.is_linked(p1, pr1, EdgeKind::Reference, Direction::Upstream));
    }
}
