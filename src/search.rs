use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use tracing::{debug, trace};

use crate::graph_builder::Graph;
use crate::model::Element;
use crate::pattern::{Bindings, Pattern, PatternError};

/// Matches grouped by the id of the element the search started from.
pub type SearchResult = BTreeMap<String, Vec<Match>>;

/// One complete binding of a pattern's labels. Immutable once created.
#[derive(Debug, Clone)]
pub struct Match {
    pattern: Arc<Pattern>,
    nodes: Vec<NodeIndex>,
}

impl Match {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Bound nodes in slot order.
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn first(&self) -> NodeIndex {
        self.nodes[0]
    }

    pub fn get(&self, label: &str) -> Option<NodeIndex> {
        self.pattern.index_of(label).map(|i| self.nodes[i])
    }

    /// Node bound at `label`, failing when the pattern has no such label.
    pub fn require(&self, label: &str) -> Result<NodeIndex, PatternError> {
        self.pattern.require_index(label).map(|i| self.nodes[i])
    }

    pub fn element<'m>(&self, graph: &Graph<'m>, label: &str) -> Result<&'m Element, PatternError> {
        self.require(label).map(|n| graph.element(n))
    }
}

impl PartialEq for Match {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.name() == other.pattern.name() && self.nodes == other.nodes
    }
}

impl Eq for Match {}

impl Hash for Match {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.name().hash(state);
        self.nodes.hash(state);
    }
}

impl PartialOrd for Match {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Match {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pattern
            .name()
            .cmp(other.pattern.name())
            .then_with(|| self.nodes.cmp(&other.nodes))
    }
}

/// Exhaustive backtracking search of a pattern over a wrapper graph.
pub struct Searcher;

impl Searcher {
    /// All matches of `pattern`, grouped by starting element.
    pub fn search(graph: &Graph<'_>, pattern: &Arc<Pattern>) -> SearchResult {
        let class = pattern.start_class();
        let mut result = SearchResult::new();
        let mut total = 0;

        for start in graph.node_indices() {
            if !graph.element(start).is_a(class) {
                continue;
            }
            let matches = Self::search_from(graph, pattern, start);
            if !matches.is_empty() {
                total += matches.len();
                result.insert(graph.element(start).id().to_string(), matches);
            }
        }

        debug!(
            pattern = pattern.name(),
            starts = result.len(),
            matches = total,
            "Search finished"
        );
        result
    }

    /// All matches whose first label is bound to `start`.
    pub fn search_from(graph: &Graph<'_>, pattern: &Arc<Pattern>, start: NodeIndex) -> Vec<Match> {
        let mut matches = Vec::new();
        let Some(first) = pattern.slots().first() else {
            return matches;
        };
        if !graph.element(start).is_a(pattern.start_class()) {
            return matches;
        }

        let mut bound = vec![start];
        if !first
            .constraints
            .iter()
            .all(|c| c.holds(graph, &Bindings::new(pattern, &bound), start))
        {
            return matches;
        }

        let mut visited = HashMap::from([(start, 1usize)]);
        extend(graph, pattern, &mut bound, &mut visited, &mut matches);
        matches
    }
}

fn extend(
    graph: &Graph<'_>,
    pattern: &Arc<Pattern>,
    bound: &mut Vec<NodeIndex>,
    visited: &mut HashMap<NodeIndex, usize>,
    matches: &mut Vec<Match>,
) {
    let depth = bound.len();
    if depth == pattern.len() {
        trace!(pattern = pattern.name(), nodes = ?bound, "Match");
        matches.push(Match {
            pattern: Arc::clone(pattern),
            nodes: bound.clone(),
        });
        return;
    }

    let slot = &pattern.slots()[depth];
    let origin = {
        let bindings = Bindings::new(pattern, bound);
        slot.generator_origin(&bindings)
    };

    for candidate in slot.generator.candidates(graph, origin) {
        if visited.get(&candidate).is_some_and(|&n| n > 0)
            && !slot.permits_revisit(candidate, origin)
        {
            continue;
        }
        // Constraints run in declared order and stop at the first failure
        let accepted = {
            let bindings = Bindings::new(pattern, bound);
            slot.constraints
                .iter()
                .all(|c| c.holds(graph, &bindings, candidate))
        };
        if !accepted {
            continue;
        }

        bound.push(candidate);
        *visited.entry(candidate).or_insert(0) += 1;
        extend(graph, pattern, bound, visited, matches);
        if let Some(count) = visited.get_mut(&candidate) {
            *count -= 1;
        }
        bound.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Complex, Conversion, EntityReference, Model, PhysicalEntity};
    use crate::pattern::{Cmp, Constraint, Generator};
    use crate::types::{Direction, EdgeKind, ElementClass};

    fn two_references_three_proteins_each() -> Model {
        let mut elements = vec![
            Element::ProteinReference(EntityReference::new("A")),
            Element::ProteinReference(EntityReference::new("B")),
        ];
        for er in ["A", "B"] {
            for i in 0..3 {
                elements.push(Element::Protein(PhysicalEntity::new(format!("{er}{i}"), Some(er))));
            }
        }
        Model::from_elements(elements).unwrap()
    }

    fn reference_to_protein() -> Arc<Pattern> {
        Arc::new(
            Pattern::builder("er-to-pe", "ER", ElementClass::ProteinReference)
                .follow("PE", "ER", EdgeKind::Reference, Direction::Downstream)
                .constrain(Constraint::Type(ElementClass::Protein))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn enumerates_every_completion_per_start() {
        let model = two_references_three_proteins_each();
        let graph = Graph::build(&model);
        let pattern = reference_to_protein();

        let result = Searcher::search(&graph, &pattern);
        assert_eq!(result.len(), 2);
        assert_eq!(result["A"].len(), 3);
        assert_eq!(result["B"].len(), 3);

        let ids: Vec<&str> = result["A"]
            .iter()
            .map(|m| m.element(&graph, "PE").unwrap().id())
            .collect();
        assert_eq!(ids, ["A0", "A1", "A2"]);

        let again = Searcher::search(&graph, &pattern);
        assert_eq!(result, again);
    }

    #[test]
    fn bound_nodes_are_not_revisited_unless_allowed() {
        let model = two_references_three_proteins_each();
        let graph = Graph::build(&model);

        let back_to_er = |revisit: bool| {
            let mut builder = Pattern::builder("round-trip", "ER", ElementClass::ProteinReference)
                .follow("PE", "ER", EdgeKind::Reference, Direction::Downstream)
                .follow("ER2", "PE", EdgeKind::Reference, Direction::Upstream);
            if revisit {
                builder = builder.revisit();
            }
            Arc::new(builder.build().unwrap())
        };

        assert!(Searcher::search(&graph, &back_to_er(false)).is_empty());
        let result = Searcher::search(&graph, &back_to_er(true));
        assert_eq!(result["A"].len(), 3);
        for m in &result["A"] {
            assert_eq!(m.get("ER"), m.get("ER2"));
        }
    }

    #[test]
    fn walk_includes_origin_and_nested_complexes() {
        let model = Model::from_elements([
            Element::ProteinReference(EntityReference::new("er")),
            Element::Protein(PhysicalEntity::new("p", Some("er"))),
            Element::Complex(Complex {
                id: "inner".to_string(),
                components: vec!["p".to_string()],
                ..Default::default()
            }),
            Element::Complex(Complex {
                id: "outer".to_string(),
                components: vec!["inner".to_string()],
                ..Default::default()
            }),
        ])
        .unwrap();
        let graph = Graph::build(&model);
        let pattern = Arc::new(
            Pattern::builder("to-complex", "ER", ElementClass::ProteinReference)
                .follow("PE", "ER", EdgeKind::Reference, Direction::Downstream)
                .walk("wrapper", "PE", EdgeKind::Component, Direction::Downstream, 5)
                .build()
                .unwrap(),
        );

        let result = Searcher::search(&graph, &pattern);
        let wrappers: Vec<&str> = result["er"]
            .iter()
            .map(|m| m.element(&graph, "wrapper").unwrap().id())
            .collect();
        assert_eq!(wrappers, ["p", "inner", "outer"]);
    }

    #[test]
    fn failing_first_slot_constraint_skips_start() {
        let model = two_references_three_proteins_each();
        let graph = Graph::build(&model);
        let pattern = Arc::new(
            Pattern::builder("never", "ER", ElementClass::ProteinReference)
                .constrain(Constraint::Type(ElementClass::Protein))
                .build()
                .unwrap(),
        );
        assert!(Searcher::search(&graph, &pattern).is_empty());
        let a = graph.get_graph_object("A").unwrap();
        assert!(Searcher::search_from(&graph, &reference_to_protein(), a).len() == 3);
    }

    fn located(id: &str, er: &str, location: Option<&str>) -> Element {
        Element::Protein(PhysicalEntity {
            cellular_location: location.map(str::to_string),
            ..PhysicalEntity::new(id, Some(er))
        })
    }

    // pr has three proteins, p1 is converted into p2; lone has one protein
    fn conversion_model() -> Model {
        Model::from_elements([
            Element::ProteinReference(EntityReference::new("pr")),
            Element::ProteinReference(EntityReference::new("lone")),
            located("p1", "pr", Some("cytosol")),
            located("p2", "pr", Some("nucleus")),
            located("p3", "pr", Some("cytosol")),
            located("q", "lone", None),
            Element::Conversion(Conversion {
                id: "conv".to_string(),
                left: vec!["p1".to_string()],
                right: vec!["p2".to_string()],
                ..Default::default()
            }),
        ])
        .unwrap()
    }

    fn bound_ids<'m>(graph: &Graph<'m>, matches: &[Match], labels: &[&str]) -> Vec<Vec<&'m str>> {
        matches
            .iter()
            .map(|m| labels.iter().map(|l| m.element(graph, l).unwrap().id()).collect())
            .collect()
    }

    #[test]
    fn same_slot_rebinds_its_origin() {
        let model = conversion_model();
        let graph = Graph::build(&model);
        let pattern = Arc::new(
            Pattern::builder("same", "ER", ElementClass::ProteinReference)
                .follow("PE", "ER", EdgeKind::Reference, Direction::Downstream)
                .slot("again", Generator::Same("PE".to_string()))
                .constrain(Constraint::Equal("PE".to_string()))
                .build()
                .unwrap(),
        );

        let result = Searcher::search(&graph, &pattern);
        assert_eq!(
            bound_ids(&graph, &result["pr"], &["PE", "again"]),
            [["p1", "p1"], ["p2", "p2"], ["p3", "p3"]]
        );
        assert_eq!(bound_ids(&graph, &result["lone"], &["again"]), [["q"]]);
    }

    fn produced_by(graph: &Graph<'_>, bound: &[NodeIndex], candidate: NodeIndex) -> bool {
        graph.is_linked(bound[0], candidate, EdgeKind::Output, Direction::Downstream)
    }

    #[test]
    fn negated_links_and_predicates_filter_candidates() {
        let model = conversion_model();
        let graph = Graph::build(&model);
        let sibling = |predicate: bool| {
            let mut builder = Pattern::builder("sibling", "ER", ElementClass::ProteinReference)
                .follow("input", "ER", EdgeKind::Reference, Direction::Downstream)
                .follow("conv", "input", EdgeKind::Input, Direction::Downstream)
                .follow("other", "ER", EdgeKind::Reference, Direction::Downstream)
                .constrain(Constraint::Not(Box::new(Constraint::linked(
                    "conv",
                    EdgeKind::Input,
                    Direction::Downstream,
                ))));
            if predicate {
                builder = builder.constrain(Constraint::Predicate {
                    name: "produced-by",
                    reads: vec!["conv".to_string()],
                    test: produced_by,
                });
            }
            Arc::new(builder.build().unwrap())
        };

        let result = Searcher::search(&graph, &sibling(false));
        assert_eq!(
            bound_ids(&graph, &result["pr"], &["input", "conv", "other"]),
            [["p1", "conv", "p2"], ["p1", "conv", "p3"]]
        );
        let result = Searcher::search(&graph, &sibling(true));
        assert_eq!(bound_ids(&graph, &result["pr"], &["other"]), [["p2"]]);
        assert!(!result.contains_key("lone"));
    }

    #[test]
    fn degree_upper_bound_and_shared_location() {
        let model = conversion_model();
        let graph = Graph::build(&model);

        let single = Arc::new(
            Pattern::builder("single", "ER", ElementClass::ProteinReference)
                .constrain(Constraint::Degree {
                    edge: EdgeKind::Reference,
                    direction: Direction::Downstream,
                    cmp: Cmp::AtMost,
                    size: 1,
                })
                .build()
                .unwrap(),
        );
        let result = Searcher::search(&graph, &single);
        assert_eq!(result.keys().collect::<Vec<_>>(), ["lone"]);

        let colocated = Arc::new(
            Pattern::builder("colocated", "ER", ElementClass::ProteinReference)
                .follow("a", "ER", EdgeKind::Reference, Direction::Downstream)
                .follow("b", "ER", EdgeKind::Reference, Direction::Downstream)
                .constrain(Constraint::SameLocation("a".to_string()))
                .build()
                .unwrap(),
        );
        let result = Searcher::search(&graph, &colocated);
        assert_eq!(
            bound_ids(&graph, &result["pr"], &["a", "b"]),
            [["p1", "p3"], ["p3", "p1"]]
        );
        // Missing locations never match
        assert!(!result.contains_key("lone"));
    }
}
