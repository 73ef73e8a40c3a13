//! Declarative graph patterns.
//!
//! A pattern is an ordered list of labeled slots. Each slot names where its
//! candidates come from (a [`Generator`]) and the constraints a candidate must
//! pass. Generators and constraints may only read labels bound by earlier
//! slots; [`PatternBuilder::build`] rejects anything else.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::graph_builder::Graph;
use crate::types::{Direction, EdgeKind, ElementClass};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern `{pattern}`: slot `{slot}` reads label `{label}` before it is bound")]
    UnboundLabel {
        pattern: String,
        slot: String,
        label: String,
    },

    #[error("pattern `{pattern}`: label `{label}` is declared twice")]
    DuplicateLabel { pattern: String, label: String },

    #[error("pattern `{pattern}` has no label `{label}`")]
    UnknownLabel { pattern: String, label: String },
}

/// Where a slot's candidates come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Generator {
    /// Every element of the class. First slot only.
    Start(ElementClass),
    /// Neighbours of the node bound at `from` over one edge kind.
    Follow {
        from: String,
        edge: EdgeKind,
        direction: Direction,
    },
    /// The node bound at `from` plus everything reachable over one edge kind
    /// within `max_depth` steps. Only breadth nodes are expanded.
    Walk {
        from: String,
        edge: EdgeKind,
        direction: Direction,
        max_depth: usize,
    },
    /// The node bound at `from`.
    Same(String),
}

impl Generator {
    fn reads(&self) -> Option<&str> {
        match self {
            Generator::Start(_) => None,
            Generator::Follow { from, .. } | Generator::Walk { from, .. } | Generator::Same(from) => {
                Some(from)
            }
        }
    }

    pub(crate) fn candidates(&self, graph: &Graph<'_>, origin: Option<NodeIndex>) -> Vec<NodeIndex> {
        let Some(origin) = origin else {
            return Vec::new();
        };
        match self {
            Generator::Start(_) => Vec::new(),
            Generator::Same(_) => vec![origin],
            Generator::Follow { edge, direction, .. } => graph.neighbors(origin, *edge, *direction),
            Generator::Walk {
                edge,
                direction,
                max_depth,
                ..
            } => walk(graph, origin, *edge, *direction, *max_depth),
        }
    }
}

// Breadth-first frontier over one edge kind
fn walk(
    graph: &Graph<'_>,
    origin: NodeIndex,
    edge: EdgeKind,
    direction: Direction,
    max_depth: usize,
) -> Vec<NodeIndex> {
    let mut seen = HashSet::from([origin]);
    let mut queue = VecDeque::from([(origin, 0usize)]);
    let mut found = vec![origin];

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= max_depth || !graph.node(node).breadth {
            continue;
        }
        for next in graph.neighbors(node, edge, direction) {
            if seen.insert(next) {
                found.push(next);
                queue.push_back((next, depth + 1));
            }
        }
    }

    found.sort();
    found
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Equal,
    AtLeast,
    AtMost,
}

impl Cmp {
    fn holds(self, value: usize, size: usize) -> bool {
        match self {
            Cmp::Equal => value == size,
            Cmp::AtLeast => value >= size,
            Cmp::AtMost => value <= size,
        }
    }
}

/// Predicate over the nodes bound at the declared labels and a candidate.
pub type PredicateFn = fn(&Graph<'_>, &[NodeIndex], NodeIndex) -> bool;

/// A test a candidate must pass to be bound to a slot.
#[derive(Clone)]
pub enum Constraint {
    Type(ElementClass),
    Equal(String),
    NotEqual(String),
    /// Candidate reaches the node bound at `label` over `edge` in `direction`.
    Linked {
        label: String,
        edge: EdgeKind,
        direction: Direction,
    },
    NotLinked {
        label: String,
        edge: EdgeKind,
        direction: Direction,
    },
    /// Candidate and the node bound at the label share an entity reference.
    SameReference(String),
    /// Candidate and the node bound at the label sit in the same cellular location.
    SameLocation(String),
    /// Number of distinct neighbours over one edge kind.
    Degree {
        edge: EdgeKind,
        direction: Direction,
        cmp: Cmp,
        size: usize,
    },
    Not(Box<Constraint>),
    Predicate {
        name: &'static str,
        reads: Vec<String>,
        test: PredicateFn,
    },
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Type(class) => write!(f, "Type({class:?})"),
            Constraint::Equal(l) => write!(f, "Equal({l})"),
            Constraint::NotEqual(l) => write!(f, "NotEqual({l})"),
            Constraint::Linked { label, edge, direction } => {
                write!(f, "Linked({label}, {edge:?}, {direction:?})")
            }
            Constraint::NotLinked { label, edge, direction } => {
                write!(f, "NotLinked({label}, {edge:?}, {direction:?})")
            }
            Constraint::SameReference(l) => write!(f, "SameReference({l})"),
            Constraint::SameLocation(l) => write!(f, "SameLocation({l})"),
            Constraint::Degree { edge, direction, cmp, size } => {
                write!(f, "Degree({edge:?}, {direction:?}, {cmp:?}, {size})")
            }
            Constraint::Not(inner) => write!(f, "Not({inner:?})"),
            Constraint::Predicate { name, reads, .. } => write!(f, "Predicate({name}, {reads:?})"),
        }
    }
}

impl Constraint {
    pub fn linked(label: &str, edge: EdgeKind, direction: Direction) -> Self {
        Constraint::Linked {
            label: label.to_string(),
            edge,
            direction,
        }
    }

    pub fn not_linked(label: &str, edge: EdgeKind, direction: Direction) -> Self {
        Constraint::NotLinked {
            label: label.to_string(),
            edge,
            direction,
        }
    }

    /// Labels this constraint reads.
    pub fn reads(&self) -> Vec<&str> {
        match self {
            Constraint::Type(_) | Constraint::Degree { .. } => Vec::new(),
            Constraint::Equal(l)
            | Constraint::NotEqual(l)
            | Constraint::SameReference(l)
            | Constraint::SameLocation(l)
            | Constraint::Linked { label: l, .. }
            | Constraint::NotLinked { label: l, .. } => vec![l.as_str()],
            Constraint::Not(inner) => inner.reads(),
            Constraint::Predicate { reads, .. } => reads.iter().map(String::as_str).collect(),
        }
    }

    pub fn holds(&self, graph: &Graph<'_>, bound: &Bindings<'_>, candidate: NodeIndex) -> bool {
        match self {
            Constraint::Type(class) => graph.element(candidate).is_a(*class),
            Constraint::Equal(l) => bound.get(l) == Some(candidate),
            Constraint::NotEqual(l) => bound.get(l).is_some_and(|n| n != candidate),
            Constraint::Linked { label, edge, direction } => bound
                .get(label)
                .is_some_and(|n| graph.is_linked(candidate, n, *edge, *direction)),
            Constraint::NotLinked { label, edge, direction } => bound
                .get(label)
                .is_some_and(|n| !graph.is_linked(candidate, n, *edge, *direction)),
            Constraint::SameReference(l) => bound.get(l).is_some_and(|n| {
                let er = graph.element(candidate).entity_reference();
                er.is_some() && er == graph.element(n).entity_reference()
            }),
            Constraint::SameLocation(l) => bound.get(l).is_some_and(|n| {
                let location = graph.element(candidate).cellular_location();
                location.is_some() && location == graph.element(n).cellular_location()
            }),
            Constraint::Degree { edge, direction, cmp, size } => {
                cmp.holds(graph.neighbors(candidate, *edge, *direction).len(), *size)
            }
            Constraint::Not(inner) => !inner.holds(graph, bound, candidate),
            Constraint::Predicate { reads, test, .. } => {
                let nodes: Option<Vec<NodeIndex>> = reads.iter().map(|l| bound.get(l)).collect();
                nodes.is_some_and(|nodes| test(graph, &nodes, candidate))
            }
        }
    }
}

/// One variable slot of a pattern.
#[derive(Debug, Clone)]
pub struct Slot {
    pub label: String,
    pub generator: Generator,
    pub constraints: Vec<Constraint>,
    pub revisit: bool, // May bind a node already bound earlier
}

impl Slot {
    /// Node the generator starts from, if it reads one.
    pub(crate) fn generator_origin(&self, bound: &Bindings<'_>) -> Option<NodeIndex> {
        self.generator.reads().and_then(|label| bound.get(label))
    }

    /// Whether the slot may bind a node that an earlier slot already holds.
    /// Zero-length walks and `Same` reuse their origin by construction.
    pub(crate) fn permits_revisit(&self, candidate: NodeIndex, origin: Option<NodeIndex>) -> bool {
        self.revisit
            || match self.generator {
                Generator::Same(_) | Generator::Walk { .. } => origin == Some(candidate),
                _ => false,
            }
    }
}

/// Partial assignment visible to constraints during search.
pub struct Bindings<'a> {
    pattern: &'a Pattern,
    nodes: &'a [NodeIndex],
}

impl<'a> Bindings<'a> {
    pub(crate) fn new(pattern: &'a Pattern, nodes: &'a [NodeIndex]) -> Self {
        Self { pattern, nodes }
    }

    pub fn get(&self, label: &str) -> Option<NodeIndex> {
        self.pattern
            .index_of(label)
            .and_then(|i| self.nodes.get(i).copied())
    }
}

/// Validated, immutable pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl Pattern {
    pub fn builder(name: &str, first_label: &str, class: ElementClass) -> PatternBuilder {
        PatternBuilder {
            name: name.to_string(),
            slots: vec![Slot {
                label: first_label.to_string(),
                generator: Generator::Start(class),
                constraints: Vec::new(),
                revisit: false,
            }],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.label.as_str())
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn require_index(&self, label: &str) -> Result<usize, PatternError> {
        self.index_of(label).ok_or_else(|| PatternError::UnknownLabel {
            pattern: self.name.clone(),
            label: label.to_string(),
        })
    }

    /// Class of the elements the search starts from.
    pub fn start_class(&self) -> ElementClass {
        match self.slots.first().map(|s| &s.generator) {
            Some(Generator::Start(class)) => *class,
            _ => ElementClass::PhysicalEntity,
        }
    }
}

/// Appends slots in dependency order.
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    name: String,
    slots: Vec<Slot>,
}

impl PatternBuilder {
    pub fn slot(mut self, label: &str, generator: Generator) -> Self {
        self.slots.push(Slot {
            label: label.to_string(),
            generator,
            constraints: Vec::new(),
            revisit: false,
        });
        self
    }

    pub fn follow(self, label: &str, from: &str, edge: EdgeKind, direction: Direction) -> Self {
        self.slot(
            label,
            Generator::Follow {
                from: from.to_string(),
                edge,
                direction,
            },
        )
    }

    pub fn walk(
        self,
        label: &str,
        from: &str,
        edge: EdgeKind,
        direction: Direction,
        max_depth: usize,
    ) -> Self {
        self.slot(
            label,
            Generator::Walk {
                from: from.to_string(),
                edge,
                direction,
                max_depth,
            },
        )
    }

    /// Adds a constraint to the most recent slot.
    pub fn constrain(mut self, constraint: Constraint) -> Self {
        if let Some(slot) = self.slots.last_mut() {
            slot.constraints.push(constraint);
        }
        self
    }

    /// Lets the most recent slot bind an already bound node.
    pub fn revisit(mut self) -> Self {
        if let Some(slot) = self.slots.last_mut() {
            slot.revisit = true;
        }
        self
    }

    pub fn build(self) -> Result<Pattern, PatternError> {
        let mut index = HashMap::new();

        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 && matches!(slot.generator, Generator::Start(_)) {
                return Err(PatternError::UnboundLabel {
                    pattern: self.name.clone(),
                    slot: slot.label.clone(),
                    label: slot.label.clone(),
                });
            }

            let reads = slot
                .generator
                .reads()
                .into_iter()
                .chain(slot.constraints.iter().flat_map(|c| c.reads()));
            for label in reads {
                // A slot's constraints may not read the slot's own label either
                if !index.contains_key(label) {
                    return Err(PatternError::UnboundLabel {
                        pattern: self.name.clone(),
                        slot: slot.label.clone(),
                        label: label.to_string(),
                    });
                }
            }

            if index.insert(slot.label.clone(), i).is_some() {
                return Err(PatternError::DuplicateLabel {
                    pattern: self.name.clone(),
                    label: slot.label.clone(),
                });
            }
        }

        Ok(Pattern {
            name: self.name,
            slots: self.slots,
            index,
        })
    }
}
