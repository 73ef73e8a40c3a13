//! Miners turn pattern matches into SIF interactions.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Result};
use crate::graph_builder::Graph;
use crate::id_fetcher::IdFetcher;
use crate::pattern::{Pattern, PatternError};
use crate::patterns;
use crate::search::Match;
use crate::types::{Direction, EdgeKind, Sign};

/// Interaction types a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SifType {
    ControlsStateChange,
    ControlsExpression,
    ControlsDegradation,
    InSameComplex,
    InteractsWith, // Mined exactly like InSameComplex
    ConsecutiveCatalysis,
}

impl SifType {
    pub const ALL: [SifType; 6] = [
        SifType::ControlsStateChange,
        SifType::ControlsExpression,
        SifType::ControlsDegradation,
        SifType::InSameComplex,
        SifType::InteractsWith,
        SifType::ConsecutiveCatalysis,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            SifType::ControlsStateChange => "controls-state-change-of",
            SifType::ControlsExpression => "controls-expression-of",
            SifType::ControlsDegradation => "controls-degradation-of",
            SifType::InSameComplex => "in-complex-with",
            SifType::InteractsWith => "interacts-with",
            SifType::ConsecutiveCatalysis => "catalysis-precedes",
        }
    }

    pub fn is_directed(self) -> bool {
        !matches!(self, SifType::InSameComplex | SifType::InteractsWith)
    }

    /// Miners producing this type. One type may need several patterns.
    pub fn miners(self) -> Vec<MinerKind> {
        match self {
            SifType::ControlsStateChange => vec![
                MinerKind::ControlsStateChange,
                MinerKind::ControlsStateChangeButIsParticipant,
            ],
            SifType::ControlsExpression => vec![
                MinerKind::ControlsExpression,
                MinerKind::ControlsExpressionWithConversion,
            ],
            SifType::ControlsDegradation => vec![MinerKind::Degrades],
            SifType::InSameComplex | SifType::InteractsWith => vec![MinerKind::InSameComplex(self)],
            SifType::ConsecutiveCatalysis => vec![MinerKind::ConsecutiveCatalysis],
        }
    }
}

impl fmt::Display for SifType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SifType {
    type Err = Error;

    /// Accepts the tag (`in-complex-with`) or the constant name (`IN_SAME_COMPLEX`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        SifType::ALL
            .into_iter()
            .find(|t| {
                t.tag() == wanted || format!("{t:?}").to_lowercase() == wanted.replace('-', "")
            })
            .ok_or_else(|| Error::UnknownSifType(s.to_string()))
    }
}

/// What a miner knows: its pattern and how to read a match.
pub trait SifMiner {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn construct_pattern(&self) -> std::result::Result<Pattern, PatternError>;

    fn sif_type(&self) -> SifType;

    fn relation_type(&self, m: &Match, graph: &Graph<'_>) -> std::result::Result<String, PatternError>;

    fn source_label(&self) -> &'static str;

    fn target_label(&self) -> &'static str;

    /// Labels whose elements are reported as mediators of the interaction.
    fn mediator_labels(&self) -> &'static [&'static str] {
        &[]
    }

    fn is_directed(&self) -> bool {
        self.sif_type().is_directed()
    }

    fn header(&self) -> &'static str {
        if self.is_directed() {
            "Upstream\ttype\tDownstream"
        } else {
            "Participant\ttype\tParticipant"
        }
    }
}

/// The built-in miners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinerKind {
    ControlsStateChange,
    ControlsStateChangeButIsParticipant,
    ControlsExpression,
    ControlsExpressionWithConversion,
    Degrades,
    ConsecutiveCatalysis,
    InSameComplex(SifType), // Declared type it was requested for
}

impl SifMiner for MinerKind {
    fn name(&self) -> &'static str {
        match self {
            MinerKind::ControlsStateChange => "Controls-state-change",
            MinerKind::ControlsStateChangeButIsParticipant => "Controls-state-change-but-is-participant",
            MinerKind::ControlsExpression => "Controls-expression",
            MinerKind::ControlsExpressionWithConversion => "Controls-expression-with-conversion",
            MinerKind::Degrades => "Degrades-or-blocks-it",
            MinerKind::ConsecutiveCatalysis => "Consecutive-catalysis",
            MinerKind::InSameComplex(_) => "In-same-complex",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            MinerKind::ControlsStateChange => {
                "First protein controls a conversion that changes the state of the second protein"
            }
            MinerKind::ControlsStateChangeButIsParticipant => {
                "First protein participates unchanged in a conversion that changes the second protein"
            }
            MinerKind::ControlsExpression => {
                "First protein controls a template reaction that produces the second protein"
            }
            MinerKind::ControlsExpressionWithConversion => {
                "First protein controls a conversion with no inputs that produces the second protein"
            }
            MinerKind::Degrades => {
                "First protein controls a conversion that degrades the second protein. A positive \
                 control degrades, a negative one blocks degradation"
            }
            MinerKind::ConsecutiveCatalysis => {
                "First protein catalyses a conversion whose output is consumed by a conversion \
                 the second protein catalyses"
            }
            MinerKind::InSameComplex(_) => "Both proteins are members of the same complex",
        }
    }

    fn construct_pattern(&self) -> std::result::Result<Pattern, PatternError> {
        match self {
            MinerKind::ControlsStateChange => patterns::controls_state_change(),
            MinerKind::ControlsStateChangeButIsParticipant => {
                patterns::controls_state_change_but_is_participant()
            }
            MinerKind::ControlsExpression => patterns::controls_expression(),
            MinerKind::ControlsExpressionWithConversion => patterns::controls_expression_with_conversion(),
            MinerKind::Degrades => patterns::degradation(),
            MinerKind::ConsecutiveCatalysis => patterns::consecutive_catalysis(),
            MinerKind::InSameComplex(_) => patterns::in_same_complex(),
        }
    }

    fn sif_type(&self) -> SifType {
        match self {
            MinerKind::ControlsStateChange | MinerKind::ControlsStateChangeButIsParticipant => {
                SifType::ControlsStateChange
            }
            MinerKind::ControlsExpression | MinerKind::ControlsExpressionWithConversion => {
                SifType::ControlsExpression
            }
            MinerKind::Degrades => SifType::ControlsDegradation,
            MinerKind::ConsecutiveCatalysis => SifType::ConsecutiveCatalysis,
            MinerKind::InSameComplex(declared) => *declared,
        }
    }

    fn relation_type(&self, m: &Match, graph: &Graph<'_>) -> std::result::Result<String, PatternError> {
        let relation = match self {
            MinerKind::Degrades => match net_control_sign(m, graph)? {
                Sign::Positive => "degrades",
                Sign::Negative => "blocks-degradation",
            },
            // Both same-complex types render as one relation
            MinerKind::InSameComplex(_) => SifType::InSameComplex.tag(),
            _ => self.sif_type().tag(),
        };
        Ok(relation.to_string())
    }

    fn source_label(&self) -> &'static str {
        match self {
            MinerKind::ControlsStateChange | MinerKind::ControlsStateChangeButIsParticipant => "controller PR",
            MinerKind::ControlsExpression | MinerKind::ControlsExpressionWithConversion => "TF PR",
            MinerKind::Degrades => "upstream PR",
            MinerKind::ConsecutiveCatalysis => "first PR",
            MinerKind::InSameComplex(_) => "PR1",
        }
    }

    fn target_label(&self) -> &'static str {
        match self {
            MinerKind::ControlsStateChange | MinerKind::ControlsStateChangeButIsParticipant => "changed PR",
            MinerKind::ControlsExpression | MinerKind::ControlsExpressionWithConversion => "product PR",
            MinerKind::Degrades => "downstream PR",
            MinerKind::ConsecutiveCatalysis => "second PR",
            MinerKind::InSameComplex(_) => "PR2",
        }
    }

    fn mediator_labels(&self) -> &'static [&'static str] {
        match self {
            MinerKind::ControlsStateChange
            | MinerKind::ControlsExpressionWithConversion
            | MinerKind::Degrades => &["Control", "Conversion"],
            MinerKind::ControlsStateChangeButIsParticipant => &["Conversion"],
            MinerKind::ControlsExpression => &["Control", "TempReac"],
            MinerKind::ConsecutiveCatalysis => {
                &["first Control", "first Conversion", "second Conversion", "second Control"]
            }
            MinerKind::InSameComplex(_) => &["Complex"],
        }
    }
}

// Net effect of the control bound at "Control" on the process bound at
// "Conversion". The control acting on the process is read by its code;
// each enclosing control flips the result when it is negative.
fn net_control_sign(m: &Match, graph: &Graph<'_>) -> std::result::Result<Sign, PatternError> {
    let control = m.require("Control")?;
    let process = m.require("Conversion")?;
    let chain = graph
        .path_between(control, process, EdgeKind::Controls, Direction::Downstream, patterns::CONTROL_DEPTH)
        .unwrap_or_else(|| vec![control, process]);

    let nesting = &chain[..chain.len() - 1];
    let acting = nesting.last().copied().unwrap_or(control);
    let outer = graph.path_sign(nesting).unwrap_or(Sign::Positive);
    Ok(outer * Sign::of_control_code(graph.element(acting).control_type()))
}

/// Identity of an interaction: equal keys merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SifKey {
    pub source: String,
    pub relation: String,
    pub target: String,
}

/// A mined binary interaction and the matches backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SifInteraction {
    pub key: SifKey,
    pub sif_type: SifType,
    pub directed: bool,
    pub evidence: BTreeSet<Match>,
    pub mediators: BTreeSet<String>,
}

impl SifInteraction {
    /// Undirected interactions keep their two ends in sorted order.
    pub fn new(source: String, relation: String, target: String, sif_type: SifType, directed: bool) -> Self {
        let (source, target) = if !directed && target < source {
            (target, source)
        } else {
            (source, target)
        };
        Self {
            key: SifKey {
                source,
                relation,
                target,
            },
            sif_type,
            directed,
            evidence: BTreeSet::new(),
            mediators: BTreeSet::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.key.source
    }

    pub fn target(&self) -> &str {
        &self.key.target
    }

    pub fn relation(&self) -> &str {
        &self.key.relation
    }

    pub fn has_ids(&self) -> bool {
        !self.key.source.is_empty() && !self.key.target.is_empty()
    }

    /// Unions evidence and mediators of an interaction with the same key.
    pub fn merge_with(&mut self, other: SifInteraction) {
        self.evidence.extend(other.evidence);
        self.mediators.extend(other.mediators);
    }

    pub fn to_sif_line(&self) -> String {
        format!("{}\t{}\t{}", self.key.source, self.key.relation, self.key.target)
    }
}

/// A miner with its pattern built once.
#[derive(Debug, Clone)]
pub struct MinerAdapter<M> {
    miner: M,
    pattern: Arc<Pattern>,
}

impl<M: SifMiner> MinerAdapter<M> {
    pub fn new(miner: M) -> Result<Self> {
        let pattern = Arc::new(miner.construct_pattern()?);
        Ok(Self { miner, pattern })
    }

    pub fn miner(&self) -> &M {
        &self.miner
    }

    pub fn pattern(&self) -> &Arc<Pattern> {
        &self.pattern
    }

    /// Interaction for one match, `None` when either end has no identifier.
    pub fn create_sif_interaction(
        &self,
        m: &Match,
        graph: &Graph<'_>,
        fetcher: &dyn IdFetcher,
    ) -> Result<Option<SifInteraction>> {
        let source = m.element(graph, self.miner.source_label())?;
        let target = m.element(graph, self.miner.target_label())?;

        let (Some(source_id), Some(target_id)) = (fetcher.fetch_id(source), fetcher.fetch_id(target)) else {
            trace!(
                miner = self.miner.name(),
                source = source.id(),
                target = target.id(),
                "Unresolved identifier, match dropped"
            );
            return Ok(None);
        };

        let relation = self.miner.relation_type(m, graph)?;
        let mut sif = SifInteraction::new(
            source_id,
            relation,
            target_id,
            self.miner.sif_type(),
            self.miner.is_directed(),
        );
        for label in self.miner.mediator_labels() {
            sif.mediators.insert(m.element(graph, label)?.id().to_string());
        }
        sif.evidence.insert(m.clone());
        Ok(Some(sif))
    }
}

impl<M: SifMiner> SifMiner for MinerAdapter<M> {
    fn name(&self) -> &'static str {
        self.miner.name()
    }

    fn description(&self) -> &'static str {
        self.miner.description()
    }

    fn construct_pattern(&self) -> std::result::Result<Pattern, PatternError> {
        Ok(self.pattern.as_ref().clone())
    }

    fn sif_type(&self) -> SifType {
        self.miner.sif_type()
    }

    fn relation_type(&self, m: &Match, graph: &Graph<'_>) -> std::result::Result<String, PatternError> {
        self.miner.relation_type(m, graph)
    }

    fn source_label(&self) -> &'static str {
        self.miner.source_label()
    }

    fn target_label(&self) -> &'static str {
        self.miner.target_label()
    }

    fn mediator_labels(&self) -> &'static [&'static str] {
        self.miner.mediator_labels()
    }

    fn is_directed(&self) -> bool {
        self.miner.is_directed()
    }

    fn header(&self) -> &'static str {
        self.miner.header()
    }
}
