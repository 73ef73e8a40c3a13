// Pattern factories used by the miners

use crate::pattern::{Cmp, Constraint, Pattern, PatternBuilder, PatternError};
use crate::types::{Direction, EdgeKind, ElementClass};

/// How many complex levels a protein may be nested in.
pub const COMPLEX_DEPTH: usize = 5;

/// How many controls may sit between a controller and its process.
pub const CONTROL_DEPTH: usize = 5;

// Reference -> physical entity -> the entity or any complex holding it
fn controller_chain(name: &str, pr: &str, simple_pe: &str, pe: &str) -> PatternBuilder {
    Pattern::builder(name, pr, ElementClass::ProteinReference)
        .follow(simple_pe, pr, EdgeKind::Reference, Direction::Downstream)
        .walk(pe, simple_pe, EdgeKind::Component, Direction::Downstream, COMPLEX_DEPTH)
}

/// Protein controls a conversion that changes the state of another protein.
pub fn controls_state_change() -> Result<Pattern, PatternError> {
    controller_chain("controls-state-change", "controller PR", "controller simple PE", "controller PE")
        .follow("Control", "controller PE", EdgeKind::Controller, Direction::Downstream)
        .walk("Conversion", "Control", EdgeKind::Controls, Direction::Downstream, CONTROL_DEPTH)
        .constrain(Constraint::Type(ElementClass::Conversion))
        .constrain(Constraint::not_linked("controller PE", EdgeKind::Input, Direction::Upstream))
        .follow("input PE", "Conversion", EdgeKind::Input, Direction::Upstream)
        .follow("output PE", "Conversion", EdgeKind::Output, Direction::Downstream)
        .constrain(Constraint::SameReference("input PE".to_string()))
        .follow("changed PR", "input PE", EdgeKind::Reference, Direction::Upstream)
        .constrain(Constraint::Type(ElementClass::ProteinReference))
        .build()
}

/// Protein takes part unchanged in a conversion that changes another protein.
pub fn controls_state_change_but_is_participant() -> Result<Pattern, PatternError> {
    controller_chain(
        "controls-state-change-but-is-participant",
        "controller PR",
        "controller simple PE",
        "controller PE",
    )
    .follow("Conversion", "controller PE", EdgeKind::Input, Direction::Downstream)
    .constrain(Constraint::Type(ElementClass::Conversion))
    .constrain(Constraint::linked("controller PE", EdgeKind::Output, Direction::Downstream))
    .follow("input PE", "Conversion", EdgeKind::Input, Direction::Upstream)
    .follow("output PE", "Conversion", EdgeKind::Output, Direction::Downstream)
    .constrain(Constraint::SameReference("input PE".to_string()))
    .follow("changed PR", "input PE", EdgeKind::Reference, Direction::Upstream)
    .constrain(Constraint::Type(ElementClass::ProteinReference))
    .build()
}

/// Protein controls a template reaction producing another protein.
pub fn controls_expression() -> Result<Pattern, PatternError> {
    controller_chain("controls-expression", "TF PR", "TF simple PE", "TF PE")
        .follow("Control", "TF PE", EdgeKind::Controller, Direction::Downstream)
        .walk("TempReac", "Control", EdgeKind::Controls, Direction::Downstream, CONTROL_DEPTH)
        .constrain(Constraint::Type(ElementClass::TemplateReaction))
        .follow("product PE", "TempReac", EdgeKind::Output, Direction::Downstream)
        .follow("product PR", "product PE", EdgeKind::Reference, Direction::Upstream)
        .constrain(Constraint::Type(ElementClass::ProteinReference))
        .build()
}

/// Expression modelled as a conversion with nothing on the left.
pub fn controls_expression_with_conversion() -> Result<Pattern, PatternError> {
    controller_chain("controls-expression-with-conversion", "TF PR", "TF simple PE", "TF PE")
        .follow("Control", "TF PE", EdgeKind::Controller, Direction::Downstream)
        .walk("Conversion", "Control", EdgeKind::Controls, Direction::Downstream, CONTROL_DEPTH)
        .constrain(Constraint::Type(ElementClass::Conversion))
        .constrain(Constraint::Degree {
            edge: EdgeKind::Input,
            direction: Direction::Upstream,
            cmp: Cmp::Equal,
            size: 0,
        })
        .follow("product PE", "Conversion", EdgeKind::Output, Direction::Downstream)
        .follow("product PR", "product PE", EdgeKind::Reference, Direction::Upstream)
        .constrain(Constraint::Type(ElementClass::ProteinReference))
        .build()
}

/// Protein controls a conversion that consumes another protein and produces nothing.
pub fn degradation() -> Result<Pattern, PatternError> {
    controller_chain("degradation", "upstream PR", "upstream simple PE", "upstream PE")
        .follow("Control", "upstream PE", EdgeKind::Controller, Direction::Downstream)
        .walk("Conversion", "Control", EdgeKind::Controls, Direction::Downstream, CONTROL_DEPTH)
        .constrain(Constraint::Type(ElementClass::Conversion))
        .constrain(Constraint::Degree {
            edge: EdgeKind::Output,
            direction: Direction::Downstream,
            cmp: Cmp::Equal,
            size: 0,
        })
        .constrain(Constraint::not_linked("upstream PE", EdgeKind::Input, Direction::Upstream))
        .follow("input PE", "Conversion", EdgeKind::Input, Direction::Upstream)
        .walk("input simple PE", "input PE", EdgeKind::Component, Direction::Upstream, COMPLEX_DEPTH)
        .follow("downstream PR", "input simple PE", EdgeKind::Reference, Direction::Upstream)
        .constrain(Constraint::Type(ElementClass::ProteinReference))
        .build()
}

/// Two controllers catalyse consecutive conversions: an output of the first
/// conversion is an input of the second.
pub fn consecutive_catalysis() -> Result<Pattern, PatternError> {
    controller_chain("consecutive-catalysis", "first PR", "first simple PE", "first PE")
        .follow("first Control", "first PE", EdgeKind::Controller, Direction::Downstream)
        .walk("first Conversion", "first Control", EdgeKind::Controls, Direction::Downstream, CONTROL_DEPTH)
        .constrain(Constraint::Type(ElementClass::Conversion))
        .follow("linker PE", "first Conversion", EdgeKind::Output, Direction::Downstream)
        .follow("second Conversion", "linker PE", EdgeKind::Input, Direction::Downstream)
        .constrain(Constraint::Type(ElementClass::Conversion))
        .follow("second Control", "second Conversion", EdgeKind::Controls, Direction::Upstream)
        .constrain(Constraint::Type(ElementClass::Control))
        .follow("second PE", "second Control", EdgeKind::Controller, Direction::Upstream)
        .walk("second simple PE", "second PE", EdgeKind::Component, Direction::Upstream, COMPLEX_DEPTH)
        .follow("second PR", "second simple PE", EdgeKind::Reference, Direction::Upstream)
        .constrain(Constraint::Type(ElementClass::ProteinReference))
        .build()
}

/// Two proteins are members of the same complex.
pub fn in_same_complex() -> Result<Pattern, PatternError> {
    Pattern::builder("in-same-complex", "PR1", ElementClass::ProteinReference)
        .follow("simple PE1", "PR1", EdgeKind::Reference, Direction::Downstream)
        .walk("Complex", "simple PE1", EdgeKind::Component, Direction::Downstream, COMPLEX_DEPTH)
        .constrain(Constraint::Type(ElementClass::Complex))
        .walk("simple PE2", "Complex", EdgeKind::Component, Direction::Upstream, COMPLEX_DEPTH)
        .constrain(Constraint::Degree {
            edge: EdgeKind::Reference,
            direction: Direction::Upstream,
            cmp: Cmp::AtLeast,
            size: 1,
        })
        .follow("PR2", "simple PE2", EdgeKind::Reference, Direction::Upstream)
        .constrain(Constraint::Type(ElementClass::ProteinReference))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_factory_builds() {
        let patterns = [
            controls_state_change(),
            controls_state_change_but_is_participant(),
            controls_expression(),
            controls_expression_with_conversion(),
            degradation(),
            consecutive_catalysis(),
            in_same_complex(),
        ];
        for pattern in patterns {
            let pattern = pattern.unwrap();
            assert_eq!(pattern.start_class(), ElementClass::ProteinReference);
        }
    }
}
