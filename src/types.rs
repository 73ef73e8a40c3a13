use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

// Element classes form the runtime type hierarchy checked by type constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    EntityReference,        // Any entity reference
    ProteinReference,       // Protein reference (gene product)
    SmallMoleculeReference, // Small molecule reference
    PhysicalEntity,         // Any physical entity
    Protein,                // Protein
    SmallMolecule,          // Small molecule
    Complex,                // Complex of physical entities
    Interaction,            // Any interaction
    Control,                // Control (catalysis, modulation, ...)
    Conversion,             // Any conversion
    Degradation,            // Conversion that degrades its inputs
    TemplateReaction,       // Expression of a product
    Pathway,                // Container of processes
}

impl ElementClass {
    /// Parent class in the hierarchy, `None` for roots.
    pub fn parent(self) -> Option<ElementClass> {
        match self {
            ElementClass::ProteinReference | ElementClass::SmallMoleculeReference => {
                Some(ElementClass::EntityReference)
            }
            ElementClass::Protein | ElementClass::SmallMolecule | ElementClass::Complex => {
                Some(ElementClass::PhysicalEntity)
            }
            ElementClass::Control
            | ElementClass::Conversion
            | ElementClass::TemplateReaction => Some(ElementClass::Interaction),
            ElementClass::Degradation => Some(ElementClass::Conversion),
            ElementClass::EntityReference
            | ElementClass::PhysicalEntity
            | ElementClass::Interaction
            | ElementClass::Pathway => None,
        }
    }

    /// True if `self` equals `other` or descends from it.
    pub fn is_a(self, other: ElementClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.parent();
        }
        false
    }
}

// Control types as they appear in the exchange vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlType {
    Activation,
    ActivationAllosteric,
    ActivationNonallosteric,
    ActivationUnkmech,
    Inhibition,
    InhibitionAllosteric,
    InhibitionCompetitive,
    InhibitionIrreversible,
    InhibitionNoncompetitive,
    InhibitionOther,
    InhibitionUncompetitive,
    InhibitionUnkmech,
    #[serde(other)]
    Unrecognized, // Anything outside the vocabulary
}

impl ControlType {
    pub const ALL: [ControlType; 13] = [
        ControlType::Activation,
        ControlType::ActivationAllosteric,
        ControlType::ActivationNonallosteric,
        ControlType::ActivationUnkmech,
        ControlType::Inhibition,
        ControlType::InhibitionAllosteric,
        ControlType::InhibitionCompetitive,
        ControlType::InhibitionIrreversible,
        ControlType::InhibitionNoncompetitive,
        ControlType::InhibitionOther,
        ControlType::InhibitionUncompetitive,
        ControlType::InhibitionUnkmech,
        ControlType::Unrecognized,
    ];

    /// External code of the control type, e.g. `INHIBITION_COMPETITIVE`.
    pub fn code(self) -> &'static str {
        match self {
            ControlType::Activation => "ACTIVATION",
            ControlType::ActivationAllosteric => "ACTIVATION_ALLOSTERIC",
            ControlType::ActivationNonallosteric => "ACTIVATION_NONALLOSTERIC",
            ControlType::ActivationUnkmech => "ACTIVATION_UNKMECH",
            ControlType::Inhibition => "INHIBITION",
            ControlType::InhibitionAllosteric => "INHIBITION_ALLOSTERIC",
            ControlType::InhibitionCompetitive => "INHIBITION_COMPETITIVE",
            ControlType::InhibitionIrreversible => "INHIBITION_IRREVERSIBLE",
            ControlType::InhibitionNoncompetitive => "INHIBITION_NONCOMPETITIVE",
            ControlType::InhibitionOther => "INHIBITION_OTHER",
            ControlType::InhibitionUncompetitive => "INHIBITION_UNCOMPETITIVE",
            ControlType::InhibitionUnkmech => "INHIBITION_UNKMECH",
            ControlType::Unrecognized => "UNRECOGNIZED",
        }
    }

    pub fn is_activation(self) -> bool {
        matches!(
            self,
            ControlType::Activation
                | ControlType::ActivationAllosteric
                | ControlType::ActivationNonallosteric
                | ControlType::ActivationUnkmech
        )
    }

    /// Inhibitory family, decided by the external code's leading letter.
    pub fn is_inhibitory_coded(self) -> bool {
        self.code().starts_with('I')
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// Conversion subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    #[default]
    BiochemicalReaction,
    Degradation,
    ComplexAssembly,
    Transport,
}

// Activation/inhibition sign of a control relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Total over control types: absent or non-activation types are negative.
    pub fn of_control_type(control_type: Option<ControlType>) -> Sign {
        match control_type {
            Some(t) if t.is_activation() => Sign::Positive,
            _ => Sign::Negative,
        }
    }

    /// Sign by the external code alone: inhibitory-coded types are
    /// negative, anything else is positive.
    pub fn of_control_code(control_type: Option<ControlType>) -> Sign {
        match control_type {
            Some(t) if t.is_inhibitory_coded() => Sign::Negative,
            _ => Sign::Positive,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Sign) -> Sign {
        if self == rhs { Sign::Positive } else { Sign::Negative }
    }
}

// Edge types represent the structural relations between wrapped elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Reference,  // Entity reference -> physical entity
    Component,  // Complex component -> complex
    Controller, // Controller -> control
    Controls,   // Control -> controlled process or control
    Input,      // Left participant -> conversion
    Output,     // Conversion or template reaction -> product
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Reference => "reference",
            EdgeKind::Component => "component",
            EdgeKind::Controller => "controller",
            EdgeKind::Controls => "controls",
            EdgeKind::Input => "input",
            EdgeKind::Output => "output",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Upstream,   // Follow incoming edges
    Downstream, // Follow outgoing edges
}

impl Direction {
    pub fn to_petgraph(self) -> petgraph::Direction {
        match self {
            Direction::Upstream => petgraph::Direction::Incoming,
            Direction::Downstream => petgraph::Direction::Outgoing,
        }
    }
}
